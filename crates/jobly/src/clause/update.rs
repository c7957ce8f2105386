//! SET-list builder for partial updates.

use crate::clause::{Clause, ClauseWriter, Connective};
use crate::error::{JoblyError, JoblyResult};
use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Ordered field name → new value mapping for a partial update.
///
/// Keys are unique. Insertion order is preserved and decides placeholder
/// order; re-setting a key replaces its value in place. Deserializing from a
/// JSON object keeps the order the keys appear in the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    entries: Vec<(String, Value)>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`FieldUpdate::insert`].
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, returning the previous value if the field was present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldUpdate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut update = FieldUpdate::new();
        for (k, v) in iter {
            update.insert(k, v);
        }
        update
    }
}

impl Serialize for FieldUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldUpdate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldUpdateVisitor;

        impl<'de> Visitor<'de> for FieldUpdateVisitor {
            type Value = FieldUpdate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldUpdate, A::Error> {
                let mut update = FieldUpdate::new();
                while let Some((field, value)) = access.next_entry::<String, Value>()? {
                    update.insert(field, value);
                }
                Ok(update)
            }
        }

        deserializer.deserialize_map(FieldUpdateVisitor)
    }
}

/// Field name → column name translation.
///
/// Fields without an entry (or with an empty one) keep their own name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMap<'a> {
    pairs: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnMap<'a> {
    /// Translation that keeps every field name as is.
    pub const EMPTY: ColumnMap<'static> = ColumnMap { pairs: &[] };

    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        Self { pairs }
    }

    /// Storage column for `field`.
    pub fn resolve<'s>(&'s self, field: &'s str) -> &'s str {
        self.pairs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, column)| *column)
            .filter(|column| !column.is_empty())
            .unwrap_or(field)
    }
}

/// Build the assignment list for `UPDATE ... SET <clause>`.
///
/// Each field becomes `"<column>"=$N` in insertion order, N starting at 1,
/// joined with `", "`. The values come back in the same order.
///
/// # Errors
///
/// - [`JoblyError::NoFields`] when `fields` is empty
/// - [`JoblyError::Validation`] when a field resolves to an empty column name
///   or two fields resolve to the same column
pub fn build_update_clause(fields: &FieldUpdate, columns: &ColumnMap<'_>) -> JoblyResult<Clause> {
    if fields.is_empty() {
        return Err(JoblyError::NoFields);
    }

    let mut writer = ClauseWriter::with_capacity(fields.len());
    let mut assigned = HashSet::with_capacity(fields.len());
    for (field, value) in fields.iter() {
        let column = columns.resolve(field);
        if !assigned.insert(column) {
            return Err(JoblyError::validation(format!(
                "Column \"{column}\" is assigned more than once"
            )));
        }
        writer.push(column, "=", value.clone())?;
    }

    Ok(writer.finish(Connective::Comma))
}
