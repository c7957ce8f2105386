//! Column identifier rendering.
//!
//! Every column that ends up in a generated clause is written as a quoted
//! identifier. Quoting keeps mixed-case and reserved names intact and, with
//! embedded `"` doubled, means a field name taken from a request payload can
//! never terminate the identifier and inject SQL.
//!
//! - empty names are rejected
//! - names containing NUL are rejected
//! - `"` is escaped as `""`

use crate::error::{JoblyError, JoblyResult};

/// Append `name` to `out` as a quoted SQL identifier.
pub(crate) fn write_quoted(name: &str, out: &mut String) -> JoblyResult<()> {
    if name.is_empty() {
        return Err(JoblyError::validation("Column name cannot be empty"));
    }
    if name.contains('\0') {
        return Err(JoblyError::validation(
            "Column name cannot contain NUL character",
        ));
    }

    out.reserve(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    Ok(())
}

/// Render `name` as a quoted SQL identifier.
pub fn quote_column(name: &str) -> JoblyResult<String> {
    let mut out = String::new();
    write_quoted(name, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote_column("first_name").unwrap(), r#""first_name""#);
    }

    #[test]
    fn quote_keeps_case() {
        assert_eq!(quote_column("logoUrl").unwrap(), r#""logoUrl""#);
    }

    #[test]
    fn quote_escapes_embedded_quote() {
        assert_eq!(
            quote_column(r#"name"=1; DROP TABLE jobs; --"#).unwrap(),
            r#""name""=1; DROP TABLE jobs; --""#
        );
    }

    #[test]
    fn quote_rejects_empty() {
        assert!(quote_column("").is_err());
    }

    #[test]
    fn quote_rejects_nul() {
        assert!(quote_column("a\0b").is_err());
    }
}
