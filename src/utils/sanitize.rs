/// Strips non-breaking-space characters (U+00A0) from a header or cell value.
///
/// Spreadsheet exports routinely pad cells with NBSP instead of regular
/// spaces, which then leaks into column names and stored data.
pub fn strip_nbsp(value: &str) -> String {
    if !value.contains('\u{00A0}') {
        return value.to_string();
    }
    value.chars().filter(|&c| c != '\u{00A0}').collect()
}

/// Quotes an identifier for inclusion in SQLite DDL/DML.
///
/// Column names come straight from user-supplied header rows, so they are
/// always double-quoted with embedded quotes doubled. Values are never
/// spliced into statements; they go through bind parameters instead.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_nbsp_trailing() {
        assert_eq!(strip_nbsp("Name\u{00A0}"), "Name");
    }

    #[test]
    fn test_strip_nbsp_embedded() {
        assert_eq!(strip_nbsp("First\u{00A0}Name"), "FirstName");
    }

    #[test]
    fn test_strip_nbsp_noop() {
        assert_eq!(strip_nbsp("plain value"), "plain value");
    }

    #[test]
    fn test_quote_ident_plain() {
        assert_eq!(quote_ident("first_name"), "\"first_name\"");
    }

    #[test]
    fn test_quote_ident_embedded_quote() {
        assert_eq!(quote_ident("na\"me"), "\"na\"\"me\"");
    }

    #[test]
    fn test_quote_ident_empty() {
        // Empty header names pass through as-is; SQLite accepts "" as a name.
        assert_eq!(quote_ident(""), "\"\"");
    }
}
