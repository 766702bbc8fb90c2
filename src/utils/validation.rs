use anyhow::{Result, anyhow};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Reduces a submitted file name to its final path component.
///
/// The selection form only ever offers bare file names, so anything with a
/// directory part is treated as a traversal attempt and rejected.
pub fn validate_file_name(file_name: &str) -> Result<String> {
    if file_name.trim().is_empty() {
        return Err(anyhow!(ValidationError {
            code: "MISSING_FILE_NAME",
            message: "No file was selected".to_string(),
        }));
    }

    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", file_name);
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILE_NAME",
            message: format!("'{}' is not a valid file selection", file_name),
        }));
    }

    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILE_NAME",
            message: format!("'{}' is not a valid file selection", file_name),
        }));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_accepted() {
        assert_eq!(validate_file_name("contacts.csv").unwrap(), "contacts.csv");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(validate_file_name("  ").is_err());
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("dir/contacts.csv").is_err());
        assert!(validate_file_name("dir\\contacts.csv").is_err());
    }
}
