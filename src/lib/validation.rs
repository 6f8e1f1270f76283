//! Input validation utilities
//!
//! Common validation for command-line parameters and file paths, with
//! consistent error messages built on [`crate::errors`].

use std::path::Path;

use crate::errors::{Result, StorymillError};

/// Validate that a file exists.
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "input file")
///
/// # Errors
/// Returns an error if the file does not exist
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(StorymillError::InvalidInputFile {
            description: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "file does not exist".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_rejected() {
        let result = validate_file_exists("/nonexistent/stories.txt", "input file");
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("input file"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_existing_file_is_accepted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "horror").unwrap();
        assert!(validate_file_exists(file.path(), "input file").is_ok());
    }
}
