use std::path::Path;
use crate::errors::{AppError, AppResult};

pub struct InputValidator;

impl InputValidator {
    /// Check a staged upload file before anything is sent to the provider.
    pub fn validate_source_path(path: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return Err(AppError::validation("source_path", "Source path cannot be empty"));
        }

        let path_obj = Path::new(path);

        // Check for path traversal attempts
        if path_obj
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
            || path.starts_with('~')
        {
            return Err(AppError::validation("source_path", "Invalid file path detected"));
        }

        if !path_obj.exists() {
            return Err(AppError::file_not_found(path));
        }

        if !path_obj.is_file() {
            return Err(AppError::validation("source_path", "Path is not a file"));
        }

        Ok(())
    }
}

pub struct FileSystemGuard;

impl FileSystemGuard {
    pub fn get_file_size(path: &str) -> AppResult<u64> {
        let metadata = std::fs::metadata(path)?;
        Ok(metadata.len())
    }

    pub fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}
