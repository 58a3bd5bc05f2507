use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Template directory not found: {}", .0.display())]
    TemplatesMissing(PathBuf),

    #[error("No templates available in {}", .0.display())]
    NoTemplates(PathBuf),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl AppError {
    /// True when the underlying I/O failure was a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            AppError::Read { source, .. } | AppError::Write { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
        assert!(app_err.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Settings("invalid font size".to_string());
        assert_eq!(err.to_string(), "Settings error: invalid font size");

        let err = AppError::NoTemplates(PathBuf::from("/notes/templates"));
        assert_eq!(err.to_string(), "No templates available in /notes/templates");

        let err = AppError::Read {
            path: PathBuf::from("/notes/a.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Could not read /notes/a.md: denied");
        assert!(!err.is_not_found());
    }
}
