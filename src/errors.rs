use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required setting: {name}")]
    MissingSetting { name: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Provider rejected credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Provider rejected upload ({status}): {message}")]
    ProviderRejected { status: u16, message: String },
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn missing_setting(name: &str) -> Self {
        Self::MissingSetting {
            name: name.to_string(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn not_configured() -> Self {
        Self::Config("media provider is not configured".to_string())
    }

    /// Whether a caller could reasonably try the same upload again.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::ProviderRejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::MissingSetting { .. }
                | AppError::Validation { .. }
                | AppError::FileNotFound { .. }
                | AppError::InvalidCredentials { .. }
        ) || matches!(self, AppError::ProviderRejected { status, .. } if (400..500).contains(status) && *status != 429)
    }
}
