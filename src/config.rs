use std::fmt;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";
pub const API_KEY_VAR: &str = "CLOUDINARY_API_KEY";
pub const API_SECRET_VAR: &str = "CLOUDINARY_API_SECRET";
pub const IMAGE_FOLDER_VAR: &str = "CLOUDINARY_FOLDER_NAME";
pub const VIDEO_FOLDER_VAR: &str = "CLOUDINARY_FOLDER_VIDEO";
pub const API_BASE_URL_VAR: &str = "CLOUDINARY_API_BASE_URL";
pub const TIMEOUT_SECS_VAR: &str = "CLOUDINARY_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Account credentials for the media provider. Loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl ProviderCredentials {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

// Keys stay out of logs.
impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Folders used when an upload request does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDefaults {
    pub image: String,
    pub video: String,
}

impl FolderDefaults {
    pub fn new(image: impl Into<String>, video: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            video: video.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub credentials: ProviderCredentials,
    pub folders: FolderDefaults,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(credentials: ProviderCredentials, folders: FolderDefaults) -> Self {
        Self {
            credentials,
            folders,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build settings from an arbitrary key lookup. Values are trimmed and
    /// empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| -> Option<String> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required =
            |name: &str| -> AppResult<String> { read(name).ok_or_else(|| AppError::missing_setting(name)) };

        let credentials = ProviderCredentials::new(
            required(CLOUD_NAME_VAR)?,
            required(API_KEY_VAR)?,
            required(API_SECRET_VAR)?,
        );
        let folders = FolderDefaults::new(required(IMAGE_FOLDER_VAR)?, required(VIDEO_FOLDER_VAR)?);

        let mut settings = Self::new(credentials, folders);

        if let Some(url) = read(API_BASE_URL_VAR) {
            settings.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = read(TIMEOUT_SECS_VAR) {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| AppError::validation(TIMEOUT_SECS_VAR, "Must be a whole number of seconds"))?;
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }

    /// Load settings from the process environment, reading `.env` first if
    /// one is present.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to read .env file: {}", e);
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

pub fn validate_settings(settings: &ProviderSettings) -> AppResult<()> {
    let credentials = &settings.credentials;

    if credentials.cloud_name.trim().is_empty() {
        return Err(AppError::validation("cloud_name", "Cloud name cannot be empty"));
    }

    if credentials
        .cloud_name
        .chars()
        .any(|c| c == '/' || c.is_whitespace())
    {
        return Err(AppError::validation("cloud_name", "Cloud name contains invalid characters"));
    }

    if credentials.api_key.trim().is_empty() {
        return Err(AppError::validation("api_key", "API key cannot be empty"));
    }

    if credentials.api_secret.trim().is_empty() {
        return Err(AppError::validation("api_secret", "API secret cannot be empty"));
    }

    if settings.folders.image.trim().is_empty() {
        return Err(AppError::validation("folders.image", "Default image folder cannot be empty"));
    }

    if settings.folders.video.trim().is_empty() {
        return Err(AppError::validation("folders.video", "Default video folder cannot be empty"));
    }

    let url = settings.api_base_url.as_str();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(AppError::validation("api_base_url", "Must be an http(s) URL"));
    }

    if settings.timeout.is_zero() {
        return Err(AppError::validation("timeout", "Must be greater than 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (CLOUD_NAME_VAR, "skillverse"),
            (API_KEY_VAR, "123456789"),
            (API_SECRET_VAR, "shhh"),
            (IMAGE_FOLDER_VAR, "images"),
            (VIDEO_FOLDER_VAR, "videos"),
        ])
    }

    fn lookup<'a>(env: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| env.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_from_lookup_reads_all_settings() {
        let env = full_env();
        let settings = ProviderSettings::from_lookup(lookup(&env)).unwrap();

        assert_eq!(settings.credentials.cloud_name, "skillverse");
        assert_eq!(settings.credentials.api_key, "123456789");
        assert_eq!(settings.credentials.api_secret, "shhh");
        assert_eq!(settings.folders, FolderDefaults::new("images", "videos"));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_missing_secret_is_reported_by_name() {
        let mut env = full_env();
        env.remove(API_SECRET_VAR);

        match ProviderSettings::from_lookup(lookup(&env)) {
            Err(AppError::MissingSetting { name }) => assert_eq!(name, API_SECRET_VAR),
            other => panic!("Expected missing setting error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut env = full_env();
        env.insert(VIDEO_FOLDER_VAR, "   ");

        let result = ProviderSettings::from_lookup(lookup(&env));
        assert!(matches!(result, Err(AppError::MissingSetting { name }) if name == VIDEO_FOLDER_VAR));
    }

    #[test]
    fn test_optional_overrides() {
        let mut env = full_env();
        env.insert(API_BASE_URL_VAR, "http://localhost:9000/v1_1/");
        env.insert(TIMEOUT_SECS_VAR, "15");

        let settings = ProviderSettings::from_lookup(lookup(&env)).unwrap();
        assert_eq!(settings.api_base_url, "http://localhost:9000/v1_1");
        assert_eq!(settings.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut env = full_env();
        env.insert(TIMEOUT_SECS_VAR, "soon");

        let result = ProviderSettings::from_lookup(lookup(&env));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_validate_settings_rejects_bad_values() {
        let base = ProviderSettings::new(
            ProviderCredentials::new("skillverse", "key", "secret"),
            FolderDefaults::new("images", "videos"),
        );
        assert!(validate_settings(&base).is_ok());

        let zero_timeout = base.clone().with_timeout(Duration::ZERO);
        assert!(validate_settings(&zero_timeout).is_err());

        let bad_url = base.clone().with_api_base_url("ftp://example.com");
        assert!(validate_settings(&bad_url).is_err());

        let mut bad_cloud = base.clone();
        bad_cloud.credentials.cloud_name = "sky verse".to_string();
        assert!(validate_settings(&bad_cloud).is_err());

        let mut empty_folder = base;
        empty_folder.folders.image = String::new();
        assert!(validate_settings(&empty_folder).is_err());
    }

    #[test]
    fn test_debug_output_hides_keys() {
        let credentials = ProviderCredentials::new("skillverse", "visible-key", "visible-secret");
        let rendered = format!("{:?}", credentials);

        assert!(rendered.contains("skillverse"));
        assert!(!rendered.contains("visible-key"));
        assert!(!rendered.contains("visible-secret"));
    }
}
