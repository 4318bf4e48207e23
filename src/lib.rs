//! Media upload core for the SkillVerse course marketplace.
//!
//! Configure once at startup with [`configure_provider`] (or the best-effort
//! [`try_configure_provider_from_env`]), then hand the returned
//! [`ProviderClient`] to whatever handles incoming media.

pub mod config;
pub mod errors;
pub mod provider;
pub mod security;
pub mod uploader;

pub use config::{FolderDefaults, ProviderCredentials, ProviderSettings};
pub use errors::{AppError, AppResult};
pub use provider::{
    configure_provider, configure_provider_from_env, try_configure_provider,
    try_configure_provider_from_env,
};
pub use uploader::{
    require_client, upload_media, ProviderClient, ResourceType, UploadOptions, UploadRequest,
    UploadResult,
};

/// Install `env_logger`, defaulting to `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
