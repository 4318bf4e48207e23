use crate::config::{validate_settings, ProviderSettings};
use crate::errors::AppResult;
use crate::uploader::ProviderClient;

/// Validate settings and build the client every upload goes through.
///
/// Calling this again with the same settings gives an equivalent client;
/// nothing is shared or accumulated between calls.
pub fn configure_provider(settings: ProviderSettings) -> AppResult<ProviderClient> {
    validate_settings(&settings)?;
    let cloud_name = settings.credentials.cloud_name.clone();
    let client = ProviderClient::new(settings)?;
    log::info!("Media provider configured for cloud '{}'", cloud_name);
    Ok(client)
}

pub fn configure_provider_from_env() -> AppResult<ProviderClient> {
    configure_provider(ProviderSettings::from_env()?)
}

/// Best-effort startup: failures are logged and swallowed so the rest of
/// the process keeps running. Uploads then fail at first use.
pub fn try_configure_provider<F>(lookup: F) -> Option<ProviderClient>
where
    F: Fn(&str) -> Option<String>,
{
    match ProviderSettings::from_lookup(lookup).and_then(configure_provider) {
        Ok(client) => Some(client),
        Err(e) => {
            log::error!("Failed to configure media provider: {}", e);
            None
        }
    }
}

pub fn try_configure_provider_from_env() -> Option<ProviderClient> {
    match configure_provider_from_env() {
        Ok(client) => Some(client),
        Err(e) => {
            log::error!("Failed to configure media provider: {}", e);
            None
        }
    }
}
