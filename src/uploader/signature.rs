use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::config::ProviderCredentials;

use super::options::UploadOptions;

/// Parameters the provider leaves out of the string-to-sign.
const UNSIGNED_PARAMS: [&str; 5] = ["file", "api_key", "resource_type", "cloud_name", "signature"];

/// Sign upload parameters: sorted `k=v` pairs joined by `&`, secret
/// appended, lowercase hex SHA-256.
pub fn sign_params(params: &BTreeMap<String, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(key, value)| !UNSIGNED_PARAMS.contains(&key.as_str()) && !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Every text field of an authenticated upload request.
pub fn signed_upload_params(
    options: &UploadOptions,
    credentials: &ProviderCredentials,
    timestamp: i64,
) -> BTreeMap<String, String> {
    let mut params = options.to_params();
    params.insert("timestamp".to_string(), timestamp.to_string());

    let signature = sign_params(&params, &credentials.api_secret);
    params.insert("api_key".to_string(), credentials.api_key.clone());
    params.insert("signature".to_string(), signature);
    params
}
