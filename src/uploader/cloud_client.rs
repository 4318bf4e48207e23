use crate::config::ProviderSettings;
use crate::errors::{AppError, AppResult};
use crate::security::{FileSystemGuard, InputValidator};
use reqwest::{multipart, Body, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::options::{ResourceType, UploadOptions, UploadRequest};
use super::signature::signed_upload_params;

/// Descriptor returned by the provider after a successful upload.
///
/// Fields the crate does not name are kept in `extra`, so the descriptor
/// reaches the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Configured connection to the media provider.
///
/// Only [`crate::provider::configure_provider`] hands these out, so holding
/// one means the credentials were loaded and validated. Cloning is cheap and
/// clones share the same HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    settings: Arc<ProviderSettings>,
}

impl ProviderClient {
    pub(crate) fn new(settings: ProviderSettings) -> AppResult<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn upload_url(&self, resource_type: ResourceType) -> String {
        format!(
            "{}/{}/{}/upload",
            self.settings.api_base_url.trim_end_matches('/'),
            self.settings.credentials.cloud_name,
            resource_type.as_str()
        )
    }

    /// Upload one staged file. Makes a single request and never retries.
    /// Failures go back to the caller without being logged here.
    pub async fn upload_media(&self, request: &UploadRequest) -> AppResult<UploadResult> {
        InputValidator::validate_source_path(&request.source_path)?;

        let options = UploadOptions::resolve(request, &self.settings.folders);

        let params = signed_upload_params(
            &options,
            &self.settings.credentials,
            chrono::Utc::now().timestamp(),
        );

        let mut payload = UploadPayload::new();
        for (key, value) in params {
            payload.add_text_field(key, value);
        }
        payload.add_file(&request.source_path, "file".to_string())?;

        let url = self.upload_url(options.resource_type);
        log::debug!(
            "Uploading {} ({} bytes) to folder '{}' as {}",
            FileSystemGuard::file_name(&request.source_path),
            payload.total_file_bytes(),
            options.folder,
            options.resource_type.as_str()
        );

        let response = self
            .client
            .post(&url)
            .multipart(payload.build_form().await?)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&response_text)?);
        }

        Err(rejection_error(status, &response_text))
    }
}

/// Free-function form of [`ProviderClient::upload_media`].
pub async fn upload_media(client: &ProviderClient, request: &UploadRequest) -> AppResult<UploadResult> {
    client.upload_media(request).await
}

/// Unwrap the client from a best-effort startup, or report that the
/// provider was never configured.
pub fn require_client(client: Option<&ProviderClient>) -> AppResult<&ProviderClient> {
    client.ok_or_else(AppError::not_configured)
}

fn rejection_error(status: StatusCode, response_text: &str) -> AppError {
    let message = provider_error_message(response_text);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::InvalidCredentials { message },
        _ => AppError::ProviderRejected {
            status: status.as_u16(),
            message,
        },
    }
}

fn provider_error_message(response_text: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(response_text) {
        Ok(body) => body.error.message,
        Err(_) if response_text.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => response_text.chars().take(300).collect(),
    }
}

/// A staged file to attach to the form. Contents are streamed from disk
/// when the form is built, never held in memory.
#[derive(Debug, Clone)]
struct StagedFile {
    path: String,
    filename: String,
    mime_type: String,
    field_name: String,
    size: u64,
}

/// Helper struct to hold upload payload data
#[derive(Debug, Clone, Default)]
pub struct UploadPayload {
    files: Vec<StagedFile>,
    text_fields: HashMap<String, String>,
}

impl UploadPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text_field(&mut self, key: String, value: String) {
        self.text_fields.insert(key, value);
    }

    pub fn add_file(&mut self, file_path: &str, field_name: String) -> AppResult<()> {
        let size = FileSystemGuard::get_file_size(file_path)?;

        self.files.push(StagedFile {
            path: file_path.to_string(),
            filename: FileSystemGuard::file_name(file_path),
            mime_type: detect_mime_type(file_path).to_string(),
            field_name,
            size,
        });
        Ok(())
    }

    pub fn total_file_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Consume the payload into a multipart form, opening each staged file
    /// as a streamed part of known length.
    pub async fn build_form(self) -> AppResult<multipart::Form> {
        let mut form = multipart::Form::new();

        for (key, value) in self.text_fields {
            form = form.text(key, value);
        }

        for staged in self.files {
            let file = tokio::fs::File::open(&staged.path).await?;
            let part = multipart::Part::stream_with_length(Body::from(file), staged.size)
                .file_name(staged.filename)
                .mime_str(&staged.mime_type)?;

            form = form.part(staged.field_name, part);
        }

        Ok(form)
    }
}

/// MIME type from the file extension. Unknown extensions are sent as raw
/// bytes and left for the provider to classify.
pub fn detect_mime_type(file_path: &str) -> &'static str {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
