use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FolderDefaults;

/// Provider-side classification of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Video,
    Auto,
}

impl ResourceType {
    pub fn for_upload(is_video: bool) -> Self {
        if is_video {
            ResourceType::Video
        } else {
            ResourceType::Auto
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Video => "video",
            ResourceType::Auto => "auto",
        }
    }
}

/// One staged file plus where and how it should land on the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub source_path: String,
    pub folder: Option<String>,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    #[serde(default)]
    pub is_video: bool,
}

impl UploadRequest {
    pub fn image(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Self::default()
        }
    }

    pub fn video(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            is_video: true,
            ..Self::default()
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// Options sent with an upload, derived from a request and the folder defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    pub resource_type: ResourceType,
}

/// Pick the target folder: the request's own folder if it has one,
/// otherwise the default for its media kind.
pub fn resolve_folder(request: &UploadRequest, defaults: &FolderDefaults) -> String {
    match request.folder.as_deref() {
        Some(folder) if !folder.is_empty() => folder.to_string(),
        _ if request.is_video => defaults.video.clone(),
        _ => defaults.image.clone(),
    }
}

impl UploadOptions {
    /// Zero height or quality is treated the same as not supplying one.
    pub fn resolve(request: &UploadRequest, defaults: &FolderDefaults) -> Self {
        Self {
            folder: resolve_folder(request, defaults),
            height: request.height.filter(|h| *h > 0),
            quality: request.quality.filter(|q| *q > 0),
            resource_type: ResourceType::for_upload(request.is_video),
        }
    }

    /// Incoming transformation string, e.g. `h_200,q_80`. `None` when neither
    /// height nor quality is set.
    pub fn transformation(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.height.map(|h| format!("h_{}", h)),
            self.quality.map(|q| format!("q_{}", q)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }

    /// Upload parameters as the provider signs them. The resource type
    /// travels in the URL path, not here.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("folder".to_string(), self.folder.clone());
        if let Some(transformation) = self.transformation() {
            params.insert("transformation".to_string(), transformation);
        }
        params
    }
}
