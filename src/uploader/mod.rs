// Media uploader - turns a staged file plus placement options into one
// signed upload against the media provider

pub mod cloud_client;
pub mod options;
pub mod signature;

pub use cloud_client::{require_client, upload_media, ProviderClient, UploadResult};
pub use options::{resolve_folder, ResourceType, UploadOptions, UploadRequest};
