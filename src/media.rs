//! Media entity and binary content types
//!
//! A [`Media`] is the mutable record tracking an uploaded asset through
//! ingestion: which provider owns it, where its binary reference lives,
//! and what state the ingestion is in. The entity is created by upstream
//! code (CLI, form layer) and mutated by providers during
//! [`MediaProvider::transform`](crate::provider::MediaProvider::transform).

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker reference meaning "no binary has been assigned yet".
pub const MISSING_BINARY_REFERENCE: &str = "missing_binary_reference";

/// Ingestion state of a media entity.
///
/// Numeric codes follow the persisted representation: Ok = 1,
/// Sending = 2, Pending = 3, Error = 4, EncodingError = 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Ok,
    Sending,
    Pending,
    Error,
    EncodingError,
}

impl ProviderStatus {
    pub fn code(&self) -> u8 {
        match self {
            ProviderStatus::Ok => 1,
            ProviderStatus::Sending => 2,
            ProviderStatus::Pending => 3,
            ProviderStatus::Error => 4,
            ProviderStatus::EncodingError => 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Raw upload payload attached to a media entity before ingestion.
///
/// Either an in-memory buffer carrying the metadata a browser upload
/// would declare, or a path to a local file that is read lazily.
#[derive(Debug, Clone)]
pub enum BinaryContent {
    Bytes {
        file_name: String,
        content_type: Option<String>,
        data: Bytes,
    },
    File(PathBuf),
}

impl BinaryContent {
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        BinaryContent::Bytes {
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        BinaryContent::File(path.into())
    }

    /// Name of the uploaded file, as declared or derived from the path.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            BinaryContent::Bytes { file_name, .. } => Some(file_name.as_str()),
            BinaryContent::File(path) => path.file_name().and_then(|n| n.to_str()),
        }
    }

    /// Lowercased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Content type declared by the upload, if any. File-backed content
    /// declares nothing; providers fall back to their own defaults.
    pub fn declared_content_type(&self) -> Option<&str> {
        match self {
            BinaryContent::Bytes { content_type, .. } => content_type.as_deref(),
            BinaryContent::File(_) => None,
        }
    }

    /// Load the full payload into memory.
    pub async fn load(&self) -> Result<Bytes, ContentError> {
        match self {
            BinaryContent::Bytes { data, .. } => Ok(data.clone()),
            BinaryContent::File(path) => {
                let data = tokio::fs::read(path)
                    .await
                    .map_err(|source| ContentError::Unreadable {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Bytes::from(data))
            }
        }
    }

    /// Payload size in bytes.
    pub async fn size(&self) -> Result<u64, ContentError> {
        match self {
            BinaryContent::Bytes { data, .. } => Ok(data.len() as u64),
            BinaryContent::File(path) => {
                let meta = tokio::fs::metadata(path)
                    .await
                    .map_err(|source| ContentError::Unreadable {
                        path: path.clone(),
                        source,
                    })?;
                Ok(meta.len())
            }
        }
    }
}

/// The media entity.
///
/// `id` stays `None` until the entity is persisted by a collaborator
/// outside this crate; the reverse transformer uses its absence to tell
/// freshly created media apart from updates. `binary_content` is
/// transient and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub provider_name: String,
    pub context: String,
    pub provider_reference: String,
    pub provider_status: ProviderStatus,
    #[serde(default)]
    pub provider_metadata: serde_json::Value,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub enabled: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip)]
    pub binary_content: Option<BinaryContent>,
}

impl Media {
    pub fn new(provider_name: impl Into<String>, context: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: None,
            name: None,
            description: None,
            provider_name: provider_name.into(),
            context: context.into(),
            provider_reference: MISSING_BINARY_REFERENCE.to_string(),
            provider_status: ProviderStatus::Pending,
            provider_metadata: serde_json::Value::Null,
            content_type: None,
            size: None,
            width: None,
            height: None,
            enabled: false,
            created_at: now,
            updated_at: now,
            binary_content: None,
        }
    }

    pub fn with_binary_content(mut self, content: BinaryContent) -> Self {
        self.binary_content = Some(content);
        self
    }

    pub fn has_binary_content(&self) -> bool {
        self.binary_content.is_some()
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}
