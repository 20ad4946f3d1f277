use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::media::{BinaryContent, Media};
use crate::storage::{ContentStore, StorageError, StoredObject};

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("media has no binary content")]
    MissingBinaryContent,
    #[error("extension '{0}' is not allowed")]
    ExtensionNotAllowed(String),
    #[error("content type '{0}' is not allowed")]
    ContentTypeNotAllowed(String),
    #[error("payload of {actual} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { actual: u64, limit: u64 },
    #[error("unreadable binary content: {0}")]
    UnreadableContent(#[from] crate::media::ContentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Media ingestion capability
///
/// A provider knows how to turn the raw binary content attached to a
/// [`Media`] into a resolved reference: it validates the payload,
/// assigns `provider_reference`, fills the derived fields and flips the
/// status to `Ok`. Persisting the payload is a separate step so callers
/// decide when (and whether) content hits the store.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Registry name this provider is published under
    fn name(&self) -> &str;

    /// Ingest the binary content attached to the media
    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError>;

    /// Write the media payload to the content store
    async fn write_contents(
        &self,
        media: &Media,
        store: &ContentStore,
    ) -> Result<StoredObject, ProviderError> {
        let content = media
            .binary_content
            .as_ref()
            .ok_or(ProviderError::MissingBinaryContent)?;
        let data = content.load().await?;
        let written = store.put(&self.path(media), data.to_vec()).await?;
        Ok(written)
    }

    /// Storage key for the media payload
    fn path(&self, media: &Media) -> String {
        format!(
            "{}/{}/{}",
            media.context, media.provider_name, media.provider_reference
        )
    }
}

/// Generate a unique reference name, preserving the upload's extension.
pub(crate) fn generate_reference(content: &BinaryContent) -> String {
    let token = Uuid::new_v4().simple().to_string();
    match content.extension() {
        Some(ext) => format!("{token}.{ext}"),
        None => token,
    }
}
