use async_trait::async_trait;

use super::pool::ProviderConstraints;
use super::traits::{MediaProvider, ProviderError, generate_reference};
use crate::media::{Media, ProviderStatus};

/// Generic binary file provider
///
/// Validates the payload against its constraints, assigns a reference
/// name and fills the derived fields. No content inspection beyond the
/// declared metadata.
#[derive(Clone)]
pub struct FileProvider {
    name: String,
    constraints: ProviderConstraints,
}

impl FileProvider {
    pub fn new(name: impl Into<String>, constraints: ProviderConstraints) -> Self {
        Self {
            name: name.into(),
            constraints,
        }
    }
}

#[async_trait]
impl MediaProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError> {
        let content = media
            .binary_content
            .as_ref()
            .ok_or(ProviderError::MissingBinaryContent)?;

        self.constraints.check(content).await?;

        let reference = generate_reference(content);
        let size = content.size().await?;
        let content_type = content
            .declared_content_type()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
            .to_string();
        let file_name = content.file_name().map(str::to_string);

        media.provider_reference = reference;
        media.content_type = Some(content_type);
        media.size = Some(size);
        if media.name.is_none() {
            media.name = file_name;
        }
        media.provider_status = ProviderStatus::Ok;
        media.touch();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{BinaryContent, MISSING_BINARY_REFERENCE};

    fn upload(name: &str, content_type: Option<&str>) -> BinaryContent {
        BinaryContent::from_bytes(name, content_type.map(str::to_string), vec![0u8; 32])
    }

    #[tokio::test]
    async fn test_transform_fills_media_fields() {
        let provider = FileProvider::new("file", ProviderConstraints::default());
        let mut media = Media::new("file", "default")
            .with_binary_content(upload("report.pdf", Some("application/pdf")));

        provider.transform(&mut media).await.unwrap();

        assert_ne!(media.provider_reference, MISSING_BINARY_REFERENCE);
        assert!(media.provider_reference.ends_with(".pdf"));
        assert_eq!(media.provider_status, ProviderStatus::Ok);
        assert_eq!(media.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(media.size, Some(32));
        assert_eq!(media.name.as_deref(), Some("report.pdf"));
    }

    #[tokio::test]
    async fn test_transform_defaults_content_type() {
        let provider = FileProvider::new("file", ProviderConstraints::default());
        let mut media =
            Media::new("file", "default").with_binary_content(upload("blob.bin", None));

        provider.transform(&mut media).await.unwrap();

        assert_eq!(
            media.content_type.as_deref(),
            Some("application/octet-stream")
        );
    }

    #[tokio::test]
    async fn test_transform_keeps_existing_name() {
        let provider = FileProvider::new("file", ProviderConstraints::default());
        let mut media = Media::new("file", "default")
            .with_binary_content(upload("raw-upload.pdf", None));
        media.name = Some("Quarterly report".to_string());

        provider.transform(&mut media).await.unwrap();

        assert_eq!(media.name.as_deref(), Some("Quarterly report"));
    }

    #[tokio::test]
    async fn test_transform_without_content_fails() {
        let provider = FileProvider::new("file", ProviderConstraints::default());
        let mut media = Media::new("file", "default");

        let result = provider.transform(&mut media).await;
        assert!(matches!(result, Err(ProviderError::MissingBinaryContent)));
        assert_eq!(media.provider_status, ProviderStatus::Pending);
    }

    #[tokio::test]
    async fn test_transform_enforces_constraints() {
        let provider = FileProvider::new(
            "file",
            ProviderConstraints {
                allowed_extensions: vec!["pdf".to_string()],
                ..Default::default()
            },
        );
        let mut media =
            Media::new("file", "default").with_binary_content(upload("virus.exe", None));

        let result = provider.transform(&mut media).await;
        assert!(matches!(result, Err(ProviderError::ExtensionNotAllowed(_))));
        assert_eq!(media.provider_reference, MISSING_BINARY_REFERENCE);
    }

    #[tokio::test]
    async fn test_write_contents_stores_under_provider_path() {
        use crate::storage::ContentStore;

        let provider = FileProvider::new("file", ProviderConstraints::default());
        let mut media =
            Media::new("file", "default").with_binary_content(upload("a.bin", None));
        provider.transform(&mut media).await.unwrap();

        let store = ContentStore::in_memory();
        let written = provider.write_contents(&media, &store).await.unwrap();

        assert_eq!(
            written.key,
            format!("default/file/{}", media.provider_reference)
        );
        assert!(store.exists(&written.key).await.unwrap());
    }
}
