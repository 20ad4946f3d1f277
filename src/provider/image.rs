use async_trait::async_trait;

use super::pool::ProviderConstraints;
use super::traits::{MediaProvider, ProviderError, generate_reference};
use crate::media::{Media, ProviderStatus};

/// Image provider
///
/// File semantics plus dimension capture: PNG and GIF headers are
/// sniffed for width/height; other formats keep the fields unset.
#[derive(Clone)]
pub struct ImageProvider {
    name: String,
    constraints: ProviderConstraints,
}

impl ImageProvider {
    pub fn new(name: impl Into<String>, constraints: ProviderConstraints) -> Self {
        Self {
            name: name.into(),
            constraints,
        }
    }
}

#[async_trait]
impl MediaProvider for ImageProvider {
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
        let content_type = content
            .declared_content_type()
            .unwrap_or(mime::IMAGE_STAR.as_ref())
            .to_string();
        let file_name = content.file_name().map(str::to_string);
        let data = content.load().await?;
        let dimensions = sniff_dimensions(&data);

        media.provider_reference = reference;
        media.content_type = Some(content_type);
        media.size = Some(data.len() as u64);
        if media.name.is_none() {
            media.name = file_name;
        }
        if let Some((width, height)) = dimensions {
            media.width = Some(width);
            media.height = Some(height);
        }
        media.provider_status = ProviderStatus::Ok;
        media.touch();

        Ok(())
    }
}

/// Read pixel dimensions from PNG or GIF headers.
fn sniff_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    if data.len() >= 24 && data.starts_with(PNG_SIGNATURE) {
        // IHDR is mandatory as the first chunk; width/height at offsets 16/20
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((width, height));
    }

    if data.len() >= 10 && (data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")) {
        let width = u16::from_le_bytes([data[6], data[7]]) as u32;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((width, height));
    }

    None
}
