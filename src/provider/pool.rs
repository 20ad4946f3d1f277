use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::file::FileProvider;
use super::image::ImageProvider;
use super::traits::{MediaProvider, ProviderError};
use crate::config::{Config, ProviderKind};
use crate::media::BinaryContent;

/// Validation rules a provider applies before ingesting a payload
#[derive(Clone, Debug, Default)]
pub struct ProviderConstraints {
    /// Allowed file extensions (lowercase, no dot); empty allows all
    pub allowed_extensions: Vec<String>,
    /// Allowed content types by essence (e.g. "image/png"); empty allows all
    pub allowed_content_types: Vec<String>,
    /// Maximum payload size in bytes
    pub max_payload_bytes: Option<u64>,
}

impl ProviderConstraints {
    pub async fn check(&self, content: &BinaryContent) -> Result<(), ProviderError> {
        if !self.allowed_extensions.is_empty() {
            let ext = content.extension().unwrap_or_default();
            if !self.allowed_extensions.iter().any(|e| *e == ext) {
                return Err(ProviderError::ExtensionNotAllowed(ext));
            }
        }

        if !self.allowed_content_types.is_empty() {
            let declared = content
                .declared_content_type()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref());
            let essence = declared
                .parse::<mime::Mime>()
                .map(|m| m.essence_str().to_string())
                .map_err(|_| ProviderError::ContentTypeNotAllowed(declared.to_string()))?;
            if !self.allowed_content_types.iter().any(|c| *c == essence) {
                return Err(ProviderError::ContentTypeNotAllowed(essence));
            }
        }

        if let Some(limit) = self.max_payload_bytes {
            let actual = content.size().await?;
            if actual > limit {
                return Err(ProviderError::PayloadTooLarge { actual, limit });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("no provider registered under '{0}'")]
    NotFound(String),
    #[error("context '{0}' is not configured")]
    UnknownContext(String),
}

/// Registry mapping provider names to provider instances
///
/// Contexts group providers the way the admin side groups media: each
/// context names the providers allowed to serve it. Lookup by name is
/// the hot path used by the form transformer.
#[derive(Clone)]
pub struct Pool {
    providers: BTreeMap<String, Arc<dyn MediaProvider>>,
    contexts: BTreeMap<String, Vec<String>>,
    default_context: String,
}

impl Pool {
    pub fn new(default_context: impl Into<String>) -> Self {
        Self {
            providers: BTreeMap::new(),
            contexts: BTreeMap::new(),
            default_context: default_context.into(),
        }
    }

    pub fn add_provider(&mut self, name: impl Into<String>, provider: Arc<dyn MediaProvider>) {
        self.providers.insert(name.into(), provider);
    }

    pub fn add_context(&mut self, name: impl Into<String>, providers: Vec<String>) {
        self.contexts.insert(name.into(), providers);
    }

    /// Look up a provider by name; absent names are a caller error
    pub fn provider(&self, name: &str) -> Result<Arc<dyn MediaProvider>, PoolError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| PoolError::NotFound(name.to_string()))
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn context_providers(&self, context: &str) -> Result<&[String], PoolError> {
        self.contexts
            .get(context)
            .map(Vec::as_slice)
            .ok_or_else(|| PoolError::UnknownContext(context.to_string()))
    }

    pub fn default_context(&self) -> &str {
        &self.default_context
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Build the pool from configuration
    ///
    /// Assumes the config has already been validated; context entries
    /// referencing unconfigured providers are skipped here, not errors.
    pub fn from_config(config: &Config) -> Self {
        let mut pool = Self::new(config.default_context.clone());

        for (name, provider_config) in &config.providers {
            let constraints = ProviderConstraints {
                allowed_extensions: provider_config.allowed_extensions.clone(),
                allowed_content_types: provider_config.allowed_content_types.clone(),
                max_payload_bytes: provider_config.max_payload_bytes.map(|b| b.as_u64()),
            };

            let provider: Arc<dyn MediaProvider> = match provider_config.kind {
                ProviderKind::File => Arc::new(FileProvider::new(name.clone(), constraints)),
                ProviderKind::Image => Arc::new(ImageProvider::new(name.clone(), constraints)),
            };

            pool.add_provider(name.clone(), provider);
        }

        for (name, context) in &config.contexts {
            let providers = context
                .providers
                .iter()
                .filter(|p| pool.has_provider(p))
                .cloned()
                .collect();
            pool.add_context(name.clone(), providers);
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unknown_provider_fails() {
        let pool = Pool::new("default");
        let result = pool.provider("vimeo");
        assert!(matches!(result, Err(PoolError::NotFound(name)) if name == "vimeo"));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut pool = Pool::new("default");
        pool.add_provider(
            "file",
            Arc::new(FileProvider::new("file", ProviderConstraints::default())),
        );

        assert!(pool.has_provider("file"));
        assert!(!pool.has_provider("image"));

        let provider = pool.provider("file").unwrap();
        assert_eq!(provider.name(), "file");
    }

    #[test]
    fn test_context_providers() {
        let mut pool = Pool::new("default");
        pool.add_context("default", vec!["file".to_string(), "image".to_string()]);

        assert_eq!(pool.context_providers("default").unwrap().len(), 2);
        assert!(matches!(
            pool.context_providers("news"),
            Err(PoolError::UnknownContext(_))
        ));
    }

    #[tokio::test]
    async fn test_constraints_extension_allowlist() {
        let constraints = ProviderConstraints {
            allowed_extensions: vec!["png".to_string(), "jpg".to_string()],
            ..Default::default()
        };

        let ok = BinaryContent::from_bytes("a.PNG", None, vec![0u8; 4]);
        assert!(constraints.check(&ok).await.is_ok());

        let bad = BinaryContent::from_bytes("a.exe", None, vec![0u8; 4]);
        assert!(matches!(
            constraints.check(&bad).await,
            Err(ProviderError::ExtensionNotAllowed(ext)) if ext == "exe"
        ));
    }

    #[tokio::test]
    async fn test_constraints_content_type_allowlist() {
        let constraints = ProviderConstraints {
            allowed_content_types: vec!["image/png".to_string()],
            ..Default::default()
        };

        let ok = BinaryContent::from_bytes(
            "a.png",
            Some("image/png; charset=binary".to_string()),
            vec![0u8; 4],
        );
        assert!(constraints.check(&ok).await.is_ok());

        // No declared type falls back to application/octet-stream
        let undeclared = BinaryContent::from_bytes("a.png", None, vec![0u8; 4]);
        assert!(matches!(
            constraints.check(&undeclared).await,
            Err(ProviderError::ContentTypeNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn test_constraints_payload_limit() {
        let constraints = ProviderConstraints {
            max_payload_bytes: Some(8),
            ..Default::default()
        };

        let small = BinaryContent::from_bytes("a.bin", None, vec![0u8; 8]);
        assert!(constraints.check(&small).await.is_ok());

        let large = BinaryContent::from_bytes("a.bin", None, vec![0u8; 9]);
        assert!(matches!(
            constraints.check(&large).await,
            Err(ProviderError::PayloadTooLarge { actual: 9, limit: 8 })
        ));
    }
}
