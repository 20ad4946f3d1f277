use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::media::{MISSING_BINARY_REFERENCE, Media, ProviderStatus};
use crate::observability::Metrics;
use crate::provider::{Pool, PoolError};

/// A value as submitted through a form field.
///
/// Either a media entity bound by the form layer, or whatever opaque
/// scalar the field happened to carry. Opaque values pass through the
/// transformer untouched.
#[derive(Debug, Clone)]
pub enum FormValue {
    Media(Media),
    Opaque(serde_json::Value),
}

/// Behavior flags for the reverse transformation
#[derive(Debug, Clone, Copy)]
pub struct TransformerOptions {
    /// Treat an existing media with fresh content as newly created
    pub new_on_update: bool,
    /// Reset a new media with no content to an empty pending state
    pub empty_on_new: bool,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        Self {
            new_on_update: true,
            empty_on_new: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    UnknownProvider(#[from] PoolError),
}

/// Converts between media entities and raw form submissions.
///
/// The reverse direction routes submitted content into the provider
/// named on the media. The transformer never picks a provider itself;
/// the name is set by whoever created the entity.
pub struct ProviderDataTransformer {
    pool: Arc<Pool>,
    options: TransformerOptions,
    metrics: Option<Arc<Metrics>>,
}

impl ProviderDataTransformer {
    pub fn new(pool: Arc<Pool>, options: TransformerOptions) -> Self {
        Self {
            pool,
            options,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Forward direction: entity to form representation.
    ///
    /// A missing entity becomes a fresh pending media so the form has
    /// something to bind into; anything else passes through.
    pub fn transform(&self, value: Option<FormValue>) -> FormValue {
        match value {
            Some(value) => value,
            None => FormValue::Media(Media::new(
                String::new(),
                self.pool.default_context().to_string(),
            )),
        }
    }

    /// Reverse direction: form submission back to the entity.
    ///
    /// Unknown provider names fail fast. A provider that errors during
    /// ingestion is logged and swallowed; the media comes back in
    /// whatever state the provider left it.
    pub async fn reverse_transform(&self, value: FormValue) -> Result<FormValue, TransformError> {
        let mut media = match value {
            FormValue::Media(media) => media,
            opaque @ FormValue::Opaque(_) => return Ok(opaque),
        };

        let is_new = media.id.is_none() || self.options.new_on_update;

        if !media.has_binary_content() {
            if is_new && self.options.empty_on_new {
                media.provider_reference = MISSING_BINARY_REFERENCE.to_string();
                media.provider_status = ProviderStatus::Pending;
            }
            return Ok(FormValue::Media(media));
        }

        let provider = self.pool.provider(&media.provider_name)?;

        match provider.transform(&mut media).await {
            Ok(()) => {
                if let Some(metrics) = &self.metrics {
                    metrics.media_ingested();
                }
            }
            Err(err) => {
                // Never let a provider failure escape the form layer
                error!(
                    media_id = ?media.id,
                    provider = %media.provider_name,
                    error = %err,
                    "Provider failed to ingest media content"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.ingest_failed();
                }
            }
        }

        Ok(FormValue::Media(media))
    }
}
