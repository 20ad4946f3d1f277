//! Reverse-transform behavior of the form data transformer

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mediabox::form::{FormValue, ProviderDataTransformer, TransformError, TransformerOptions};
use mediabox::media::{BinaryContent, MISSING_BINARY_REFERENCE, Media, ProviderStatus};
use mediabox::provider::{FileProvider, MediaProvider, Pool, ProviderConstraints, ProviderError};

/// Provider that records how often it was invoked
struct CountingProvider {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingProvider {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProvider for CountingProvider {
    fn name(&self) -> &str {
        "default"
    }

    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::ExtensionNotAllowed("bin".to_string()));
        }
        media.provider_reference = "resolved-reference".to_string();
        media.provider_status = ProviderStatus::Ok;
        Ok(())
    }
}

fn pool_with(provider: Arc<CountingProvider>) -> Arc<Pool> {
    let mut pool = Pool::new("default");
    pool.add_provider("default", provider);
    Arc::new(pool)
}

fn no_replace_options() -> TransformerOptions {
    TransformerOptions {
        new_on_update: false,
        empty_on_new: true,
    }
}

fn media_with_content() -> Media {
    let mut media = Media::new("default", "default")
        .with_binary_content(BinaryContent::from_bytes("upload.bin", None, vec![0u8; 8]));
    media.id = Some(1);
    media
}

#[tokio::test]
async fn reverse_transform_passes_opaque_value_through() {
    let transformer =
        ProviderDataTransformer::new(Arc::new(Pool::new("default")), no_replace_options());

    let result = transformer
        .reverse_transform(FormValue::Opaque(json!("foo")))
        .await
        .unwrap();

    assert!(matches!(result, FormValue::Opaque(v) if v == "foo"));
}

#[tokio::test]
async fn reverse_transform_unknown_provider_fails() {
    let transformer =
        ProviderDataTransformer::new(Arc::new(Pool::new("default")), no_replace_options());

    let mut media = media_with_content();
    media.provider_name = "unknown".to_string();

    let result = transformer.reverse_transform(FormValue::Media(media)).await;

    assert!(matches!(
        result,
        Err(TransformError::UnknownProvider(_))
    ));
}

#[tokio::test]
async fn reverse_transform_invokes_provider_exactly_once() {
    let provider = CountingProvider::succeeding();
    let transformer = ProviderDataTransformer::new(pool_with(provider.clone()), no_replace_options());

    let result = transformer
        .reverse_transform(FormValue::Media(media_with_content()))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
    let FormValue::Media(media) = result else {
        panic!("expected a media value");
    };
    assert_eq!(media.provider_reference, "resolved-reference");
    assert_eq!(media.provider_status, ProviderStatus::Ok);
}

#[tokio::test]
async fn reverse_transform_resets_new_media_without_content() {
    let provider = CountingProvider::succeeding();
    let transformer = ProviderDataTransformer::new(pool_with(provider.clone()), no_replace_options());

    let mut media = Media::new("default", "default");
    media.provider_reference = "stale-reference".to_string();
    media.provider_status = ProviderStatus::Ok;

    let result = transformer
        .reverse_transform(FormValue::Media(media))
        .await
        .unwrap();

    let FormValue::Media(media) = result else {
        panic!("expected a media value");
    };
    assert_eq!(media.provider_reference, MISSING_BINARY_REFERENCE);
    assert_eq!(media.provider_status, ProviderStatus::Pending);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn reverse_transform_leaves_existing_media_without_content_untouched() {
    let provider = CountingProvider::succeeding();
    let transformer = ProviderDataTransformer::new(pool_with(provider.clone()), no_replace_options());

    let mut media = Media::new("default", "default");
    media.id = Some(1);
    media.provider_reference = "existing-reference".to_string();
    media.provider_status = ProviderStatus::Ok;

    let result = transformer
        .reverse_transform(FormValue::Media(media))
        .await
        .unwrap();

    let FormValue::Media(media) = result else {
        panic!("expected a media value");
    };
    assert_eq!(media.provider_reference, "existing-reference");
    assert_eq!(media.provider_status, ProviderStatus::Ok);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn reverse_transform_with_file_backed_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

    let mut pool = Pool::new("default");
    pool.add_provider(
        "file",
        Arc::new(FileProvider::new("file", ProviderConstraints::default())),
    );
    let transformer = ProviderDataTransformer::new(Arc::new(pool), no_replace_options());

    let mut media =
        Media::new("file", "default").with_binary_content(BinaryContent::from_path(&path));
    media.id = Some(1);

    let result = transformer
        .reverse_transform(FormValue::Media(media))
        .await
        .unwrap();

    let FormValue::Media(media) = result else {
        panic!("expected a media value");
    };
    assert_eq!(media.provider_status, ProviderStatus::Ok);
    assert!(media.provider_reference.ends_with(".pdf"));
    assert_eq!(media.size, Some(13));
}

#[tokio::test]
async fn reverse_transform_swallows_provider_failure() {
    let provider = CountingProvider::failing();
    let transformer = ProviderDataTransformer::new(pool_with(provider.clone()), no_replace_options());

    let result = transformer
        .reverse_transform(FormValue::Media(media_with_content()))
        .await;

    // The provider error must never reach the caller
    assert!(result.is_ok());
    assert_eq!(provider.calls(), 1);
}

mod failure_logging {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    /// Layer counting ERROR-level events
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn reverse_transform_logs_provider_failure_once() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(async {
                let provider = CountingProvider::failing();
                let transformer =
                    ProviderDataTransformer::new(pool_with(provider), no_replace_options());

                let result = transformer
                    .reverse_transform(FormValue::Media(media_with_content()))
                    .await;
                assert!(result.is_ok());
            });
        });

        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn successful_transform_logs_no_errors() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(async {
                let provider = CountingProvider::succeeding();
                let transformer =
                    ProviderDataTransformer::new(pool_with(provider), no_replace_options());

                let result = transformer
                    .reverse_transform(FormValue::Media(media_with_content()))
                    .await;
                assert!(result.is_ok());
            });
        });

        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }
}
