use std::sync::Arc;
use tracing::info;

use crate::cli::IngestArgs;
use mediabox::config::Config;
use mediabox::form::{FormValue, ProviderDataTransformer, TransformerOptions};
use mediabox::media::{BinaryContent, Media, ProviderStatus};
use mediabox::observability::Metrics;
use mediabox::provider::Pool;
use mediabox::storage::ContentStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(args: IngestArgs) -> Result<(), AnyError> {
    let config = Config::load()?;
    let pool = Arc::new(Pool::from_config(&config));
    let store = ContentStore::from_config(&config.storage)?;
    let metrics = Arc::new(Metrics::new());

    let context = args
        .context
        .unwrap_or_else(|| pool.default_context().to_string());

    let media = Media::new(args.provider.clone(), context)
        .with_binary_content(BinaryContent::from_path(args.path));

    let options = TransformerOptions {
        new_on_update: config.form.new_on_update,
        empty_on_new: config.form.empty_on_new,
    };
    let transformer = ProviderDataTransformer::new(pool.clone(), options)
        .with_metrics(metrics.clone());

    let value = transformer
        .reverse_transform(FormValue::Media(media))
        .await?;

    let FormValue::Media(media) = value else {
        unreachable!("reverse_transform preserves the value kind");
    };

    if media.provider_status == ProviderStatus::Ok {
        let provider = pool.provider(&media.provider_name)?;
        let written = provider.write_contents(&media, &store).await?;
        metrics.bytes_stored(written.size as u64);
        info!(key = %written.key, size = written.size, "Media contents written");
    }

    println!("{}", serde_json::to_string_pretty(&media)?);

    let snapshot = metrics.snapshot();
    info!(
        ingested = snapshot.media_ingested,
        failed = snapshot.ingest_failed,
        bytes = snapshot.bytes_stored,
        "Ingest finished"
    );

    Ok(())
}
