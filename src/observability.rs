//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    media_ingested: AtomicU64,
    ingest_failed: AtomicU64,
    bytes_stored: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn media_ingested(&self) {
        self.media_ingested.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "media_ingested", "Metric incremented");
    }

    pub fn ingest_failed(&self) {
        self.ingest_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "ingest_failed", "Metric incremented");
    }

    pub fn bytes_stored(&self, count: u64) {
        self.bytes_stored.fetch_add(count, Ordering::Relaxed);
        tracing::debug!(counter = "bytes_stored", count, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            media_ingested: self.media_ingested.load(Ordering::Relaxed),
            ingest_failed: self.ingest_failed.load(Ordering::Relaxed),
            bytes_stored: self.bytes_stored.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub media_ingested: u64,
    pub ingest_failed: u64,
    pub bytes_stored: u64,
}
