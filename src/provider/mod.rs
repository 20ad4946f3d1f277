//! Provider system: ingestion capabilities and the pool that names them
//!
//! ## Key Components
//!
//! - [`MediaProvider`] - Main trait for implementing media ingestion
//! - [`FileProvider`] - Built-in generic binary provider
//! - [`ImageProvider`] - Built-in image provider with dimension capture
//! - [`Pool`] - Registry mapping provider names to instances
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediabox::provider::Pool;
//!
//! let pool = Pool::from_config(&config);
//! let provider = pool.provider("image")?;
//! provider.transform(&mut media).await?;
//! ```

mod file;
mod image;
mod pool;
mod traits;

pub use file::FileProvider;
pub use image::ImageProvider;
pub use pool::{Pool, PoolError, ProviderConstraints};
pub use traits::{MediaProvider, ProviderError};
