// src/api/mod.rs
//! WMS interaction: the ability to retrieve one rendered tile per parameter value.
//!
//! Business logic depends on [`TileSource`], never on HTTP details. The
//! concurrent fan-out/fan-in lives in [`parallel_fetcher`], fed by the lazy
//! [`url_generator`].

pub mod client;
mod parallel_fetcher;
pub mod url_generator;

use crate::error::AppError;
use url::Url;

/// The ability to retrieve a rendered map tile.
///
/// One call is one outbound request; implementations never retry.
#[async_trait::async_trait]
pub trait TileSource: Send + Sync {
    async fn fetch_tile(&self, url: &Url) -> Result<Vec<u8>, AppError>;
}

// Re-export the public interface
pub use client::WmsHttpClient;
pub use parallel_fetcher::TileFetcher;
pub use url_generator::UrlGenerator;
