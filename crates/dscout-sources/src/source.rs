use async_trait::async_trait;
use dscout_core::{AppConfig, DemandSignal, Platform};

use crate::error::SourceError;
use crate::producthunt::ProductHuntSource;
use crate::v2ex::V2exSource;
use crate::zhihu::ZhihuSource;

/// One platform's demand-signal source.
///
/// Contract:
/// - `fetch` returns at most `limit` signals, never padded.
/// - Every returned signal carries this adapter's platform, the stamped
///   keyword, and a non-empty trimmed title.
/// - Failures never escape as panics; they are [`SourceError`] values.
/// - An adapter lacking required credentials fails with
///   [`SourceError::Unauthorized`] before any network I/O.
#[async_trait]
pub trait DemandSource: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch(&self, keyword: &str, limit: usize)
        -> Result<Vec<DemandSignal>, SourceError>;
}

/// Construct the adapters for the selected platforms, in stable
/// [`Platform`] order.
///
/// The caller passes the already-normalized platform set from the
/// `SearchRequest`; unknown platforms cannot occur by construction.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if an underlying HTTP client cannot be
/// built.
pub fn build_sources(
    config: &AppConfig,
    platforms: &[Platform],
) -> Result<Vec<Box<dyn DemandSource>>, SourceError> {
    let mut sources: Vec<Box<dyn DemandSource>> = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let source: Box<dyn DemandSource> = match platform {
            Platform::Zhihu => Box::new(ZhihuSource::new(config)?),
            Platform::V2ex => Box::new(V2exSource::new(config)?),
            Platform::ProductHunt => Box::new(ProductHuntSource::new(config)?),
        };
        sources.push(source);
    }
    Ok(sources)
}
