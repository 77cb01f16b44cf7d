pub mod api;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use api::ApiClient;
pub use snapshot::{Snapshot, SnapshotSource};
pub use traits::DealSource;
pub use types::{DealPage, DealQuery, SalesQuery};

use crate::models::{Listing, SalesStatistics};
use crate::normalizer::normalize_listings;
use tracing::warn;

// Upstream failures stop here: callers get an empty, well-formed result and
// the error only shows up in the logs.

/// Deal search that degrades to an empty page
pub async fn fetch_deals(source: &dyn DealSource, query: &DealQuery) -> DealPage {
    match source.search_deals(query).await {
        Ok(page) => page,
        Err(err) => {
            warn!("{} deal search failed: {:#}", source.source_name(), err);
            DealPage::default()
        }
    }
}

/// Normalized resale listings, empty on failure
pub async fn fetch_sales(source: &dyn DealSource, query: &SalesQuery) -> Vec<Listing> {
    match source.search_sales(query).await {
        Ok(raw) => normalize_listings(&raw),
        Err(err) => {
            warn!(
                "{} sales search for {} failed: {:#}",
                source.source_name(),
                query.product_id,
                err
            );
            Vec::new()
        }
    }
}

/// Sales indicators, all zero on failure
pub async fn fetch_indicators(source: &dyn DealSource, query: &SalesQuery) -> SalesStatistics {
    match source.sales_indicators(query).await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(
                "{} sales indicators for {} failed: {:#}",
                source.source_name(),
                query.product_id,
                err
            );
            SalesStatistics::default()
        }
    }
}
