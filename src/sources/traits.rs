use crate::models::{RawListing, SalesStatistics};
use crate::normalizer::normalize_listings;
use crate::sources::types::{DealPage, DealQuery, SalesQuery};
use crate::stats::compute_statistics;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for the stores deals and resale listings are read from
#[async_trait]
pub trait DealSource: Send + Sync {
    /// Search deals and return one page of raw records plus the match count
    async fn search_deals(&self, query: &DealQuery) -> Result<DealPage>;

    /// Resale listings for one product
    async fn search_sales(&self, query: &SalesQuery) -> Result<Vec<RawListing>>;

    /// Sales indicators for one product, computed locally so that every
    /// source shares the same percentile and lifetime rules
    async fn sales_indicators(&self, query: &SalesQuery) -> Result<SalesStatistics> {
        let raw = self.search_sales(query).await?;
        Ok(compute_statistics(&normalize_listings(&raw)))
    }

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
