use crate::models::{Deal, RawDeal, RawListing};
use crate::normalizer::{normalize_deal, parse_date_value};
use crate::sources::traits::DealSource;
use crate::sources::types::{DealPage, DealQuery, SalesQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

/// Exported contents of the deals and sales collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub deals: Vec<RawDeal>,
    #[serde(default)]
    pub sales: Vec<RawListing>,
}

/// Offline source answering searches from a JSON snapshot, with the same
/// filtering, ordering and paging as the deals API
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot file written as `{ "deals": [...], "sales": [...] }`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        info!(
            "📂 Loaded {} deals and {} sales from {}",
            snapshot.deals.len(),
            snapshot.sales.len(),
            path.display()
        );
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl DealSource for SnapshotSource {
    async fn search_deals(&self, query: &DealQuery) -> Result<DealPage> {
        query.validate()?;

        let mut matching: Vec<(&RawDeal, Deal)> = self
            .snapshot
            .deals
            .iter()
            .map(|raw| (raw, normalize_deal(raw)))
            .filter(|(_, deal)| query.admits(deal))
            .collect();

        let key = query.sort.unwrap_or_default();
        matching.sort_by(|a, b| key.compare(&a.1, &b.1));

        let total = matching.len();
        let deals = matching
            .into_iter()
            .skip(query.offset())
            .take(query.size)
            .map(|(raw, _)| raw.clone())
            .collect();

        Ok(DealPage { deals, total })
    }

    async fn search_sales(&self, query: &SalesQuery) -> Result<Vec<RawListing>> {
        let needle = query.product_id.to_lowercase();

        let mut matching: Vec<(&RawListing, _)> = self
            .snapshot
            .sales
            .iter()
            .filter(|sale| sale.title.to_lowercase().contains(&needle))
            .map(|sale| (sale, sale.published_time.as_ref().and_then(parse_date_value)))
            .collect();

        // Newest first, undated last
        matching.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        Ok(matching
            .into_iter()
            .take(query.limit)
            .map(|(sale, _)| sale.clone())
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "Snapshot"
    }
}
