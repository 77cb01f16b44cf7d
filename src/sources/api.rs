use crate::models::{RawDeal, RawListing};
use crate::sources::traits::DealSource;
use crate::sources::types::{DealPage, DealQuery, SalesQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default location of the deals API
pub const DEFAULT_API_BASE: &str = "http://localhost:8092";

/// Envelope returned by both search endpoints
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    results: Vec<Value>,
}

/// Decode each record on its own so one unreadable record is skipped
/// instead of failing the page
fn decode_records<T: DeserializeOwned>(results: Vec<Value>, kind: &str) -> Vec<T> {
    results
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value(record) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("Skipping unreadable {} record #{}: {}", kind, i, err);
                None
            }
        })
        .collect()
}

/// HTTP client for the deals API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the default local API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE, Duration::from_secs(30))
    }

    /// Create a client for a custom API location
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("deal-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching URL: {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("Deals API returned status: {}", response.status());
            anyhow::bail!("Failed to fetch {}: {}", url, response.status());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }
}

#[async_trait]
impl DealSource for ApiClient {
    async fn search_deals(&self, query: &DealQuery) -> Result<DealPage> {
        query.validate()?;

        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.size.to_string()),
        ];
        if let Some(sort) = query.sort {
            params.push(("filterBy", sort.to_string()));
        }
        if let Some(max_price) = query.max_price {
            params.push(("price", max_price.to_string()));
        }
        if let Some(since) = query.posted_since {
            params.push(("date", since.format("%Y-%m-%d").to_string()));
        }

        let body: SearchResponse = self.get("/deals/search", &params).await?;
        let total = body.total.unwrap_or(body.results.len());
        let deals: Vec<RawDeal> = decode_records(body.results, "deal");
        info!("Fetched {} deals (total {})", deals.len(), total);

        Ok(DealPage { deals, total })
    }

    async fn search_sales(&self, query: &SalesQuery) -> Result<Vec<RawListing>> {
        let params = [
            ("legoSetId", query.product_id.clone()),
            ("limit", query.limit.to_string()),
        ];

        let body: SearchResponse = self.get("/sales/search", &params).await?;
        let sales: Vec<RawListing> = decode_records(body.results, "sale");
        info!("Fetched {} sales for {}", sales.len(), query.product_id);

        Ok(sales)
    }

    fn source_name(&self) -> &'static str {
        "Deals API"
    }
}
