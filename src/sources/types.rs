use crate::models::{Deal, RawDeal};
use crate::scoring::SortKey;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters of a deal search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealQuery {
    /// 1-based page number
    pub page: usize,
    /// Deals per page
    pub size: usize,
    pub sort: Option<SortKey>,
    /// Price ceiling, inclusive
    pub max_price: Option<f64>,
    /// Only deals posted on or after this day
    pub posted_since: Option<NaiveDate>,
}

impl Default for DealQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 6,
            sort: None,
            max_price: None,
            posted_since: None,
        }
    }
}

impl DealQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            anyhow::bail!("Page numbers start at 1");
        }
        if self.size == 0 {
            anyhow::bail!("Page size must be at least 1");
        }
        Ok(())
    }

    /// Index of the first deal of the page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    /// Whether a deal passes the price ceiling and date floor.
    ///
    /// Deals with unknown price or date are kept.
    pub fn admits(&self, deal: &Deal) -> bool {
        let under_ceiling = match (self.max_price, deal.price) {
            (Some(ceiling), Some(price)) => price <= ceiling,
            _ => true,
        };
        let recent_enough = match (self.posted_since, deal.post_date) {
            (Some(floor), Some(posted)) => posted.date_naive() >= floor,
            _ => true,
        };
        under_ceiling && recent_enough
    }
}

/// Parameters of a resale search for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesQuery {
    pub product_id: String,
    pub limit: usize,
}

impl SalesQuery {
    pub fn new(product_id: impl Into<String>, limit: usize) -> Self {
        Self {
            product_id: product_id.into(),
            limit,
        }
    }
}

/// One page of raw deals with the number of deals matching the search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealPage {
    pub deals: Vec<RawDeal>,
    pub total: usize,
}
