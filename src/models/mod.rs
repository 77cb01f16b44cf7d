pub mod raw;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use raw::{RawDeal, RawListing, RawPrice, RawValue};

/// A purchase offer sourced from the deals aggregator, after normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Site-assigned product identity (set number). Several deals may share it.
    pub id: Option<String>,
    pub title: String,
    /// Currency-stripped price, never negative
    pub price: Option<f64>,
    /// Reference price the deal is compared against, when the site shows one
    pub list_price: Option<f64>,
    /// Discount in percent, within 0..=100
    pub discount: Option<u8>,
    pub comments_count: Option<u32>,
    /// Community vote score, may be negative
    pub temperature: Option<f64>,
    pub post_date: Option<DateTime<Utc>>,
    pub link: String,
    pub image_url: Option<String>,
}

/// A resale offer for a product, sourced from the peer marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    pub price: f64,
    /// `None` when the marketplace date could not be parsed
    pub published_at: Option<DateTime<Utc>>,
    pub link: String,
}

/// Price distribution of the resale listings for one product
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    pub count: usize,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub lifetime_days: i64,
}
