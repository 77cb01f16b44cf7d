use crate::favorites::FavoriteIdentity;
use crate::models::{Deal, Listing, SalesStatistics};
use crate::session::{DashboardState, Pagination};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealCard {
    #[serde(flatten)]
    pub deal: Deal,
    pub score: u8,
    pub favorite_key: Option<FavoriteIdentity>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub title: String,
    pub price: f64,
    pub published_at: Option<DateTime<Utc>>,
    pub link: String,
}

/// Sales panel for the selected product
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesPanel {
    pub product_id: String,
    pub statistics: SalesStatistics,
    pub rows: Vec<SalesRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub cards: Vec<DealCard>,
    pub best_deals: Vec<DealCard>,
    pub pagination: Pagination,
    pub product_ids: Vec<String>,
    pub sales: Option<SalesPanel>,
}

fn card(state: &DashboardState, deal: &Deal) -> DealCard {
    DealCard {
        deal: deal.clone(),
        score: state.rules.score(deal),
        favorite_key: FavoriteIdentity::of(deal),
        is_favorite: state.is_favorite(deal),
    }
}

/// Build the sales panel; rows are oldest first with undated rows last
pub fn sales_panel(product_id: &str, statistics: SalesStatistics, listings: &[Listing]) -> SalesPanel {
    let mut rows: Vec<SalesRow> = listings
        .iter()
        .map(|l| SalesRow {
            title: l.title.clone(),
            price: l.price,
            published_at: l.published_at,
            link: l.link.clone(),
        })
        .collect();

    rows.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    SalesPanel {
        product_id: product_id.to_string(),
        statistics,
        rows,
    }
}

/// Project the dashboard state into renderable cards
pub fn project(state: &DashboardState, best_limit: usize, sales: Option<SalesPanel>) -> DashboardView {
    DashboardView {
        cards: state.deals.iter().map(|d| card(state, d)).collect(),
        best_deals: state
            .best_deals(best_limit)
            .iter()
            .map(|d| card(state, d))
            .collect(),
        pagination: state.pagination,
        product_ids: state.product_ids(),
        sales,
    }
}
