use crate::favorites::Favorites;
use crate::models::Deal;
use crate::normalizer::normalize_deals;
use crate::scoring::{filter_deals, DealFilter, ScoringRules};
use crate::sources::{fetch_deals, DealPage, DealQuery, DealSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Page position of the current deal search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Deals matching the search, all pages included
    pub count: usize,
    pub current_page: usize,
    /// `ceil(count / size)`, at least 1
    pub page_count: usize,
}

impl Pagination {
    /// `current_page` is clamped to `1..=page_count`
    pub fn new(total: usize, page: usize, size: usize) -> Self {
        let page_count = total.div_ceil(size.max(1)).max(1);
        Self {
            count: total,
            current_page: page.clamp(1, page_count),
            page_count,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub query: DealQuery,
    pub deals: Vec<Deal>,
    pub pagination: Pagination,
    pub favorites: Favorites,
    pub rules: ScoringRules,
}

impl DashboardState {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    /// Replace the current page. Favorites survive page changes.
    pub fn with_page(self, query: DealQuery, page: DealPage) -> Self {
        let pagination = Pagination::new(page.total, query.page, query.size);
        Self {
            deals: normalize_deals(&page.deals),
            pagination,
            query,
            ..self
        }
    }

    /// Fetch a page from `source`. A failed fetch yields an empty page.
    pub async fn load(self, source: &dyn DealSource, query: DealQuery) -> Self {
        let page = fetch_deals(source, &query).await;
        info!(
            "Loaded page {} from {} ({} deals, {} total)",
            query.page,
            source.source_name(),
            page.deals.len(),
            page.total
        );
        self.with_page(query, page)
    }

    /// Toggle the deal at `index` on the current page.
    ///
    /// Out-of-range indexes and deals without identity change nothing and
    /// report `false`.
    pub fn toggle_favorite(&mut self, index: usize) -> bool {
        match self.deals.get(index) {
            Some(deal) => self.favorites.toggle_deal(deal),
            None => false,
        }
    }

    pub fn is_favorite(&self, deal: &Deal) -> bool {
        self.favorites.contains_deal(deal)
    }

    /// Favorites present on the current page
    pub fn favorite_deals(&self) -> Vec<Deal> {
        self.favorites.list_favorites(&self.deals)
    }

    /// Highest scoring deals of the current page
    pub fn best_deals(&self, limit: usize) -> Vec<Deal> {
        self.rules.rank_deals(&self.deals, limit)
    }

    pub fn filtered(&self, filters: &[DealFilter]) -> Vec<Deal> {
        filter_deals(&self.deals, filters, &self.rules)
    }

    /// Distinct product ids on the current page, in first-seen order
    pub fn product_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.deals
            .iter()
            .filter_map(|deal| deal.id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}
