use crate::models::Deal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const GREAT_DISCOUNT_PERCENT: u8 = 20;
pub const GOOD_DISCOUNT_PERCENT: u8 = 10;
pub const CHEAP_PRICE: f64 = 30.0;
pub const ACTIVE_DISCUSSION_COMMENTS: u32 = 2;
pub const BEST_DISCOUNT_RATE: f64 = 0.5;
pub const MOST_COMMENTED_COMMENTS: u32 = 15;
pub const HOT_TEMPERATURE: f64 = 100.0;

/// Thresholds behind the score and the ranking filters.
///
/// `Default` carries the product thresholds; override fields to tune them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Discount at or above this earns 2 points
    pub great_discount_percent: u8,
    /// Discount at or above this (but below great) earns 1 point
    pub good_discount_percent: u8,
    /// Price strictly below this earns 1 point
    pub cheap_price: f64,
    /// More comments than this earns 1 point
    pub active_discussion_comments: u32,
    /// `1 - price / list_price` must exceed this for the best-discount filter
    pub best_discount_rate: f64,
    /// More comments than this for the most-commented filter
    pub most_commented_comments: u32,
    /// Temperature above this for the hot filter
    pub hot_temperature: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            great_discount_percent: GREAT_DISCOUNT_PERCENT,
            good_discount_percent: GOOD_DISCOUNT_PERCENT,
            cheap_price: CHEAP_PRICE,
            active_discussion_comments: ACTIVE_DISCUSSION_COMMENTS,
            best_discount_rate: BEST_DISCOUNT_RATE,
            most_commented_comments: MOST_COMMENTED_COMMENTS,
            hot_temperature: HOT_TEMPERATURE,
        }
    }
}

impl ScoringRules {
    /// Additive score in `0..=4`. Missing fields contribute nothing.
    pub fn score(&self, deal: &Deal) -> u8 {
        let discount_points = match deal.discount {
            Some(d) if d >= self.great_discount_percent => 2,
            Some(d) if d >= self.good_discount_percent => 1,
            _ => 0,
        };
        let price_points = u8::from(deal.price.is_some_and(|p| p < self.cheap_price));
        let comment_points = u8::from(
            deal.comments_count
                .is_some_and(|c| c > self.active_discussion_comments),
        );

        discount_points + price_points + comment_points
    }

    /// Top `limit` deals by descending score.
    ///
    /// The sort is stable, so equal scores keep their input order and repeated
    /// calls on the same input select the same deals.
    pub fn rank_deals(&self, deals: &[Deal], limit: usize) -> Vec<Deal> {
        let mut scored: Vec<(u8, &Deal)> = deals.iter().map(|d| (self.score(d), d)).collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, deal)| deal.clone())
            .collect()
    }

    /// Computed discount rate `1 - price / list_price`
    pub fn discount_rate(deal: &Deal) -> Option<f64> {
        match (deal.price, deal.list_price) {
            (Some(price), Some(list_price)) if list_price > 0.0 => Some(1.0 - price / list_price),
            _ => None,
        }
    }

    pub fn is_best_discount(&self, deal: &Deal) -> bool {
        Self::discount_rate(deal).is_some_and(|rate| rate > self.best_discount_rate)
    }

    pub fn is_most_commented(&self, deal: &Deal) -> bool {
        deal.comments_count
            .is_some_and(|c| c > self.most_commented_comments)
    }

    pub fn is_hot(&self, deal: &Deal) -> bool {
        deal.temperature.is_some_and(|t| t > self.hot_temperature)
    }
}

/// Score with the default thresholds
pub fn score(deal: &Deal) -> u8 {
    ScoringRules::default().score(deal)
}

/// Rank with the default thresholds
pub fn rank_deals(deals: &[Deal], limit: usize) -> Vec<Deal> {
    ScoringRules::default().rank_deals(deals, limit)
}

/// Ranking predicates offered on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealFilter {
    BestDiscount,
    MostCommented,
    Hot,
}

impl DealFilter {
    /// A missing field never satisfies a filter
    pub fn matches(self, rules: &ScoringRules, deal: &Deal) -> bool {
        match self {
            Self::BestDiscount => rules.is_best_discount(deal),
            Self::MostCommented => rules.is_most_commented(deal),
            Self::Hot => rules.is_hot(deal),
        }
    }
}

/// Deals matching every filter (logical AND), in input order
pub fn filter_deals(deals: &[Deal], filters: &[DealFilter], rules: &ScoringRules) -> Vec<Deal> {
    deals
        .iter()
        .filter(|deal| filters.iter().all(|f| f.matches(rules, deal)))
        .cloned()
        .collect()
}

/// Orderings accepted by the deal search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
    BestDiscount,
    MostCommented,
    HotDeals,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::BestDiscount => "best-discount",
            Self::MostCommented => "most-commented",
            Self::HotDeals => "hot-deals",
        }
    }

    /// Ordering of two deals under this key; absent values sort last
    pub fn compare(self, a: &Deal, b: &Deal) -> Ordering {
        match self {
            Self::PriceAsc => known_first(a.price, b.price, |x, y| x.total_cmp(y)),
            Self::PriceDesc => known_first(a.price, b.price, |x, y| y.total_cmp(x)),
            Self::DateAsc => known_first(a.post_date, b.post_date, |x, y| x.cmp(y)),
            Self::DateDesc => known_first(a.post_date, b.post_date, |x, y| y.cmp(x)),
            Self::BestDiscount => known_first(a.discount, b.discount, |x, y| y.cmp(x)),
            Self::MostCommented => {
                known_first(a.comments_count, b.comments_count, |x, y| y.cmp(x))
            }
            Self::HotDeals => known_first(a.temperature, b.temperature, |x, y| y.total_cmp(x)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "date-asc" => Ok(Self::DateAsc),
            "date-desc" => Ok(Self::DateDesc),
            "best-discount" => Ok(Self::BestDiscount),
            "most-commented" => Ok(Self::MostCommented),
            "hot-deals" => Ok(Self::HotDeals),
            other => anyhow::bail!("Unknown sort key: {}", other),
        }
    }
}

/// Absent values always sort after known ones, whatever the direction
fn known_first<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of deals by the given key
pub fn sort_deals(deals: &mut [Deal], key: SortKey) {
    deals.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(title: &str) -> Deal {
        Deal {
            id: Some("42156".to_string()),
            title: title.to_string(),
            price: None,
            list_price: None,
            discount: None,
            comments_count: None,
            temperature: None,
            post_date: None,
            link: format!("https://www.dealabs.com/{}", title),
            image_url: None,
        }
    }

    fn scored(discount: Option<u8>, price: Option<f64>, comments: Option<u32>) -> Deal {
        Deal {
            discount,
            price,
            comments_count: comments,
            ..deal("scored")
        }
    }

    #[test]
    fn test_score_extremes() {
        assert_eq!(score(&scored(Some(25), Some(20.0), Some(5))), 4);
        assert_eq!(score(&scored(Some(5), Some(50.0), Some(1))), 0);
        assert_eq!(score(&deal("empty")), 0);
    }

    #[test]
    fn test_score_discount_tiers_are_exclusive() {
        assert_eq!(score(&scored(Some(20), None, None)), 2);
        assert_eq!(score(&scored(Some(19), None, None)), 1);
        assert_eq!(score(&scored(Some(10), None, None)), 1);
        assert_eq!(score(&scored(Some(9), None, None)), 0);
    }

    #[test]
    fn test_score_boundaries() {
        assert_eq!(score(&scored(None, Some(30.0), None)), 0);
        assert_eq!(score(&scored(None, Some(29.99), None)), 1);
        assert_eq!(score(&scored(None, None, Some(2))), 0);
        assert_eq!(score(&scored(None, None, Some(3))), 1);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ScoringRules {
            cheap_price: 100.0,
            ..Default::default()
        };
        assert_eq!(rules.score(&scored(None, Some(50.0), None)), 1);
    }

    #[test]
    fn test_rank_deals_is_stable() {
        let deals = vec![
            Deal { title: "a".into(), ..scored(Some(10), None, None) },
            Deal { title: "b".into(), ..scored(Some(25), Some(10.0), Some(9)) },
            Deal { title: "c".into(), ..scored(Some(12), None, None) },
            Deal { title: "d".into(), ..scored(None, None, None) },
            Deal { title: "e".into(), ..scored(None, Some(5.0), None) },
        ];

        let top = rank_deals(&deals, 3);
        let titles: Vec<&str> = top.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);

        assert_eq!(rank_deals(&deals, 3), top);
        assert_eq!(rank_deals(&deals, 10).len(), 5);
    }

    #[test]
    fn test_best_discount_filter() {
        let rules = ScoringRules::default();
        let half_off = Deal { price: Some(40.0), list_price: Some(100.0), ..deal("a") };
        let exactly_half = Deal { price: Some(50.0), list_price: Some(100.0), ..deal("b") };
        let no_list_price = Deal { price: Some(1.0), ..deal("c") };

        assert!(rules.is_best_discount(&half_off));
        assert!(!rules.is_best_discount(&exactly_half));
        assert!(!rules.is_best_discount(&no_list_price));
    }

    #[test]
    fn test_filters_exclude_missing_fields() {
        let rules = ScoringRules::default();
        let empty = deal("empty");
        assert!(!DealFilter::BestDiscount.matches(&rules, &empty));
        assert!(!DealFilter::MostCommented.matches(&rules, &empty));
        assert!(!DealFilter::Hot.matches(&rules, &empty));
    }

    #[test]
    fn test_filter_deals_combines_with_and() {
        let rules = ScoringRules::default();
        let deals = vec![
            Deal { temperature: Some(250.0), comments_count: Some(40), ..deal("both") },
            Deal { temperature: Some(250.0), comments_count: Some(3), ..deal("hot-only") },
            Deal { temperature: Some(20.0), comments_count: Some(40), ..deal("talked-only") },
        ];

        let hot = filter_deals(&deals, &[DealFilter::Hot], &rules);
        assert_eq!(hot.len(), 2);

        let both = filter_deals(&deals, &[DealFilter::Hot, DealFilter::MostCommented], &rules);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].title, "both");

        assert_eq!(filter_deals(&deals, &[], &rules).len(), 3);
    }

    #[test]
    fn test_sort_deals_puts_missing_last() {
        let mut deals = vec![
            Deal { price: None, ..deal("unknown") },
            Deal { price: Some(20.0), ..deal("mid") },
            Deal { price: Some(5.0), ..deal("cheap") },
            Deal { price: Some(90.0), ..deal("dear") },
        ];

        sort_deals(&mut deals, SortKey::PriceAsc);
        let titles: Vec<&str> = deals.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["cheap", "mid", "dear", "unknown"]);

        sort_deals(&mut deals, SortKey::PriceDesc);
        let titles: Vec<&str> = deals.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["dear", "mid", "cheap", "unknown"]);
    }

    #[test]
    fn test_sort_key_round_trips_through_str() {
        for key in [SortKey::PriceAsc, SortKey::DateDesc, SortKey::HotDeals] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("cheapest".parse::<SortKey>().is_err());
    }
}
