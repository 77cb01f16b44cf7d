use crate::models::Deal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Composite key for a favorite.
///
/// Built from the product id, link, price and post date, since several deals
/// can share one product id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteIdentity(String);

impl FavoriteIdentity {
    /// Wrap an existing key. Blank keys are not identities.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Derive the key of a deal; `None` when the deal has no product id
    pub fn of(deal: &Deal) -> Option<Self> {
        let id = deal.id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        let price = deal.price.map(|p| p.to_string()).unwrap_or_default();
        let post_date = deal.post_date.map(|d| d.to_rfc3339()).unwrap_or_default();

        Some(Self(format!("{}|{}|{}|{}", id, deal.link, price, post_date)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deals the user marked as favorite.
///
/// Not synchronized: callers sharing it across threads must wrap it in a lock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    members: HashSet<FavoriteIdentity>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership and return the new state
    pub fn toggle(&mut self, identity: &FavoriteIdentity) -> bool {
        if self.members.remove(identity) {
            false
        } else {
            self.members.insert(identity.clone());
            true
        }
    }

    /// Toggle a deal by its derived identity.
    ///
    /// A deal without identity is left alone and reported as not a member.
    pub fn toggle_deal(&mut self, deal: &Deal) -> bool {
        match FavoriteIdentity::of(deal) {
            Some(identity) => self.toggle(&identity),
            None => false,
        }
    }

    pub fn is_member(&self, identity: &FavoriteIdentity) -> bool {
        self.members.contains(identity)
    }

    pub fn contains_deal(&self, deal: &Deal) -> bool {
        FavoriteIdentity::of(deal).is_some_and(|identity| self.is_member(&identity))
    }

    /// Favorite deals among `deals`, in their original order
    pub fn list_favorites(&self, deals: &[Deal]) -> Vec<Deal> {
        deals
            .iter()
            .filter(|deal| self.contains_deal(deal))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn deal(id: Option<&str>, link: &str, price: Option<f64>) -> Deal {
        Deal {
            id: id.map(str::to_string),
            title: "LEGO Technic".to_string(),
            price,
            list_price: None,
            discount: None,
            comments_count: None,
            temperature: None,
            post_date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single(),
            link: link.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut favorites = Favorites::new();
        let identity = FavoriteIdentity::new("42156|https://a|99|").unwrap();

        assert!(favorites.toggle(&identity));
        assert!(favorites.is_member(&identity));
        assert!(!favorites.toggle(&identity));
        assert!(!favorites.is_member(&identity));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_same_product_id_different_listings() {
        let first = deal(Some("42156"), "https://www.dealabs.com/a", Some(99.0));
        let second = deal(Some("42156"), "https://www.dealabs.com/b", Some(99.0));

        let mut favorites = Favorites::new();
        assert!(favorites.toggle_deal(&first));

        assert!(favorites.contains_deal(&first));
        assert!(!favorites.contains_deal(&second));
        assert_ne!(FavoriteIdentity::of(&first), FavoriteIdentity::of(&second));
    }

    #[test]
    fn test_identical_keys_share_membership() {
        let first = deal(Some("42156"), "https://www.dealabs.com/a", Some(99.0));
        let duplicate = first.clone();

        let mut favorites = Favorites::new();
        favorites.toggle_deal(&first);
        assert!(favorites.contains_deal(&duplicate));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_missing_identity_is_noop() {
        let mut favorites = Favorites::new();
        let anonymous = deal(None, "https://www.dealabs.com/a", Some(10.0));
        let blank = deal(Some("  "), "https://www.dealabs.com/b", Some(10.0));

        assert!(!favorites.toggle_deal(&anonymous));
        assert!(!favorites.toggle_deal(&blank));
        assert!(favorites.is_empty());
        assert!(FavoriteIdentity::new("").is_none());
    }

    #[test]
    fn test_list_favorites_keeps_order() {
        let deals = vec![
            deal(Some("1"), "https://a", Some(1.0)),
            deal(Some("2"), "https://b", Some(2.0)),
            deal(Some("3"), "https://c", Some(3.0)),
        ];

        let mut favorites = Favorites::new();
        favorites.toggle_deal(&deals[2]);
        favorites.toggle_deal(&deals[0]);

        let listed = favorites.list_favorites(&deals);
        let ids: Vec<_> = listed.iter().filter_map(|d| d.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
