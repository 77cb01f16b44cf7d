pub mod config;
pub mod favorites;
pub mod models;
pub mod normalizer;
pub mod scoring;
pub mod session;
pub mod sources;
pub mod stats;
pub mod view;

pub use config::DashboardConfig;
pub use favorites::{FavoriteIdentity, Favorites};
pub use models::{Deal, Listing, SalesStatistics};
pub use scoring::{rank_deals, score, DealFilter, ScoringRules, SortKey};
pub use session::{DashboardState, Pagination};
pub use stats::compute_statistics;
