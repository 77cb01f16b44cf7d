use crate::models::{Listing, SalesStatistics};
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Nearest-rank percentile over prices already sorted ascending:
/// `sorted[floor(p / 100 * len)]`, clamped to the last element.
///
/// Values are never interpolated between neighbours. Dashboard baselines rely
/// on this approximation, so an interpolating percentile would change
/// displayed values. Returns 0 for an empty slice.
pub fn percentile(p: f64, sorted_prices: &[f64]) -> f64 {
    let Some(last) = sorted_prices.len().checked_sub(1) else {
        return 0.0;
    };
    let index = (p / 100.0 * sorted_prices.len() as f64).floor();
    let index = if index.is_finite() && index >= 0.0 {
        (index as usize).min(last)
    } else {
        last
    };
    sorted_prices[index]
}

/// Rounded day span between the earliest and latest known publication date
pub fn lifetime_days(listings: &[Listing]) -> i64 {
    let dates = listings.iter().filter_map(|l| l.published_at);
    let (earliest, latest) = dates.fold(
        (None::<DateTime<Utc>>, None::<DateTime<Utc>>),
        |(min, max), date| {
            (
                Some(min.map_or(date, |m| m.min(date))),
                Some(max.map_or(date, |m| m.max(date))),
            )
        },
    );

    match (earliest, latest) {
        (Some(earliest), Some(latest)) => {
            let span = (latest - earliest).num_seconds() as f64;
            (span / SECONDS_PER_DAY).round() as i64
        }
        _ => 0,
    }
}

/// Compute the sales indicators for one product.
///
/// An empty input gives all-zero statistics. Input order does not matter.
pub fn compute_statistics(listings: &[Listing]) -> SalesStatistics {
    if listings.is_empty() {
        return SalesStatistics::default();
    }

    let mut prices: Vec<f64> = listings.iter().map(|l| l.price).collect();
    prices.sort_by(f64::total_cmp);

    SalesStatistics {
        count: listings.len(),
        p5: percentile(5.0, &prices),
        p25: percentile(25.0, &prices),
        p50: percentile(50.0, &prices),
        lifetime_days: lifetime_days(listings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing(price: f64, published_at: Option<DateTime<Utc>>) -> Listing {
        Listing {
            title: format!("Lego 42156 at {}", price),
            price,
            published_at,
            link: String::new(),
        }
    }

    fn day(d: u32, hour: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(2025, 1, d, hour, 0, 0).single()
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_statistics(&[]);
        assert_eq!(
            stats,
            SalesStatistics {
                count: 0,
                p5: 0.0,
                p25: 0.0,
                p50: 0.0,
                lifetime_days: 0,
            }
        );
    }

    #[test]
    fn test_nearest_rank_median() {
        let listings: Vec<Listing> = [100.0, 30.0, 10.0, 40.0, 20.0]
            .into_iter()
            .map(|p| listing(p, None))
            .collect();

        let stats = compute_statistics(&listings);
        assert_eq!(stats.count, 5);
        // floor(0.5 * 5) = 2
        assert_eq!(stats.p50, 30.0);
        // floor(0.25 * 5) = 1
        assert_eq!(stats.p25, 20.0);
        // floor(0.05 * 5) = 0
        assert_eq!(stats.p5, 10.0);
    }

    #[test]
    fn test_percentile_is_not_interpolated() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // index floor(0.5 * 4) = 2, an interpolated median would be 25
        assert_eq!(percentile(50.0, &sorted), 30.0);
    }

    #[test]
    fn test_percentile_clamps_to_last() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(percentile(100.0, &sorted), 3.0);
        assert_eq!(percentile(250.0, &sorted), 3.0);
        assert_eq!(percentile(50.0, &[]), 0.0);
    }

    #[test]
    fn test_percentiles_are_ordered() {
        let prices = [55.0, 12.5, 80.0, 12.5, 99.9, 3.0, 47.0, 61.0, 20.0];
        for len in 1..=prices.len() {
            let listings: Vec<Listing> =
                prices[..len].iter().map(|p| listing(*p, None)).collect();
            let stats = compute_statistics(&listings);
            assert!(stats.p5 <= stats.p25, "p5 > p25 for {} listings", len);
            assert!(stats.p25 <= stats.p50, "p25 > p50 for {} listings", len);
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward = vec![listing(10.0, day(1, 0)), listing(50.0, day(9, 0)), listing(30.0, None)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(compute_statistics(&forward), compute_statistics(&reversed));
    }

    #[test]
    fn test_lifetime_rounds_day_span() {
        // 3 days and 14 hours rounds up to 4
        let listings = vec![listing(10.0, day(2, 8)), listing(20.0, None), listing(15.0, day(5, 22))];
        assert_eq!(compute_statistics(&listings).lifetime_days, 4);

        // 3 days and 10 hours rounds down to 3
        let listings = vec![listing(10.0, day(2, 8)), listing(15.0, day(5, 18))];
        assert_eq!(lifetime_days(&listings), 3);
    }

    #[test]
    fn test_lifetime_without_dates_is_zero() {
        let listings = vec![listing(10.0, None), listing(20.0, None)];
        let stats = compute_statistics(&listings);
        assert_eq!(stats.lifetime_days, 0);
        assert_eq!(stats.count, 2);

        assert_eq!(lifetime_days(&[listing(10.0, day(3, 0))]), 0);
    }
}
