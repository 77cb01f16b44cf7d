use crate::models::{Deal, Listing, RawDeal, RawListing, RawPrice, RawValue};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

/// Symbols stripped from price strings before parsing
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£', '¥'];

/// Parse a free-form price such as `"19,99€"` or `"1 299,00 €"`.
///
/// Returns `None` when the remaining text is not digits with at most one
/// decimal separator (`"free"`, `"1.299,00"`).
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    parse_decimal(&cleaned)
}

/// Digits with at most one `.` or `,` separator
fn parse_decimal(text: &str) -> Option<f64> {
    let mut separators = 0;
    let mut digits = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' | ',' => separators += 1,
            _ => return None,
        }
    }
    if digits == 0 || separators > 1 {
        return None;
    }
    text.replace(',', ".").parse::<f64>().ok()
}

fn price_from_value(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(text) => parse_price(text),
    }
}

/// Parse a discount badge such as `"-30%"` into a percentage in `0..=100`
pub fn parse_discount(value: &RawValue) -> Option<u8> {
    let percent = match value {
        RawValue::Number(n) if n.is_finite() => n.abs(),
        RawValue::Number(_) => return None,
        RawValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '%' && *c != '-')
                .collect();
            parse_decimal(&cleaned)?
        }
    };
    let rounded = percent.round();
    (0.0..=100.0).contains(&rounded).then_some(rounded as u8)
}

/// Parse a comment counter; anything but a non-negative integer is absent
pub fn parse_comments(value: &RawValue) -> Option<u32> {
    match value {
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            u32::try_from(*n as u64).ok()
        }
        RawValue::Number(_) => None,
        RawValue::Text(text) => text.trim().parse::<u32>().ok(),
    }
}

/// Parse a vote temperature such as `"169°"` or `"-12°"`
pub fn parse_temperature(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_finite() => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '°')
                .collect();
            match cleaned.strip_prefix('-') {
                Some(magnitude) => parse_decimal(magnitude).map(|t| -t),
                None => parse_decimal(&cleaned),
            }
        }
    }
}

/// Parse a marketplace date such as `"25/12/2024 10:30:00"`.
///
/// The date segment is day/month/year; the time segment is optional and
/// defaults to midnight. Times are read as UTC.
pub fn parse_published_time(text: &str) -> Option<DateTime<Utc>> {
    let mut parts = text.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%d/%m/%Y").ok()?;
    let time = match time_part {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    Some(date.and_time(time).and_utc())
}

/// Smallest unix timestamp read as a date (1973-03-03); shorter digit runs
/// such as a bare year are not timestamps
const MIN_UNIX_SECONDS: f64 = 100_000_000.0;

fn timestamp_from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() || seconds < MIN_UNIX_SECONDS {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0)
}

/// Dates arrive as unix seconds, the marketplace text format, or RFC 3339
pub fn parse_date_value(value: &RawValue) -> Option<DateTime<Utc>> {
    match value {
        RawValue::Number(seconds) => timestamp_from_seconds(*seconds),
        RawValue::Text(text) => {
            let text = text.trim();
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                return text.parse::<f64>().ok().and_then(timestamp_from_seconds);
            }
            parse_published_time(text).or_else(|| {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|date| date.with_timezone(&Utc))
            })
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Normalize one deal record. Unparsable fields become `None`.
pub fn normalize_deal(raw: &RawDeal) -> Deal {
    let deal = Deal {
        id: non_blank(raw.id.as_deref()),
        title: raw.title.trim().to_string(),
        price: raw.price.as_ref().and_then(price_from_value),
        list_price: raw.list_price.as_ref().and_then(price_from_value),
        discount: raw.discount.as_ref().and_then(parse_discount),
        comments_count: raw.comments_count.as_ref().and_then(parse_comments),
        temperature: raw.temperature.as_ref().and_then(parse_temperature),
        post_date: raw.post_date.as_ref().and_then(parse_date_value),
        link: raw.link.trim().to_string(),
        image_url: non_blank(raw.image_url.as_deref()),
    };

    if raw.price.is_some() && deal.price.is_none() {
        debug!("Unparsable price for deal '{}': {:?}", deal.title, raw.price);
    }

    deal
}

pub fn normalize_deals(raws: &[RawDeal]) -> Vec<Deal> {
    raws.iter().map(normalize_deal).collect()
}

/// Normalize one resale record.
///
/// A listing without a usable price is dropped: it cannot take part in the
/// price distribution.
pub fn normalize_listing(raw: &RawListing) -> Option<Listing> {
    let price = match &raw.price {
        Some(RawPrice::Money { amount, .. }) => price_from_value(amount),
        Some(RawPrice::Plain(value)) => price_from_value(value),
        None => None,
    };

    let Some(price) = price else {
        debug!("Skipping listing '{}': no usable price {:?}", raw.title, raw.price);
        return None;
    };

    Some(Listing {
        title: raw.title.trim().to_string(),
        price,
        published_at: raw.published_time.as_ref().and_then(parse_date_value),
        link: raw.link.trim().to_string(),
    })
}

pub fn normalize_listings(raws: &[RawListing]) -> Vec<Listing> {
    raws.iter().filter_map(normalize_listing).collect()
}
