use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A scalar field as it arrives from the upstream store: either a JSON number
/// or free-form text such as `"19,99€"` or `"-30%"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Anything but a string or a number has no usable value
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s)),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

/// Marketplace prices come either as a money object or as a bare value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawPrice {
    Money {
        amount: RawValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency_code: Option<String>,
    },
    Plain(RawValue),
}

impl RawPrice {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut money) => Some(Self::Money {
                amount: RawValue::from_json(money.remove("amount")?)?,
                currency_code: money.remove("currency_code").and_then(text_from_json),
            }),
            other => RawValue::from_json(other).map(Self::Plain),
        }
    }
}

// Stored records are loosely typed: a field may be null, a number where text
// is expected, or something else entirely. Such fields read as absent instead
// of failing the whole record.

fn text_from_json(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text_from_json(Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RawValue>, D::Error> {
    Ok(RawValue::from_json(Value::deserialize(deserializer)?))
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RawPrice>, D::Error> {
    Ok(RawPrice::from_json(Value::deserialize(deserializer)?))
}

/// Deal record as stored by the deals scraper
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawDeal {
    #[serde(alias = "legoId", alias = "lego_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_value")]
    pub price: Option<RawValue>,
    #[serde(alias = "nextBestPrice", alias = "retail", deserialize_with = "lenient_value")]
    pub list_price: Option<RawValue>,
    #[serde(deserialize_with = "lenient_value")]
    pub discount: Option<RawValue>,
    #[serde(alias = "commentsCount", alias = "nb_comments", deserialize_with = "lenient_value")]
    pub comments_count: Option<RawValue>,
    #[serde(deserialize_with = "lenient_value")]
    pub temperature: Option<RawValue>,
    #[serde(alias = "published", alias = "post_date", deserialize_with = "lenient_value")]
    pub post_date: Option<RawValue>,
    #[serde(alias = "url", deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(alias = "image", alias = "imageUrl", deserialize_with = "lenient_text")]
    pub image_url: Option<String>,
}

/// Resale record as stored by the marketplace scraper
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawListing {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<RawPrice>,
    #[serde(alias = "published", alias = "publishedTime", deserialize_with = "lenient_value")]
    pub published_time: Option<RawValue>,
    #[serde(alias = "url", deserialize_with = "lenient_string")]
    pub link: String,
}
