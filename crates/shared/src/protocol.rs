use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ProductId, UserUid};

/// Product record as exchanged with the catalog backend.
///
/// Submissions reuse this shape inside [`Envelope`]. Decoding is lenient so
/// records written by other clients (string prices, boolean flags, missing
/// image lists) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub origin_price: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "enabled_flag")]
    pub is_enabled: u8,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(rename = "imagesUrl", default)]
    pub images_url: Vec<String>,
}

impl ProductRecord {
    pub fn enabled(&self) -> bool {
        self.is_enabled != 0
    }
}

/// `{ data: ... }` wrapper used by create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigninResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<MessageText>,
    #[serde(default)]
    pub uid: UserUid,
    pub token: String,
    /// Session expiry in epoch milliseconds.
    pub expired: i64,
}

/// Body returned by create, update, delete and session check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<MessageText>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FailureBody {
    #[serde(default)]
    pub message: Option<MessageText>,
}

/// Backend messages are a single string, or a list for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageText {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageText::One(text) => f.write_str(text),
            MessageText::Many(items) => f.write_str(&items.join("; ")),
        }
    }
}

/// Converts form text to a number the way a browser `Number()` cast does for
/// the inputs the console accepts: surrounding whitespace is ignored, empty
/// text is zero and anything unparseable is NaN.
///
/// NaN is not rejected here; `serde_json` writes it as `null`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(text)) => coerce_number(&text),
        None => f64::NAN,
    })
}

fn enabled_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Number(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(true)) => 1,
        Some(Raw::Number(value)) if value != 0.0 => 1,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_form_text_like_a_number_cast() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("  "), 0.0);
        assert_eq!(coerce_number(" 120 "), 120.0);
        assert_eq!(coerce_number("19.5"), 19.5);
        assert!(coerce_number("twelve").is_nan());
    }

    #[test]
    fn decodes_record_with_loose_types() {
        let record: ProductRecord = serde_json::from_str(
            r#"{
                "id": "-Nx1",
                "title": "Tea",
                "origin_price": "300",
                "price": 250,
                "is_enabled": true,
                "imageUrl": "https://img/main.png"
            }"#,
        )
        .expect("record");

        assert_eq!(record.id, ProductId::from("-Nx1"));
        assert_eq!(record.origin_price, 300.0);
        assert_eq!(record.price, 250.0);
        assert!(record.enabled());
        assert!(record.images_url.is_empty());
        assert_eq!(record.unit, "");
    }

    #[test]
    fn null_price_decodes_as_nan() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id":"a","price":null,"is_enabled":0}"#).expect("record");
        assert!(record.price.is_nan());
        assert!(!record.enabled());
    }

    #[test]
    fn nan_price_is_written_as_null() {
        let record = ProductRecord {
            id: ProductId::default(),
            title: String::new(),
            category: String::new(),
            origin_price: f64::NAN,
            price: 10.0,
            unit: String::new(),
            description: String::new(),
            content: String::new(),
            is_enabled: 1,
            image_url: String::new(),
            images_url: Vec::new(),
        };
        let json = serde_json::to_value(Envelope { data: record }).expect("json");
        assert!(json["data"]["origin_price"].is_null());
        assert_eq!(json["data"]["price"], 10.0);
        assert_eq!(json["data"]["is_enabled"], 1);
        assert!(json["data"]["imagesUrl"].as_array().expect("array").is_empty());
    }
}
