use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Canonical key of the free in-store pickup option.
pub const PICKUP_KEY: &str = "pickup";

/// Quote request exactly as the storefront sends it.
///
/// Storefronts send numbers as strings and postal codes as numbers, so both shapes are
/// accepted. `null` or unreadable text in a dimension reads as 0.0 and falls back to the
/// default package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuoteRequest {
    #[serde(default, deserialize_with = "lenient_postal_code")]
    pub cep_destino: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub peso_total: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub comprimento: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub largura: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub altura: f64,
}

fn lenient_postal_code<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::invalid_type(
            unexpected(&other),
            &"a postal code string or number",
        )),
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Ok(s.trim().parse::<f64>().unwrap_or(0.0)),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a number")),
    }
}

fn unexpected(value: &serde_json::Value) -> de::Unexpected<'_> {
    match value {
        serde_json::Value::Bool(b) => de::Unexpected::Bool(*b),
        serde_json::Value::Array(_) => de::Unexpected::Seq,
        serde_json::Value::Object(_) => de::Unexpected::Map,
        _ => de::Unexpected::Other("value"),
    }
}

/// Package weight (kg) and dimensions (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageDimensions {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl PackageDimensions {
    pub const DEFAULT: PackageDimensions = PackageDimensions {
        weight: 1.0,
        length: 20.0,
        width: 15.0,
        height: 10.0,
    };

    /// NaN compares false, so it counts as non-positive.
    pub fn all_positive(&self) -> bool {
        [self.weight, self.length, self.width, self.height]
            .iter()
            .all(|v| *v > 0.0)
    }
}

impl Default for PackageDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A request that went through the sanitizer. Only `core::sanitizer` builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentQuoteRequest {
    pub(crate) destination_postal_code: String,
    pub(crate) package: PackageDimensions,
}

impl ShipmentQuoteRequest {
    pub fn destination_postal_code(&self) -> &str {
        &self.destination_postal_code
    }

    pub fn package(&self) -> &PackageDimensions {
        &self.package
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostalAddress {
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductLine {
    pub name: String,
    pub quantity: u32,
    pub weight: f64,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub insurance_value: f64,
}

/// Body of `POST /me/shipment/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPayload {
    pub from: PostalAddress,
    pub to: PostalAddress,
    pub products: Vec<ProductLine>,
    pub receipt: bool,
    pub own_hand: bool,
    pub platform: String,
}

/// Raw answer of the provider, uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

impl ProviderReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One element of the provider's response array.
///
/// `error` and `price` use [`present`] so that a key sent as `null` still counts as
/// present, while a missing key stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderServiceQuote {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub error: Option<serde_json::Value>,
}

impl ProviderServiceQuote {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The provider sends prices either as numbers or as decimal strings ("23.40").
    /// Anything unreadable (null, objects, non-numeric text) reads as 0.0.
    pub fn price_value(&self) -> f64 {
        match &self.price {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            Some(serde_json::Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Canonical service key → price, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteResult {
    prices: BTreeMap<String, f64>,
}

impl QuoteResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, price: f64) {
        self.prices.insert(key.into(), price);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.prices.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.prices.contains_key(key)
    }

    pub fn remove_negative_prices(&mut self) {
        self.prices.retain(|_, price| *price >= 0.0);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// True when anything other than the static pickup option is present.
    pub fn has_carrier_rates(&self) -> bool {
        self.prices.keys().any(|k| k != PICKUP_KEY)
    }
}
