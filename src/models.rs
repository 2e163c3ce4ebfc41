//! Product records as exchanged with the product service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_SUB_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_UNIT: &str = "Piece";

/// Server-assigned product identifier.
///
/// The service decides the representation; whatever JSON scalar it sends is kept
/// and sent back unchanged. Ids compare by their text form, so `Number(12)` and
/// `Text("12")` name the same product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProductId::Number(a), ProductId::Number(b)) => a == b,
            (ProductId::Text(a), ProductId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl ProductId {
    /// Percent-encoded form for use as a URL path segment
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.to_string()).into_owned()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => ProductId::Number(n),
            Err(_) => ProductId::Text(s.to_string()),
        })
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_sub_category() -> String {
    DEFAULT_SUB_CATEGORY.to_string()
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_true() -> bool {
    true
}

/// A product known to the service (it has an id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_sub_category")]
    pub sub_category: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default, with = "expiry_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    /// Builds the canonical record for a draft once the service assigned `id`.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            sub_category: draft.sub_category,
            quantity: draft.quantity,
            price: draft.price,
            unit: draft.unit,
            brand: draft.brand,
            sku: draft.sku,
            barcode: draft.barcode,
            expiry_date: draft.expiry_date,
            is_active: draft.is_active,
        }
    }

    /// The same field values without the id
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            quantity: self.quantity,
            price: self.price,
            unit: self.unit.clone(),
            brand: self.brand.clone(),
            sku: self.sku.clone(),
            barcode: self.barcode.clone(),
            expiry_date: self.expiry_date,
            is_active: self.is_active,
        }
    }

    pub fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }

    pub fn with_expiry_date(&self, expiry_date: Option<NaiveDate>) -> Self {
        Self {
            expiry_date,
            ..self.clone()
        }
    }

    pub fn with_active(&self, is_active: bool) -> Self {
        Self {
            is_active,
            ..self.clone()
        }
    }
}

/// A product payload without an id, submitted for creation.
///
/// `Default` is the blank input scaffold: empty name, default classification
/// and unit, quantity 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_sub_category")]
    pub sub_category: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default, with = "expiry_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            category: default_category(),
            sub_category: default_sub_category(),
            quantity: 1,
            price: 0.0,
            unit: default_unit(),
            brand: None,
            sku: None,
            barcode: None,
            expiry_date: None,
            is_active: true,
        }
    }
}

impl ProductDraft {
    /// Scaffold with only the name filled in
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Case-insensitive name comparison used for the uniqueness rule
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Expiry dates go out as `YYYY-MM-DD`; the service may answer with a plain date,
/// a naive ISO datetime or RFC 3339.
mod expiry_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid expiry date: {}", s))),
        }
    }

    fn parse(s: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(s, FORMAT) {
            return Some(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
