//! Row shapes returned by the backend's REST interface.
//!
//! ## Observed shape
//!
//! ### Numeric columns
//! `price` and `compare_at_price` are `numeric` columns and arrive as JSON
//! numbers (`20`, `27.5`). `rust_decimal` accepts both numbers and strings.
//!
//! ### `options`
//! A `jsonb` array on the product row:
//! `[{"id": "opt_1", "name": "Color", "values": ["Beige"], "swatches": {"Beige": "#d8c8a8"}}]`.
//! `null` for products without options.
//!
//! ### `option_values`
//! A `jsonb` object on each variant row mapping option name to value. Older
//! rows name the column `options`; both are accepted.
//!
//! ### `inventory_quantity`
//! A signed integer; negative values appear after oversells and are clamped
//! during normalization.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    /// Gallery URLs; `null` when the product has no images.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub options: Option<Vec<OptionRow>>,
    pub status: String,
    #[serde(default)]
    pub track_inventory: Option<bool>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionRow {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub swatches: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantRow {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(default, alias = "options")]
    pub option_values: Option<BTreeMap<String, String>>,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRow {
    pub id: Uuid,
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub status: String,
}

/// Join-table row from `collection_products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionProductRow {
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerIdRow {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    /// Embedded via `select=*,customers(first_name,last_name,email)`.
    #[serde(default)]
    pub customers: Option<ReviewCustomerRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCustomerRow {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
}

/// Body for inserting into `reviews`.
#[derive(Debug, Clone, Serialize)]
pub struct NewReviewRow<'a> {
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub rating: u8,
    pub title: &'a str,
    pub comment: &'a str,
}

/// Body for inserting into `newsletter_subscribers`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscriberRow<'a> {
    pub email: &'a str,
    pub store_id: Uuid,
}
