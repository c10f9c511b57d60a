use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a catalog row. Only `Active` rows are shown to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
    Draft,
    Archived,
}

impl ProductStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == ProductStatus::Active
    }
}

/// A product as presented on the storefront, with its option axes and
/// purchasable variants already attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    /// URL slug used by `/products/{slug}`.
    pub slug: String,
    /// Raw HTML description, if any.
    pub description: Option<String>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<Variant>,
    pub images: Vec<String>,
    /// Base price, shown whenever no variant is matched.
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub status: ProductStatus,
    /// Whether stock is tracked for a product without variants. Variant-level
    /// stock is always tracked.
    pub track_inventory: bool,
    /// Product-level stock, only consulted when `track_inventory` is set and
    /// the product has no variants.
    pub inventory_quantity: Option<u32>,
}

impl Product {
    /// Returns `true` if the product defines at least one option axis.
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Looks up an option definition by its exact name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// First image in the gallery, used when no variant image applies.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A named axis of variation such as `"Color"` or `"Size"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
    /// Value → CSS colour, only meaningful for colour-like options.
    #[serde(default)]
    pub swatches: BTreeMap<String, String>,
}

impl ProductOption {
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// `true` when the option name reads as a colour axis (`"Color"`, `"colour"`).
    #[must_use]
    pub fn is_color(&self) -> bool {
        let name = self.name.trim().to_lowercase();
        name == "color" || name == "colour"
    }

    /// Swatch colour for `value`, if this is a colour option that defines one.
    #[must_use]
    pub fn swatch_for(&self, value: &str) -> Option<&str> {
        if !self.is_color() {
            return None;
        }
        self.swatches.get(value).map(String::as_str)
    }
}

/// One concrete, purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Option name → chosen value; one entry per option on the product.
    pub option_values: BTreeMap<String, String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub inventory_quantity: u32,
    pub sku: Option<String>,
    /// Image shown instead of the product's primary image when this variant is selected.
    pub image: Option<String>,
}

impl Variant {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.inventory_quantity > 0
    }

    /// Returns `true` if this variant carries `value` for `option_name`.
    #[must_use]
    pub fn has_option_value(&self, option_name: &str, value: &str) -> bool {
        self.option_values
            .get(option_name)
            .is_some_and(|v| v == value)
    }

    /// Human-readable title built from option values in product option order,
    /// e.g. `"Beige / Small"`.
    #[must_use]
    pub fn title(&self, options: &[ProductOption]) -> String {
        options
            .iter()
            .filter_map(|o| self.option_values.get(&o.name).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// A curated group of products, browsable by handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    /// URL slug used by `/collections/{handle}`.
    pub handle: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: ProductStatus,
}
