use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest count the cart badge shows before collapsing to `"99+"`.
const BADGE_MAX: u32 = 99;

/// What a cart line refers to: a concrete variant, or the product itself
/// when it has no variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CartItem {
    Variant(Uuid),
    Product(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub item: CartItem,
    pub quantity: u32,
    /// Price shown to the shopper when the request was built.
    pub unit_price: Decimal,
}

/// Receives add-to-cart requests. The storefront only decides whether and
/// what to add; persisting the cart belongs to the implementor.
pub trait CartSink {
    fn add(&mut self, request: AddToCartRequest);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// In-memory cart that merges repeated adds of the same item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }

    /// Badge text for the header cart icon.
    #[must_use]
    pub fn badge_label(&self) -> Option<String> {
        cart_badge_label(self.total_items())
    }
}

impl CartSink for Cart {
    fn add(&mut self, request: AddToCartRequest) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item == request.item) {
            line.quantity = line.quantity.saturating_add(request.quantity);
            line.unit_price = request.unit_price;
        } else {
            self.lines.push(CartLine {
                item: request.item,
                quantity: request.quantity,
                unit_price: request.unit_price,
            });
        }
        tracing::debug!(item = ?request.item, quantity = request.quantity, "added to cart");
    }
}

/// Badge text for a cart holding `total_items`: hidden when empty, capped at `"99+"`.
#[must_use]
pub fn cart_badge_label(total_items: u32) -> Option<String> {
    match total_items {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}

/// Normalizes a requested quantity; anything below one becomes one.
#[must_use]
pub fn clamp_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}
