//! Variant resolution and display pricing for a single product view.
//!
//! Everything here is pure and total: given well-formed catalog data it never
//! fails, and malformed input (unknown option names, values outside an
//! option's list, duplicate variants) degrades to "unavailable" or "no match".

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::cart::{clamp_quantity, AddToCartRequest, CartItem};
use crate::catalog::{Product, Variant};
use crate::selection::Selection;

/// Everything the product view needs to render price, image and the
/// add-to-cart button for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState<'a> {
    pub matching_variant: Option<&'a Variant>,
    pub current_price: Decimal,
    pub current_compare_at: Option<Decimal>,
    /// Whole-number percentage off, present only when the compare-at price
    /// is strictly above the current price.
    pub discount_percentage: Option<u32>,
    pub current_image: Option<&'a str>,
    pub in_stock: bool,
    pub can_add_to_cart: bool,
}

/// Returns the single variant whose option values equal `selection` exactly.
///
/// Partial selections never match. Zero or several matching variants both
/// yield `None`; several matches mean the upstream catalog is inconsistent.
#[must_use]
pub fn resolve_matching_variant<'a>(
    product: &'a Product,
    selection: &Selection,
) -> Option<&'a Variant> {
    if !selection.is_complete(&product.options) {
        return None;
    }

    let mut matches = product
        .variants
        .iter()
        .filter(|v| &v.option_values == selection.as_map());

    let first = matches.next()?;
    if matches.next().is_some() {
        tracing::warn!(
            product_id = %product.id,
            slug = %product.slug,
            "several variants share one option combination; treating as no match"
        );
        return None;
    }
    Some(first)
}

/// Computes price, image and stock state for `product` given the matched
/// variant (if any) and the selection that produced it.
#[must_use]
pub fn compute_display_state<'a>(
    product: &'a Product,
    matching_variant: Option<&'a Variant>,
    selection: &Selection,
) -> DisplayState<'a> {
    let current_price = matching_variant.map_or(product.price, |v| v.price);
    let current_compare_at = matching_variant
        .and_then(|v| v.compare_at_price)
        .or(product.compare_at_price);

    let current_image = matching_variant
        .and_then(|v| v.image.as_deref())
        .or_else(|| product.primary_image());

    let in_stock = if product.has_variants() {
        matching_variant.is_some_and(Variant::in_stock)
    } else {
        variantless_in_stock(product)
    };

    let can_add_to_cart =
        in_stock && (!product.has_options() || selection.is_complete(&product.options));

    DisplayState {
        matching_variant,
        current_price,
        current_compare_at,
        discount_percentage: discount_percentage(current_price, current_compare_at),
        current_image,
        in_stock,
        can_add_to_cart,
    }
}

/// A product without variants is sellable unless it explicitly tracks
/// product-level stock and that stock is exhausted.
fn variantless_in_stock(product: &Product) -> bool {
    if product.track_inventory {
        product.inventory_quantity.unwrap_or(0) > 0
    } else {
        true
    }
}

/// `round_half_up(100 * (compare_at - price) / compare_at)`.
fn discount_percentage(price: Decimal, compare_at: Option<Decimal>) -> Option<u32> {
    let compare_at = compare_at?;
    if compare_at <= price || compare_at <= Decimal::ZERO {
        return None;
    }
    ((compare_at - price) * Decimal::ONE_HUNDRED / compare_at)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
}

/// Selection state and derived queries for one product view.
#[derive(Debug, Clone)]
pub struct VariantResolver<'a> {
    product: &'a Product,
    selection: Selection,
}

impl<'a> VariantResolver<'a> {
    /// Starts a view with an empty selection.
    #[must_use]
    pub fn new(product: &'a Product) -> Self {
        Self::with_selection(product, Selection::new())
    }

    #[must_use]
    pub fn with_selection(product: &'a Product, selection: Selection) -> Self {
        Self { product, selection }
    }

    #[must_use]
    pub fn product(&self) -> &'a Product {
        self.product
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether choosing `value` for `option_name` keeps at least one in-stock
    /// variant reachable, given the other values already chosen.
    ///
    /// Unchosen options act as wildcards. Unknown options and values outside
    /// the option's list are reported as unavailable.
    #[must_use]
    pub fn is_option_value_available(&self, option_name: &str, value: &str) -> bool {
        let Some(option) = self.product.option(option_name) else {
            return false;
        };
        if !option.has_value(value) {
            return false;
        }

        let hypothetical = self.selection.with_option(option_name, value);
        self.product.variants.iter().any(|variant| {
            variant.in_stock()
                && hypothetical
                    .iter()
                    .all(|(name, chosen)| variant.has_option_value(name, chosen))
        })
    }

    /// Records the shopper choosing `value` for `option_name`.
    pub fn handle_option_change(&mut self, option_name: &str, value: &str) -> &Selection {
        self.selection = self.selection.with_option(option_name, value);
        tracing::debug!(
            product_id = %self.product.id,
            option = option_name,
            value,
            "option selected"
        );
        &self.selection
    }

    #[must_use]
    pub fn matching_variant(&self) -> Option<&'a Variant> {
        resolve_matching_variant(self.product, &self.selection)
    }

    #[must_use]
    pub fn display_state(&self) -> DisplayState<'a> {
        compute_display_state(self.product, self.matching_variant(), &self.selection)
    }

    /// What adding to the cart would submit, or `None` when adding is not
    /// currently permitted. Quantities below one are raised to one.
    #[must_use]
    pub fn add_to_cart_request(&self, quantity: i64) -> Option<AddToCartRequest> {
        let state = self.display_state();
        if !state.can_add_to_cart {
            return None;
        }
        let item = match state.matching_variant {
            Some(variant) => CartItem::Variant(variant.id),
            None if !self.product.has_variants() => CartItem::Product(self.product.id),
            None => return None,
        };
        Some(AddToCartRequest {
            item,
            quantity: clamp_quantity(quantity),
            unit_price: state.current_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use uuid::Uuid;

    use super::*;
    use crate::catalog::{ProductOption, ProductStatus};

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn option(name: &str, values: &[&str]) -> ProductOption {
        ProductOption {
            name: name.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
            swatches: BTreeMap::new(),
        }
    }

    fn variant(product_id: Uuid, pairs: &[(&str, &str)], price: i64, stock: u32) -> Variant {
        Variant {
            id: Uuid::new_v4(),
            product_id,
            option_values: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            price: dec(price),
            compare_at_price: None,
            inventory_quantity: stock,
            sku: None,
            image: None,
        }
    }

    fn product(options: Vec<ProductOption>, variants: Vec<Variant>) -> Product {
        Product {
            id: variants.first().map_or_else(Uuid::new_v4, |v| v.product_id),
            title: "Storage Box".to_string(),
            slug: "storage-box".to_string(),
            description: None,
            options,
            variants,
            images: vec!["https://cdn.example.com/box.jpg".to_string()],
            price: dec(1800),
            compare_at_price: None,
            status: ProductStatus::Active,
            track_inventory: false,
            inventory_quantity: None,
        }
    }

    /// Beige/Small 20.00 ×5, Beige/Large 28.00 ×0, Gray/Small 22.00 ×3.
    fn storage_box() -> Product {
        let pid = Uuid::new_v4();
        product(
            vec![
                option("Color", &["Beige", "Gray"]),
                option("Size", &["Small", "Large"]),
            ],
            vec![
                variant(pid, &[("Color", "Beige"), ("Size", "Small")], 2000, 5),
                variant(pid, &[("Color", "Beige"), ("Size", "Large")], 2800, 0),
                variant(pid, &[("Color", "Gray"), ("Size", "Small")], 2200, 3),
            ],
        )
    }

    fn simple_product() -> Product {
        product(vec![], vec![])
    }

    // -----------------------------------------------------------------------
    // is_option_value_available
    // -----------------------------------------------------------------------

    #[test]
    fn large_unavailable_after_choosing_beige() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Beige");
        assert!(!resolver.is_option_value_available("Size", "Large"));
        assert!(resolver.is_option_value_available("Size", "Small"));
    }

    #[test]
    fn unset_options_are_wildcards() {
        let product = storage_box();
        let resolver = VariantResolver::new(&product);
        assert!(resolver.is_option_value_available("Color", "Beige"));
        assert!(resolver.is_option_value_available("Color", "Gray"));
        assert!(resolver.is_option_value_available("Size", "Small"));
        // Only Beige/Large carries Large, and it is out of stock.
        assert!(!resolver.is_option_value_available("Size", "Large"));
    }

    #[test]
    fn availability_replaces_the_option_being_checked() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Beige");
        resolver.handle_option_change("Size", "Small");
        // Gray/Small exists and is in stock even though Beige is chosen now.
        assert!(resolver.is_option_value_available("Color", "Gray"));
    }

    #[test]
    fn unknown_option_or_value_is_unavailable() {
        let product = storage_box();
        let resolver = VariantResolver::new(&product);
        assert!(!resolver.is_option_value_available("Material", "Oak"));
        assert!(!resolver.is_option_value_available("Color", "Purple"));
    }

    #[test]
    fn value_is_unavailable_when_every_variant_with_it_is_empty() {
        let pid = Uuid::new_v4();
        let product = product(
            vec![option("Color", &["Beige", "Gray"])],
            vec![
                variant(pid, &[("Color", "Beige")], 2000, 0),
                variant(pid, &[("Color", "Gray")], 2000, 1),
            ],
        );
        let resolver = VariantResolver::new(&product);
        assert!(!resolver.is_option_value_available("Color", "Beige"));
        assert!(resolver.is_option_value_available("Color", "Gray"));
    }

    // -----------------------------------------------------------------------
    // resolve_matching_variant
    // -----------------------------------------------------------------------

    #[test]
    fn complete_selection_resolves_single_variant() {
        let product = storage_box();
        let selection: Selection = [("Color", "Beige"), ("Size", "Small")].into_iter().collect();
        let matched = resolve_matching_variant(&product, &selection).expect("expected a match");
        assert_eq!(matched.id, product.variants[0].id);
    }

    #[test]
    fn partial_selection_never_matches() {
        let product = storage_box();
        let selection: Selection = [("Color", "Gray")].into_iter().collect();
        assert!(resolve_matching_variant(&product, &selection).is_none());
    }

    #[test]
    fn missing_combination_does_not_match() {
        let product = storage_box();
        let selection: Selection = [("Color", "Gray"), ("Size", "Large")].into_iter().collect();
        assert!(resolve_matching_variant(&product, &selection).is_none());
    }

    #[test]
    fn duplicate_combination_does_not_match() {
        let mut product = storage_box();
        let duplicate = variant(
            product.id,
            &[("Color", "Beige"), ("Size", "Small")],
            1900,
            2,
        );
        product.variants.push(duplicate);
        let selection: Selection = [("Color", "Beige"), ("Size", "Small")].into_iter().collect();
        assert!(resolve_matching_variant(&product, &selection).is_none());
    }

    #[test]
    fn extra_selection_entries_do_not_match() {
        let product = storage_box();
        let selection: Selection = [("Color", "Beige"), ("Size", "Small"), ("Lid", "Yes")]
            .into_iter()
            .collect();
        assert!(resolve_matching_variant(&product, &selection).is_none());
    }

    // -----------------------------------------------------------------------
    // compute_display_state
    // -----------------------------------------------------------------------

    #[test]
    fn matched_variant_drives_price_and_cart() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Beige");
        resolver.handle_option_change("Size", "Small");
        let state = resolver.display_state();
        assert_eq!(state.current_price, dec(2000));
        assert!(state.in_stock);
        assert!(state.can_add_to_cart);
    }

    #[test]
    fn unmatched_complete_selection_cannot_add_to_cart() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Gray");
        resolver.handle_option_change("Size", "Large");
        let state = resolver.display_state();
        assert!(state.matching_variant.is_none());
        assert_eq!(state.current_price, product.price);
        assert!(!state.in_stock);
        assert!(!state.can_add_to_cart);
    }

    #[test]
    fn partial_selection_falls_back_to_base_price() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Gray");
        let state = resolver.display_state();
        assert!(state.matching_variant.is_none());
        assert_eq!(state.current_price, dec(1800));
        assert!(!state.can_add_to_cart);
    }

    #[test]
    fn matched_out_of_stock_variant_is_not_in_stock() {
        let product = storage_box();
        let selection: Selection = [("Color", "Beige"), ("Size", "Large")].into_iter().collect();
        let resolver = VariantResolver::with_selection(&product, selection);
        let state = resolver.display_state();
        assert_eq!(state.current_price, dec(2800));
        assert!(!state.in_stock);
        assert!(!state.can_add_to_cart);
    }

    #[test]
    fn variant_compare_at_and_image_override_product() {
        let mut product = storage_box();
        product.compare_at_price = Some(dec(9900));
        product.variants[0].compare_at_price = Some(dec(2500));
        product.variants[0].image = Some("https://cdn.example.com/beige.jpg".to_string());
        let selection: Selection = [("Color", "Beige"), ("Size", "Small")].into_iter().collect();
        let resolver = VariantResolver::with_selection(&product, selection);
        let state = resolver.display_state();
        assert_eq!(state.current_compare_at, Some(dec(2500)));
        assert_eq!(state.current_image, Some("https://cdn.example.com/beige.jpg"));
        assert_eq!(state.discount_percentage, Some(20));
    }

    #[test]
    fn variant_without_compare_at_uses_product_compare_at() {
        let mut product = storage_box();
        product.compare_at_price = Some(dec(2400));
        let selection: Selection = [("Color", "Gray"), ("Size", "Small")].into_iter().collect();
        let resolver = VariantResolver::with_selection(&product, selection);
        let state = resolver.display_state();
        assert_eq!(state.current_compare_at, Some(dec(2400)));
        assert_eq!(state.current_image, Some("https://cdn.example.com/box.jpg"));
    }

    #[test]
    fn no_images_means_no_current_image() {
        let mut product = simple_product();
        product.images.clear();
        let state = VariantResolver::new(&product).display_state();
        assert!(state.current_image.is_none());
    }

    #[test]
    fn discount_rounds_half_up() {
        // 100 * (8.00 - 6.99) / 8.00 = 12.625 → 13
        assert_eq!(discount_percentage(dec(699), Some(dec(800))), Some(13));
        // 100 * (2.00 - 1.99) / 2.00 = 0.5 → 1
        assert_eq!(discount_percentage(dec(199), Some(dec(200))), Some(1));
        // 100 * (3.00 - 2.00) / 3.00 = 33.33 → 33
        assert_eq!(discount_percentage(dec(200), Some(dec(300))), Some(33));
    }

    #[test]
    fn discount_absent_unless_compare_at_exceeds_price() {
        assert_eq!(discount_percentage(dec(2000), None), None);
        assert_eq!(discount_percentage(dec(2000), Some(dec(2000))), None);
        assert_eq!(discount_percentage(dec(2000), Some(dec(1500))), None);
    }

    #[test]
    fn optionless_product_can_add_when_in_stock() {
        let product = simple_product();
        let state = VariantResolver::new(&product).display_state();
        assert!(state.in_stock);
        assert_eq!(state.can_add_to_cart, state.in_stock);
    }

    #[test]
    fn optionless_product_respects_tracked_inventory() {
        let mut product = simple_product();
        product.track_inventory = true;
        product.inventory_quantity = Some(0);
        let state = VariantResolver::new(&product).display_state();
        assert!(!state.in_stock);
        assert_eq!(state.can_add_to_cart, state.in_stock);

        product.inventory_quantity = Some(4);
        let state = VariantResolver::new(&product).display_state();
        assert!(state.in_stock);
        assert!(state.can_add_to_cart);
    }

    #[test]
    fn optionless_product_with_single_variant_matches_it() {
        let pid = Uuid::new_v4();
        let product = product(vec![], vec![variant(pid, &[], 1500, 2)]);
        let state = VariantResolver::new(&product).display_state();
        assert_eq!(state.current_price, dec(1500));
        assert!(state.in_stock);
        assert_eq!(state.can_add_to_cart, state.in_stock);
    }

    // -----------------------------------------------------------------------
    // add_to_cart_request
    // -----------------------------------------------------------------------

    #[test]
    fn add_to_cart_request_uses_matched_variant() {
        let product = storage_box();
        let selection: Selection = [("Color", "Gray"), ("Size", "Small")].into_iter().collect();
        let resolver = VariantResolver::with_selection(&product, selection);
        let request = resolver.add_to_cart_request(2).expect("expected a request");
        assert_eq!(request.item, CartItem::Variant(product.variants[2].id));
        assert_eq!(request.quantity, 2);
        assert_eq!(request.unit_price, dec(2200));
    }

    #[test]
    fn add_to_cart_request_uses_product_when_variantless() {
        let product = simple_product();
        let request = VariantResolver::new(&product)
            .add_to_cart_request(0)
            .expect("expected a request");
        assert_eq!(request.item, CartItem::Product(product.id));
        assert_eq!(request.quantity, 1);
    }

    #[test]
    fn add_to_cart_request_refused_for_partial_selection() {
        let product = storage_box();
        let mut resolver = VariantResolver::new(&product);
        resolver.handle_option_change("Color", "Beige");
        assert!(resolver.add_to_cart_request(1).is_none());
    }
}
