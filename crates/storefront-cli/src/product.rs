//! `product` command: renders one product view for a given option selection.

use rust_decimal::Decimal;
use serde::Serialize;
use storefront_catalog::CatalogClient;
use storefront_core::{
    format_money, AddToCartRequest, Cart, CartSink, DisplayState, Product, VariantResolver,
};

/// One selectable value of an option, as shown on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OptionValueView<'a> {
    pub value: &'a str,
    pub selected: bool,
    pub available: bool,
    pub swatch: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OptionView<'a> {
    pub name: &'a str,
    pub values: Vec<OptionValueView<'a>>,
}

/// Everything the `product` command prints.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProductView<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub variant_title: Option<String>,
    pub display: DisplayState<'a>,
    pub options: Vec<OptionView<'a>>,
    pub add_to_cart: Option<AddToCartRequest>,
}

/// Applies `selections` in order and builds the resulting view.
///
/// Choices naming an unknown option are still recorded; they make the
/// selection unmatched rather than failing the command.
pub(crate) fn build_product_view<'a>(
    product: &'a Product,
    selections: &[(String, String)],
    quantity: i64,
) -> ProductView<'a> {
    let mut resolver = VariantResolver::new(product);
    for (name, value) in selections {
        if product.option(name).is_none() {
            tracing::warn!(slug = %product.slug, option = %name, "product has no such option");
        }
        resolver.handle_option_change(name, value);
    }

    let options = product
        .options
        .iter()
        .map(|option| OptionView {
            name: &option.name,
            values: option
                .values
                .iter()
                .map(|value| OptionValueView {
                    value: value.as_str(),
                    selected: resolver.selection().is_selected(&option.name, value),
                    available: resolver.is_option_value_available(&option.name, value),
                    swatch: option.swatch_for(value),
                })
                .collect(),
        })
        .collect();

    let display = resolver.display_state();
    ProductView {
        title: &product.title,
        slug: &product.slug,
        variant_title: display.matching_variant.map(|v| v.title(&product.options)),
        display,
        options,
        add_to_cart: resolver.add_to_cart_request(quantity),
    }
}

/// Renders `view` as the plain-text product page.
pub(crate) fn render_product_view(view: &ProductView<'_>, currency: &str) -> String {
    let mut lines = vec![format!("{} ({})", view.title, view.slug)];
    if let Some(variant_title) = &view.variant_title {
        lines.push(format!("  variant: {variant_title}"));
    }
    if let Some(variant) = view.display.matching_variant {
        lines.push(format!("  sku: {}", variant.sku.as_deref().unwrap_or("N/A")));
    }
    lines.push(format!("  price: {}", price_line(&view.display, currency)));
    let stock = if view.display.in_stock { "in stock" } else { "out of stock" };
    match view.display.matching_variant {
        Some(variant) => lines.push(format!(
            "  stock: {stock} ({} available)",
            variant.inventory_quantity
        )),
        None => lines.push(format!("  stock: {stock}")),
    }
    if let Some(image) = view.display.current_image {
        lines.push(format!("  image: {image}"));
    }

    for option in &view.options {
        let rendered: Vec<String> = option
            .values
            .iter()
            .map(|v| {
                let mut label = v.value.to_owned();
                if let Some(swatch) = v.swatch {
                    label.push_str(&format!(" [{swatch}]"));
                }
                if v.selected {
                    label = format!("*{label}*");
                }
                if !v.available {
                    label.push_str(" (unavailable)");
                }
                label
            })
            .collect();
        lines.push(format!("  {}: {}", option.name, rendered.join(", ")));
    }

    match &view.add_to_cart {
        Some(request) => lines.push(format!(
            "  add to cart: {} x {}",
            request.quantity,
            format_money(request.unit_price, currency)
        )),
        None => lines.push("  add to cart: unavailable".to_owned()),
    }
    lines.join("\n")
}

fn price_line(display: &DisplayState<'_>, currency: &str) -> String {
    let mut line = format_money(display.current_price, currency);
    if let (Some(compare_at), Some(pct)) = (display.current_compare_at, display.discount_percentage)
    {
        line.push_str(&format!(" (was {}, -{pct}%)", format_money(compare_at, currency)));
    }
    line
}

/// Fetches the product, prints its view and simulates the add to an empty cart.
pub(crate) async fn run_product(
    client: &CatalogClient,
    currency: &str,
    slug: &str,
    selections: &[(String, String)],
    quantity: i64,
    json: bool,
) -> anyhow::Result<()> {
    let product = client.fetch_product_by_slug(slug).await?;
    let view = build_product_view(&product, selections, quantity);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", render_product_view(&view, currency));
    if let Some(request) = view.add_to_cart.clone() {
        let mut cart = Cart::new();
        cart.add(request);
        println!(
            "  cart: {} item(s), subtotal {}{}",
            cart.total_items(),
            format_money(cart.subtotal(), currency),
            cart.badge_label()
                .map(|badge| format!(", badge {badge}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

/// One-line summary used by listing commands.
pub(crate) fn product_summary_line(product: &Product, currency: &str) -> String {
    let price = match product.compare_at_price {
        Some(compare_at) if compare_at > product.price && compare_at > Decimal::ZERO => format!(
            "{} (was {})",
            format_money(product.price, currency),
            format_money(compare_at, currency)
        ),
        _ => format_money(product.price, currency),
    };
    format!("{}  {}  {}", product.slug, product.title, price)
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
