//! Normalization from backend rows to [`storefront_core`] domain types.

use storefront_core::{
    Collection, Product, ProductOption, ProductStatus, Review, ReviewCustomer, Variant,
};

use crate::error::CatalogError;
use crate::types::{CollectionRow, OptionRow, ProductRow, ReviewRow, VariantRow};

/// Builds a [`Product`] from its row and the variant rows fetched for it.
///
/// Variant rows belonging to another product are dropped with a warning.
///
/// # Errors
///
/// Returns [`CatalogError::Normalization`] if the product has a blank slug
/// or a negative price.
pub fn normalize_product(
    row: ProductRow,
    variant_rows: Vec<VariantRow>,
) -> Result<Product, CatalogError> {
    let id = row.id;
    if row.slug.trim().is_empty() {
        return Err(CatalogError::Normalization {
            table: "products",
            id: id.to_string(),
            reason: "product has an empty slug".into(),
        });
    }
    if row.price.is_sign_negative() {
        return Err(CatalogError::Normalization {
            table: "products",
            id: id.to_string(),
            reason: format!("negative base price {}", row.price),
        });
    }

    let variants = variant_rows
        .into_iter()
        .filter(|v| {
            if v.product_id == id {
                true
            } else {
                tracing::warn!(
                    product_id = %id,
                    variant_id = %v.id,
                    "dropping variant row that belongs to another product"
                );
                false
            }
        })
        .map(normalize_variant)
        .collect();

    let options = row
        .options
        .unwrap_or_default()
        .into_iter()
        .map(normalize_option)
        .collect();

    // Treat an empty description as absent.
    let description = row.description.filter(|d| !d.trim().is_empty());
    let images = row
        .images
        .unwrap_or_default()
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect();

    Ok(Product {
        id,
        title: row.title,
        slug: row.slug,
        description,
        options,
        variants,
        images,
        price: row.price,
        compare_at_price: row.compare_at_price,
        status: parse_status(&row.status),
        track_inventory: row.track_inventory.unwrap_or(false),
        inventory_quantity: row.inventory_quantity.map(|q| clamp_stock(q, &id.to_string())),
    })
}

fn normalize_option(row: OptionRow) -> ProductOption {
    ProductOption {
        name: row.name,
        values: row.values,
        swatches: row.swatches.unwrap_or_default(),
    }
}

fn normalize_variant(row: VariantRow) -> Variant {
    let inventory_quantity = clamp_stock(row.inventory_quantity.unwrap_or(0), &row.id.to_string());
    Variant {
        id: row.id,
        product_id: row.product_id,
        option_values: row.option_values.unwrap_or_default(),
        price: row.price,
        compare_at_price: row.compare_at_price,
        inventory_quantity,
        // Treat empty SKU and image strings as absent.
        sku: row.sku.filter(|s| !s.trim().is_empty()),
        image: row.image.filter(|s| !s.trim().is_empty()),
    }
}

#[must_use]
pub fn normalize_collection(row: CollectionRow) -> Collection {
    Collection {
        id: row.id,
        name: row.name,
        handle: row.handle,
        description: row.description.filter(|d| !d.trim().is_empty()),
        image: row.image.filter(|s| !s.trim().is_empty()),
        status: parse_status(&row.status),
    }
}

/// Builds a [`Review`], clamping out-of-range ratings into 1..=5.
#[must_use]
pub fn normalize_review(row: ReviewRow) -> Review {
    let rating = u8::try_from(row.rating.clamp(1, 5)).unwrap_or(1);
    if i32::from(rating) != row.rating {
        tracing::warn!(review_id = %row.id, rating = row.rating, "clamping out-of-range rating");
    }
    Review {
        id: row.id,
        product_id: row.product_id,
        customer_id: row.customer_id,
        rating,
        title: row.title,
        comment: row.comment,
        created_at: row.created_at,
        customer: row.customers.map(|c| ReviewCustomer {
            first_name: c.first_name.filter(|s| !s.trim().is_empty()),
            last_name: c.last_name.filter(|s| !s.trim().is_empty()),
            email: c.email,
        }),
    }
}

/// Maps the status column; unknown values are treated as not shoppable.
fn parse_status(raw: &str) -> ProductStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "active" => ProductStatus::Active,
        "draft" => ProductStatus::Draft,
        "archived" => ProductStatus::Archived,
        "inactive" => ProductStatus::Inactive,
        other => {
            tracing::warn!(status = other, "unknown catalog status; treating as inactive");
            ProductStatus::Inactive
        }
    }
}

fn clamp_stock(quantity: i64, row_id: &str) -> u32 {
    if quantity < 0 {
        tracing::warn!(row_id, quantity, "negative inventory quantity clamped to 0");
    }
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::types::ReviewCustomerRow;

    fn product_row(id: Uuid) -> ProductRow {
        ProductRow {
            id,
            title: "Storage Box".to_owned(),
            slug: "storage-box".to_owned(),
            description: Some("<p>Stackable.</p>".to_owned()),
            price: Decimal::new(2000, 2),
            compare_at_price: None,
            images: Some(vec!["https://cdn.example.com/box.jpg".to_owned()]),
            options: Some(vec![OptionRow {
                id: Some("opt_1".to_owned()),
                name: "Color".to_owned(),
                values: vec!["Beige".to_owned(), "Gray".to_owned()],
                swatches: None,
            }]),
            status: "active".to_owned(),
            track_inventory: None,
            inventory_quantity: None,
            created_at: None,
        }
    }

    fn variant_row(product_id: Uuid, color: &str, stock: Option<i64>) -> VariantRow {
        let mut option_values = BTreeMap::new();
        option_values.insert("Color".to_owned(), color.to_owned());
        VariantRow {
            id: Uuid::new_v4(),
            product_id,
            option_values: Some(option_values),
            price: Decimal::new(2000, 2),
            compare_at_price: None,
            inventory_quantity: stock,
            sku: Some("BOX-BG".to_owned()),
            image: None,
        }
    }

    #[test]
    fn normalize_product_attaches_options_and_variants() {
        let id = Uuid::new_v4();
        let product = normalize_product(
            product_row(id),
            vec![variant_row(id, "Beige", Some(5)), variant_row(id, "Gray", Some(0))],
        )
        .unwrap();
        assert_eq!(product.options.len(), 1);
        assert_eq!(product.variants.len(), 2);
        assert!(product.status.is_active());
        assert!(!product.track_inventory);
        assert!(product.options[0].swatches.is_empty());
    }

    #[test]
    fn normalize_product_drops_foreign_variants() {
        let id = Uuid::new_v4();
        let product = normalize_product(
            product_row(id),
            vec![variant_row(id, "Beige", Some(1)), variant_row(Uuid::new_v4(), "Gray", Some(1))],
        )
        .unwrap();
        assert_eq!(product.variants.len(), 1);
    }

    #[test]
    fn normalize_product_rejects_blank_slug() {
        let mut row = product_row(Uuid::new_v4());
        row.slug = "  ".to_owned();
        let err = normalize_product(row, vec![]).unwrap_err();
        assert!(
            matches!(err, CatalogError::Normalization { ref reason, .. } if reason.contains("empty slug"))
        );
    }

    #[test]
    fn normalize_product_rejects_negative_price() {
        let mut row = product_row(Uuid::new_v4());
        row.price = Decimal::new(-100, 2);
        assert!(normalize_product(row, vec![]).is_err());
    }

    #[test]
    fn normalize_product_null_collections_become_empty() {
        let mut row = product_row(Uuid::new_v4());
        row.options = None;
        row.images = None;
        row.description = Some("   ".to_owned());
        let product = normalize_product(row, vec![]).unwrap();
        assert!(product.options.is_empty());
        assert!(product.images.is_empty());
        assert!(product.description.is_none());
    }

    #[test]
    fn normalize_variant_clamps_negative_stock() {
        let id = Uuid::new_v4();
        let product =
            normalize_product(product_row(id), vec![variant_row(id, "Beige", Some(-3))]).unwrap();
        assert_eq!(product.variants[0].inventory_quantity, 0);
    }

    #[test]
    fn normalize_variant_missing_stock_is_zero() {
        let id = Uuid::new_v4();
        let product =
            normalize_product(product_row(id), vec![variant_row(id, "Beige", None)]).unwrap();
        assert_eq!(product.variants[0].inventory_quantity, 0);
    }

    #[test]
    fn normalize_variant_empty_sku_becomes_none() {
        let id = Uuid::new_v4();
        let mut variant = variant_row(id, "Beige", Some(1));
        variant.sku = Some(String::new());
        let product = normalize_product(product_row(id), vec![variant]).unwrap();
        assert!(product.variants[0].sku.is_none());
    }

    #[test]
    fn unknown_status_is_inactive() {
        let mut row = product_row(Uuid::new_v4());
        row.status = "hidden".to_owned();
        let product = normalize_product(row, vec![]).unwrap();
        assert_eq!(product.status, ProductStatus::Inactive);
    }

    #[test]
    fn normalize_review_clamps_rating_and_blank_names() {
        let review = normalize_review(ReviewRow {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            rating: 9,
            title: "Great".to_owned(),
            comment: "Really great.".to_owned(),
            created_at: Utc::now(),
            customers: Some(ReviewCustomerRow {
                first_name: Some("Ana".to_owned()),
                last_name: Some(String::new()),
                email: "ana@example.com".to_owned(),
            }),
        });
        assert_eq!(review.rating, 5);
        assert_eq!(review.author_label().as_deref(), Some("ana@example.com"));
    }
}
