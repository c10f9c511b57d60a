//! Product and collection reads.

use std::collections::HashMap;

use serde::Serialize;
use storefront_core::{Collection, Product};
use uuid::Uuid;

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::normalize::{normalize_collection, normalize_product};
use crate::query::Query;
use crate::types::{CollectionProductRow, CollectionRow, ProductRow, VariantRow};

/// Maximum number of products returned by [`CatalogClient::search_products`].
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// A collection together with its active products, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionPage {
    pub collection: Collection,
    pub products: Vec<Product>,
}

impl CatalogClient {
    /// Fetches an active product by slug with its variants attached.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no active product has this slug.
    /// - [`CatalogError::Normalization`] if the product row is malformed.
    /// - Any transport error from the underlying reads.
    pub async fn fetch_product_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        let query = self
            .scoped("products")
            .eq("slug", slug)
            .eq("status", "active");
        let row: ProductRow =
            self.get_optional_row(query, None)
                .await?
                .ok_or_else(|| CatalogError::NotFound {
                    resource: format!("product {slug}"),
                })?;

        let variants: Vec<VariantRow> = self
            .get_rows(
                &Query::table("product_variants").eq("product_id", row.id),
                None,
            )
            .await?;

        tracing::debug!(slug, variant_count = variants.len(), "fetched product");
        normalize_product(row, variants)
    }

    /// Fetches up to `limit` active products, newest first.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the underlying reads. Rows that fail
    /// normalization are skipped with a warning.
    pub async fn fetch_featured_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let query = self
            .scoped("products")
            .eq("status", "active")
            .order("created_at", false)
            .limit(limit);
        let rows: Vec<ProductRow> = self.get_rows(&query, None).await?;
        self.attach_variants(rows).await
    }

    /// Fetches every active collection, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the underlying read.
    pub async fn fetch_active_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let query = self
            .scoped("collections")
            .eq("status", "active")
            .order("name", true);
        let rows: Vec<CollectionRow> = self.get_rows(&query, None).await?;
        Ok(rows.into_iter().map(normalize_collection).collect())
    }

    /// Fetches an active collection by handle along with its products.
    ///
    /// A collection with no linked products yields an empty product list.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no active collection has this handle.
    /// - Any transport error from the underlying reads.
    pub async fn fetch_collection_page(&self, handle: &str) -> Result<CollectionPage, CatalogError> {
        let query = self
            .scoped("collections")
            .eq("handle", handle)
            .eq("status", "active");
        let row: CollectionRow =
            self.get_optional_row(query, None)
                .await?
                .ok_or_else(|| CatalogError::NotFound {
                    resource: format!("collection {handle}"),
                })?;

        let collection = normalize_collection(row);
        let products = self.fetch_collection_products(collection.id).await?;
        Ok(CollectionPage {
            collection,
            products,
        })
    }

    /// Fetches the active products linked to a collection, newest first.
    ///
    /// A failed link lookup is logged and treated as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the product and variant reads.
    pub async fn fetch_collection_products(
        &self,
        collection_id: Uuid,
    ) -> Result<Vec<Product>, CatalogError> {
        let links: Vec<CollectionProductRow> = match self
            .get_rows(
                &Query::table("collection_products")
                    .select("product_id")
                    .eq("collection_id", collection_id),
                None,
            )
            .await
        {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!(
                    %collection_id,
                    error = %e,
                    "collection link lookup failed; showing no products"
                );
                Vec::new()
            }
        };

        if links.is_empty() {
            tracing::debug!(%collection_id, "collection has no products");
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = links.into_iter().map(|l| l.product_id).collect();
        let query = self
            .scoped("products")
            .in_list("id", &ids)
            .eq("status", "active")
            .order("created_at", false);
        let rows: Vec<ProductRow> = self.get_rows(&query, None).await?;
        self.attach_variants(rows).await
    }

    /// Case-insensitive title search over active products.
    ///
    /// A blank query returns an empty list without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the underlying reads.
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let query = self
            .scoped("products")
            .ilike_contains("title", needle)
            .eq("status", "active")
            .limit(SEARCH_RESULT_LIMIT);
        let rows: Vec<ProductRow> = self.get_rows(&query, None).await?;
        tracing::debug!(query = needle, hits = rows.len(), "product search");
        self.attach_variants(rows).await
    }

    /// Loads variants for all `rows` in one request and normalizes each product.
    async fn attach_variants(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, CatalogError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let variant_rows: Vec<VariantRow> = self
            .get_rows(
                &Query::table("product_variants").in_list("product_id", &ids),
                None,
            )
            .await?;

        let mut by_product: HashMap<Uuid, Vec<VariantRow>> = HashMap::new();
        for variant in variant_rows {
            by_product.entry(variant.product_id).or_default().push(variant);
        }

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let variants = by_product.remove(&row.id).unwrap_or_default();
            match normalize_product(row, variants) {
                Ok(product) => products.push(product),
                Err(e) => tracing::warn!(error = %e, "skipping malformed product row"),
            }
        }
        Ok(products)
    }
}
