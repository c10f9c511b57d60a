//! Listing, review and newsletter command handlers.

use storefront_catalog::{CatalogClient, Session};
use storefront_core::{Product, Review, ReviewDraft, ReviewSummary, SubscribeOutcome};
use uuid::Uuid;

use crate::product::product_summary_line;

fn print_products(products: &[Product], currency: &str) {
    if products.is_empty() {
        println!("  (no products)");
        return;
    }
    for product in products {
        println!("  {}", product_summary_line(product, currency));
    }
}

pub(crate) async fn run_collection(
    client: &CatalogClient,
    currency: &str,
    handle: &str,
) -> anyhow::Result<()> {
    let page = client.fetch_collection_page(handle).await?;
    println!("{} ({})", page.collection.name, page.collection.handle);
    if let Some(description) = &page.collection.description {
        println!("  {description}");
    }
    print_products(&page.products, currency);
    Ok(())
}

pub(crate) async fn run_collections(client: &CatalogClient) -> anyhow::Result<()> {
    let collections = client.fetch_active_collections().await?;
    if collections.is_empty() {
        println!("no active collections");
    }
    for collection in &collections {
        println!("{}  {}  {}", collection.id, collection.handle, collection.name);
    }
    Ok(())
}

/// Prints the home grid: one collection's products when `collection_id` is
/// given, otherwise the newest active products.
pub(crate) async fn run_home(
    client: &CatalogClient,
    currency: &str,
    collection_id: Option<Uuid>,
    limit: usize,
) -> anyhow::Result<()> {
    let products = match collection_id {
        Some(id) => {
            let mut products = client.fetch_collection_products(id).await?;
            products.truncate(limit);
            products
        }
        None => client.fetch_featured_products(limit).await?,
    };
    print_products(&products, currency);
    Ok(())
}

pub(crate) async fn run_search(
    client: &CatalogClient,
    currency: &str,
    query: &str,
) -> anyhow::Result<()> {
    let results = client.search_products(query).await?;
    if results.is_empty() {
        println!("no products match '{}'", query.trim());
        return Ok(());
    }
    print_products(&results, currency);
    Ok(())
}

pub(crate) fn render_reviews(reviews: &[Review]) -> String {
    let summary = ReviewSummary::from_reviews(reviews);
    let mut lines = vec![format!(
        "{:.1} / 5 ({}) {}",
        summary.average_rating,
        summary.count_label(),
        stars(summary.rounded_stars())
    )];
    for review in reviews {
        lines.push(format!(
            "  {} {} by {} on {}",
            stars(review.rating),
            review.title,
            review.author_label().unwrap_or_else(|| "anonymous".to_owned()),
            review.created_at.format("%Y-%m-%d")
        ));
        lines.push(format!("    {}", review.comment));
    }
    lines.join("\n")
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub(crate) async fn run_reviews(client: &CatalogClient, product_id: Uuid) -> anyhow::Result<()> {
    let reviews = client.fetch_reviews(product_id).await?;
    println!("{}", render_reviews(&reviews));
    Ok(())
}

pub(crate) async fn run_submit_review(
    client: &CatalogClient,
    session: &Session,
    product_id: Uuid,
    draft: &ReviewDraft,
) -> anyhow::Result<()> {
    client.submit_review(session, product_id, draft).await?;
    println!("review submitted");
    Ok(())
}

pub(crate) async fn run_subscribe(client: &CatalogClient, email: &str) -> anyhow::Result<()> {
    match client.subscribe_newsletter(email).await? {
        SubscribeOutcome::Subscribed => println!("subscribed"),
        SubscribeOutcome::AlreadySubscribed => println!("already subscribed"),
    }
    Ok(())
}
