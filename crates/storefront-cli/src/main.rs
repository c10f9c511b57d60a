mod browse;
mod product;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Browse a store's catalog from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a product page: price, stock, option availability and cart decision.
    Product {
        slug: String,
        /// Option choice as `Name=Value`; repeat for each option.
        #[arg(long = "select", value_name = "NAME=VALUE", value_parser = parse_option_choice)]
        selections: Vec<(String, String)>,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
        /// Print the product view as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show a collection and its products.
    Collection { handle: String },
    /// List active collections.
    Collections,
    /// Show the home page product grid.
    Home {
        /// Show this collection's products instead of the newest products.
        #[arg(long)]
        collection: Option<Uuid>,
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
    /// Search active products by title.
    Search { query: String },
    /// List a product's reviews.
    Reviews { product_id: Uuid },
    /// Submit a review as the signed-in shopper.
    Review {
        #[arg(long)]
        product_id: Uuid,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        title: String,
        #[arg(long)]
        comment: String,
        #[arg(long, env = "STOREFRONT_USER_ID")]
        user_id: Uuid,
        #[arg(long, env = "STOREFRONT_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
    /// Subscribe an e-mail address to the newsletter.
    Subscribe { email: String },
}

/// Parses `Name=Value` into an option choice. Both sides are trimmed; the
/// value may itself contain `=`.
fn parse_option_choice(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected NAME=VALUE, got '{raw}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Picks the tracing filter directive: `STOREFRONT_LOG_LEVEL` first, then
/// `RUST_LOG`, then `default`. Blank values count as unset.
fn log_directive<'a>(
    storefront_level: Option<&'a str>,
    rust_log: Option<&'a str>,
    default: &'a str,
) -> &'a str {
    [storefront_level, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = storefront_core::load_app_config_from_env()?;
    let storefront_level = std::env::var("STOREFRONT_LOG_LEVEL").ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = EnvFilter::try_new(log_directive(
        storefront_level.as_deref(),
        rust_log.as_deref(),
        &config.log_level,
    ))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, store_id = %config.store_id, "storefront configured");
    let client = storefront_catalog::CatalogClient::new(&config)?;
    let currency = config.currency_code.as_str();

    match cli.command {
        Commands::Product {
            slug,
            selections,
            quantity,
            json,
        } => product::run_product(&client, currency, &slug, &selections, quantity, json).await?,
        Commands::Collection { handle } => {
            browse::run_collection(&client, currency, &handle).await?;
        }
        Commands::Collections => browse::run_collections(&client).await?,
        Commands::Home { collection, limit } => {
            browse::run_home(&client, currency, collection, limit).await?;
        }
        Commands::Search { query } => browse::run_search(&client, currency, &query).await?,
        Commands::Reviews { product_id } => browse::run_reviews(&client, product_id).await?,
        Commands::Review {
            product_id,
            rating,
            title,
            comment,
            user_id,
            access_token,
        } => {
            let session = storefront_catalog::Session {
                user_id,
                access_token,
            };
            let draft = storefront_core::ReviewDraft {
                rating,
                title,
                comment,
            };
            browse::run_submit_review(&client, &session, product_id, &draft).await?;
        }
        Commands::Subscribe { email } => browse::run_subscribe(&client, &email).await?,
    }

    Ok(())
}
