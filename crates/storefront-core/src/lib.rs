pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod money;
pub mod newsletter;
pub mod resolver;
pub mod reviews;
pub mod selection;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    cart_badge_label, clamp_quantity, AddToCartRequest, Cart, CartItem, CartLine, CartSink,
};
pub use catalog::{Collection, Product, ProductOption, ProductStatus, Variant};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::format_money;
pub use newsletter::{validate_email, NewsletterError, SubscribeOutcome};
pub use resolver::{compute_display_state, resolve_matching_variant, DisplayState, VariantResolver};
pub use reviews::{Review, ReviewCustomer, ReviewDraft, ReviewError, ReviewSummary};
pub use selection::Selection;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
