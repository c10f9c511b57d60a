use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Root URL of the backend's REST interface, e.g. `"https://xyz.supabase.co/rest/v1"`.
    pub backend_url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    /// Every catalog row is scoped to this store.
    pub store_id: Uuid,
    pub env: Environment,
    pub log_level: String,
    /// ISO 4217 code used when formatting prices.
    pub currency_code: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("anon_key", &"[redacted]")
            .field("store_id", &self.store_id)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("currency_code", &self.currency_code)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
