use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string. Without it the relay keeps settings
    /// and image metadata in process memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Upper bound of the PostgreSQL pool
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    /// AES-256-GCM key for the stored provider API key (base64-encoded, 32 bytes)
    pub encryption_key: String,

    /// HS256 secret shared with the host editor for session tokens
    pub session_secret: String,

    /// Prefix the REST routes are mounted under
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Chat-completion endpoint of the vision provider
    #[serde(default = "default_openai_endpoint")]
    pub openai_endpoint: String,

    /// Timeout for the outbound provider call, in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Seeds the settings store when no key has been saved yet
    #[serde(default)]
    pub agent_photo_api_key: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_api_root() -> String {
    "/wp-json".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
