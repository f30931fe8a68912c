use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub llm: LlmConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key (the key itself
    /// never lives in the file)
    pub api_key_env: String,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Document-store API base URL; the in-memory store is used when absent
    pub base_url: Option<String>,
    pub collection: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Identity-provider session verification URL; anonymous mode when absent
    pub verify_url: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
