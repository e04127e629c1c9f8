use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Issuer embedded in every signed token.
    pub app_name: String,
    /// Symmetric signing key. Must be non-empty.
    pub app_secret: String,
    pub token_ttl_hours: u64,
    pub refresh_token_ttl_hours: u64,
    pub bind_addr: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/authgate".to_string());

        let app_secret = env::var("APP_SECRET").unwrap_or_default();
        if app_secret.is_empty() {
            return Err(anyhow!("APP_SECRET must be set to a non-empty signing key"));
        }

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "authgate".to_string());

        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .unwrap_or(3);

        let refresh_token_ttl_hours = env::var("REFRESH_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "72".to_string())
            .parse()
            .unwrap_or(72);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Config {
            database_url,
            app_name,
            app_secret,
            token_ttl_hours,
            refresh_token_ttl_hours,
            bind_addr,
        })
    }
}
