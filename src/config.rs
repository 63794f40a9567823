use std::env;

use crate::payments::VnpayConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub vnpay: VnpayConfig,
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Payment-gateway credentials and the JWT secret have no defaults: a
    /// missing value aborts startup rather than surfacing per-request.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("STOREFRONT_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "storefront.db".to_string()),
            jwt_secret: require_env("JWT_SECRET"),
            vnpay: VnpayConfig {
                tmn_code: require_env("VNP_TMN_CODE"),
                hash_secret: require_env("VNP_HASH_SECRET"),
                base_url: require_env("VNP_URL"),
                return_url: require_env("VNP_RETURN_URL"),
            },
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn require_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{} must be set", name))
}
