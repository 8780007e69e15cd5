use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Deployment environment, e.g. "development" or "production"
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        AppConfig { host, port, environment }
    }

    /// Raw internal error text goes into response bodies only outside production.
    pub fn expose_error_details(&self) -> bool {
        self.environment != "production"
    }
}
