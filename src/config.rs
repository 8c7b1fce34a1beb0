use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Page size used by catalog listings when the request has no `limit`.
    pub page_size: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let page_size = env::var("CATALOG_PAGE_SIZE")
            .ok()
            .and_then(|p| p.parse::<u64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(12);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            page_size,
        })
    }
}
