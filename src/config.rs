use serde::Deserialize;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub listen_host: String,
    pub listen_port: u16,
    pub db: DbConfig,
}

impl AppConfig {
    /// Every knob has a development default; a bare `cargo run` against a
    /// local PostgreSQL works without any environment set up.
    pub fn from_env() -> Self {
        let db = DbConfig {
            host: env_or("DB_HOST", "localhost"),
            port: env_parse_or("DB_PORT", 5432),
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASSWORD", ""),
            database: env_or("DB_NAME", "legendidle"),
            pool_size: env_parse_or("DB_POOL_SIZE", 10),
        };
        Self {
            listen_host: env_or("APP_HOST", "0.0.0.0"),
            listen_port: env_parse_or("APP_PORT", 3000),
            db,
        }
    }
}
