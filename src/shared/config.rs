use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub server_host: String,
    pub server_port: u16,
    pub rust_log: String,
    pub app_env: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub chain_gateway_url: String,
    pub chain_api_key: String,
    pub chain_network: String,
}

impl Config {
    pub fn init() -> Self {
        dotenv().ok();

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // The database is only reachable outside dev; dev runs on the
        // in-memory repositories.
        let database_url = if app_env == "dev" {
            env::var("DATABASE_URL").unwrap_or_else(|_| "".to_string())
        } else {
            env::var("DATABASE_URL").expect("DATABASE_URL must be set")
        };

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("SERVER_PORT must be a valid number");
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let jwt_secret = if app_env == "dev" {
            env::var("JWT_SECRET").unwrap_or_else(|_| "dev-only-secret".to_string())
        } else {
            env::var("JWT_SECRET").expect("JWT_SECRET must be set")
        };
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .expect("JWT_TTL_HOURS must be a valid number");

        // Chain gateway config; the mock adapter is used in dev so these
        // may stay empty there.
        let chain_gateway_url = env::var("CHAIN_GATEWAY_URL").unwrap_or_else(|_| "".to_string());
        let chain_api_key = env::var("CHAIN_API_KEY").unwrap_or_else(|_| "".to_string());
        let chain_network = env::var("CHAIN_NETWORK").unwrap_or_else(|_| "testnet".to_string());

        Self {
            database_url,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "100".to_string())
                .parse::<u32>()
                .expect("DATABASE_MAX_CONNECTIONS must be a valid number"),
            database_min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u32>()
                .expect("DATABASE_MIN_CONNECTIONS must be a valid number"),
            database_connect_timeout: env::var("DATABASE_CONNECT_TIMEOUT")
                .unwrap_or_else(|_| "8".to_string())
                .parse::<u64>()
                .expect("DATABASE_CONNECT_TIMEOUT must be a valid number"),
            database_idle_timeout: env::var("DATABASE_IDLE_TIMEOUT")
                .unwrap_or_else(|_| "8".to_string())
                .parse::<u64>()
                .expect("DATABASE_IDLE_TIMEOUT must be a valid number"),
            server_host,
            server_port,
            rust_log,
            app_env,
            jwt_secret,
            jwt_ttl_hours,
            chain_gateway_url,
            chain_api_key,
            chain_network,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "".to_string(),
            database_max_connections: 100,
            database_min_connections: 5,
            database_connect_timeout: 8,
            database_idle_timeout: 8,
            server_host: "localhost".to_string(),
            server_port: 3000,
            rust_log: "info".to_string(),
            app_env: "test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 24,
            chain_gateway_url: "".to_string(),
            chain_api_key: "".to_string(),
            chain_network: "testnet".to_string(),
        }
    }
}
