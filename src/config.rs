use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};
use crate::llm::DEFAULT_MODEL;

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub openrouter_api_key: String,
    pub model: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Load OpenRouter API key
        let openrouter_api_key = env::var("OPENROUTER_API_KEY")?;

        // Model can be overridden per deployment
        let model = env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let server_addr = parse_server_addr(&host, &port)?;

        Ok(Config {
            server_addr,
            openrouter_api_key,
            model,
        })
    }
}

fn parse_server_addr(host: &str, port: &str) -> Result<SocketAddr> {
    let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
    let ip = IpAddr::from_str(host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let addr = parse_server_addr("0.0.0.0", "8080").unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(parse_server_addr("127.0.0.1", "not-a-port").is_err());
    }

    #[test]
    fn rejects_bad_host() {
        assert!(parse_server_addr("localhost", "3000").is_err());
    }
}
