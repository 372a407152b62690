// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Environment-based configuration management for production deployment

use crate::constants::defaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Connection settings for the hosted backend platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend (auth, rest, and functions live under it)
    pub base_url: Url,
    /// Publishable API key sent as the `apikey` header; carries no privileges
    /// by itself, row-level security applies per session token
    pub publishable_key: String,
    /// Request timeout for backend calls, in seconds
    pub timeout_secs: u64,
    /// Connect timeout for backend calls, in seconds
    pub connect_timeout_secs: u64,
}

/// CORS configuration for the dashboard's HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or "*" for any
    pub allowed_origins: String,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port the dashboard listens on
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Hosted backend connection settings
    pub backend: BackendConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when `STUDIO_BACKEND_URL` is absent or not a valid URL, when
    /// `STUDIO_BACKEND_KEY` is absent, or when numeric variables do not
    /// parse.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("invalid HTTP_PORT: {port}"))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        let base_url = env::var("STUDIO_BACKEND_URL")
            .context("STUDIO_BACKEND_URL is required (base URL of the hosted backend)")?;
        // A trailing slash makes Url::join keep the base path intact.
        let base_url = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("STUDIO_BACKEND_URL is not a valid URL: {base_url}"))?;

        let publishable_key = env::var("STUDIO_BACKEND_KEY")
            .context("STUDIO_BACKEND_KEY is required (publishable API key)")?;

        let timeout_secs = parse_secs("STUDIO_BACKEND_TIMEOUT_SECS", defaults::BACKEND_TIMEOUT_SECS)?;
        let connect_timeout_secs = parse_secs(
            "STUDIO_BACKEND_CONNECT_TIMEOUT_SECS",
            defaults::BACKEND_CONNECT_TIMEOUT_SECS,
        )?;

        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into());

        Ok(Self {
            http_port,
            environment,
            backend: BackendConfig {
                base_url,
                publishable_key,
                timeout_secs,
                connect_timeout_secs,
            },
            cors: CorsConfig { allowed_origins },
        })
    }

    /// One-line configuration summary for startup logging; never includes
    /// the API key
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} backend={} cors_origins={}",
            self.environment, self.http_port, self.backend.base_url, self.cors.allowed_origins
        )
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64> {
    match env::var(var) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("invalid {var}: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn config_round_trips_through_serde() {
        let config = ServerConfig {
            http_port: 8780,
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: Url::parse("https://backend.studio.example/").unwrap(),
                publishable_key: "pk-test".into(),
                timeout_secs: 30,
                connect_timeout_secs: 10,
            },
            cors: CorsConfig {
                allowed_origins: "*".into(),
            },
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["backend"]["base_url"], "https://backend.studio.example/");

        let back: ServerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.backend.base_url, config.backend.base_url);
        assert_eq!(back.http_port, config.http_port);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(Environment::from_str_or_default("TEST"), Environment::Testing);
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }
}
