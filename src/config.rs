//! Configuration module for Easel
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for all
//! application components.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration structure for Easel
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Server configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub server: ServerConfig,

    /// Room configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub rooms: RoomConfig,

    /// Transform configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub transforms: TransformConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    /// Host to bind to
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Request timeout in seconds
    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[envconfig(from = "SHUTDOWN_TIMEOUT_SECS", default = "30")]
    pub shutdown_timeout_secs: u64,

    /// Origin allowed to call the API from a browser
    #[envconfig(from = "FRONTEND_ORIGIN", default = "http://127.0.0.1:8001")]
    pub frontend_origin: String,
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Room configuration
///
/// The set of valid room tokens is fixed for the process lifetime; requests
/// naming any other room are rejected before touching the event store.
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct RoomConfig {
    /// Comma-separated list of valid room tokens
    #[envconfig(from = "ROOMS", default = "room_default")]
    pub tokens: String,
}

impl RoomConfig {
    /// Get the valid room tokens as a set
    pub fn token_set(&self) -> HashSet<String> {
        self.tokens
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Check whether a room token is in the configured valid set
    pub fn is_valid(&self, token: &str) -> bool {
        self.token_set().contains(token)
    }
}

/// Transform configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct TransformConfig {
    /// Comma-separated list of enabled transform names
    #[envconfig(from = "FILTERS", default = "blur,invert,edge_detect,emboss")]
    pub enabled: String,

    /// Execution budget for a single transform run, in milliseconds
    #[envconfig(from = "FILTER_TIMEOUT_MS", default = "5000")]
    pub timeout_ms: u64,
}

impl TransformConfig {
    /// Get the enabled transform names, in declaration order, deduplicated
    pub fn enabled_list(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.enabled
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .filter(|n| seen.insert(n.to_string()))
            .map(String::from)
            .collect()
    }

    /// Get the per-apply execution budget as Duration
    pub fn apply_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config::init_from_env()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.host.is_empty() {
            return Err(Error::config("Server host cannot be empty"));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(Error::config("Request timeout must be at least 1 second"));
        }

        // Validate room config
        if self.rooms.token_set().is_empty() {
            return Err(Error::config("At least one room token must be configured"));
        }

        // Validate transform config
        if self.transforms.timeout_ms == 0 {
            return Err(Error::config("Filter timeout must be at least 1 ms"));
        }

        if self.server.frontend_origin.is_empty() {
            return Err(Error::config("Frontend origin cannot be empty"));
        }

        Ok(())
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            frontend_origin = %self.server.frontend_origin,
            "Server configuration"
        );

        tracing::info!(
            rooms = %self.rooms.tokens,
            room_count = self.rooms.token_set().len(),
            "Room configuration"
        );

        tracing::info!(
            enabled = %self.transforms.enabled,
            timeout_ms = self.transforms.timeout_ms,
            "Transform configuration"
        );
    }
}
