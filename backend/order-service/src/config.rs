//! Configuration management for Order Service
//!
//! Loads settings from environment variables, with a `.env` file honoured in
//! development builds.

use anyhow::{bail, Context, Result};
use identity_service::config::{JwtSettings, SeedUser};
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Upper bound for both order tuning knobs
pub const MAX_ORDER_SETTING: usize = 4096;

const DEFAULT_LOG_FILTER: &str = "order_service=info,info";

/// Load `.env` in development builds
///
/// Must run before the tracing subscriber reads `RUST_LOG`. Returns the file
/// that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    if cfg!(debug_assertions) {
        dotenvy::dotenv().ok()
    } else {
        None
    }
}

/// `RUST_LOG`, or the service default
pub fn log_filter() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub orders: OrderSettings,
    pub seed_users: Vec<SeedUser>,
}

impl Settings {
    /// Read settings from the process environment; call [`load_dotenv`] first
    pub fn load() -> Result<Self> {
        Ok(Settings {
            server: ServerSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            orders: OrderSettings::from_env()?,
            seed_users: SeedUser::from_env()?,
        })
    }
}

/// gRPC listener settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "50051".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid server address")
    }
}

/// Order handler tuning
#[derive(Debug, Clone, Copy)]
pub struct OrderSettings {
    /// Shipments per `ProcessOrders` flush
    pub batch_size: NonZeroUsize,
    /// Capacity of the `SearchOrders` outbound channel
    pub search_buffer: usize,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
            search_buffer: 4,
        }
    }
}

impl OrderSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let batch_size: usize = env::var("ORDER_BATCH_SIZE")
            .unwrap_or_else(|_| defaults.batch_size.to_string())
            .parse()
            .context("Invalid ORDER_BATCH_SIZE")?;
        let Some(batch_size) = NonZeroUsize::new(batch_size) else {
            bail!("ORDER_BATCH_SIZE must be at least 1");
        };
        if batch_size.get() > MAX_ORDER_SETTING {
            bail!("ORDER_BATCH_SIZE must be at most {MAX_ORDER_SETTING}, got {batch_size}");
        }

        let search_buffer: usize = env::var("SEARCH_STREAM_BUFFER")
            .unwrap_or_else(|_| defaults.search_buffer.to_string())
            .parse()
            .context("Invalid SEARCH_STREAM_BUFFER")?;
        if search_buffer == 0 {
            bail!("SEARCH_STREAM_BUFFER must be at least 1");
        }
        if search_buffer > MAX_ORDER_SETTING {
            bail!("SEARCH_STREAM_BUFFER must be at most {MAX_ORDER_SETTING}, got {search_buffer}");
        }

        Ok(Self {
            batch_size,
            search_buffer,
        })
    }
}
