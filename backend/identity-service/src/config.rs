//! Configuration for identity components
//!
//! Loads settings from environment variables (a `.env` file is honoured by the
//! hosting binary in development):
//!
//! - `JWT_SECRET`: HMAC signing secret (required in release builds)
//! - `JWT_TTL_SECS`: access token lifetime in seconds (default 900)
//! - `SEED_USERS`: comma separated `username:password:role` triples

use anyhow::{anyhow, bail, Context, Result};
use crypto_core::JwtManager;
use std::env;
use std::fmt;
use tracing::warn;

const DEV_JWT_SECRET: &str = "secret";
const DEFAULT_TTL_SECS: i64 = 15 * 60;
const DEFAULT_SEED_USERS: &str = "admin1:secret:admin,user1:secret:user";

/// JWT authentication settings
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl_secs: i64,
}

impl JwtSettings {
    pub fn from_env() -> Result<Self> {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set - using development secret");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => bail!("JWT_SECRET must be set"),
        };

        let ttl_secs = env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .context("Invalid JWT_TTL_SECS")?;
        if ttl_secs <= 0 {
            bail!("JWT_TTL_SECS must be positive, got {ttl_secs}");
        }

        Ok(Self { secret, ttl_secs })
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_secs)
    }

    pub fn build_manager(&self) -> Result<JwtManager> {
        JwtManager::new(&self.secret, self.ttl()).context("Failed to initialize JWT manager")
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Identity registered at startup
#[derive(Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl SeedUser {
    pub fn from_env() -> Result<Vec<Self>> {
        let raw = env::var("SEED_USERS").unwrap_or_else(|_| DEFAULT_SEED_USERS.to_string());
        Self::parse_list(&raw).context("Invalid SEED_USERS")
    }

    /// Parse `username:password:role[,username:password:role...]`
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let parsed = entry.split_once(':').and_then(|(username, rest)| {
                    let (password, role) = rest.rsplit_once(':')?;
                    Some((username, password, role))
                });
                match parsed {
                    Some((username, password, role))
                        if !username.is_empty() && !role.is_empty() =>
                    {
                        Ok(SeedUser {
                            username: username.to_string(),
                            password: password.to_string(),
                            role: role.to_string(),
                        })
                    }
                    _ => Err(anyhow!(
                        "expected username:password:role, got {:?}",
                        entry.split(':').next().unwrap_or_default()
                    )),
                }
            })
            .collect()
    }
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_seed_users() {
        let users = SeedUser::parse_list("admin1:secret:admin, user1:pa:ss:user").unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "admin1");
        assert_eq!(users[0].role, "admin");
        // role is the last field; the password keeps everything in between
        assert_eq!(users[1].password, "pa:ss");
        assert_eq!(users[1].role, "user");
    }

    #[test]
    fn test_parse_seed_users_rejects_incomplete_entry() {
        assert!(SeedUser::parse_list("admin1:secret").is_err());
        assert!(SeedUser::parse_list(":secret:admin").is_err());
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(SeedUser::parse_list("").unwrap().is_empty());
    }

    #[test]
    #[serial]
    fn test_jwt_settings_from_env() {
        env::set_var("JWT_SECRET", "from-env");
        env::set_var("JWT_TTL_SECS", "60");

        let settings = JwtSettings::from_env().unwrap();
        assert_eq!(settings.secret, "from-env");
        assert_eq!(settings.ttl(), chrono::Duration::seconds(60));
        assert!(!format!("{:?}", settings).contains("from-env"));

        env::remove_var("JWT_SECRET");
        env::remove_var("JWT_TTL_SECS");
    }

    #[test]
    #[serial]
    fn test_jwt_settings_rejects_non_positive_ttl() {
        env::set_var("JWT_TTL_SECS", "0");
        assert!(JwtSettings::from_env().is_err());
        env::remove_var("JWT_TTL_SECS");
    }
}
