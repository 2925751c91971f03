/// JWT issuance and validation for order platform services
///
/// Tokens are HS256-signed with a shared secret and carry the caller's
/// username and role. A [`JwtManager`] owns the key material and the token
/// time-to-live; it holds no other state, so verification needs no locking.
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use crypto_core::jwt::JwtManager;
///
/// let manager = JwtManager::new("secret", Duration::minutes(15)).unwrap();
/// let token = manager.generate("admin1", "admin").unwrap();
/// let claims = manager.verify(&token).unwrap();
/// assert_eq!(claims.role, "admin");
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The only accepted signing algorithm. Tokens signed with anything else are rejected.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in every access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role stored for the user at issuance time
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token expired")]
    Expired,

    #[error("Unexpected token signing method")]
    UnsupportedAlgorithm,

    #[error("Token validation failed: {0}")]
    Invalid(String),
}

impl JwtError {
    /// Whether this error means the presented token must be refused,
    /// as opposed to a server-side signing/key problem.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            JwtError::Expired | JwtError::UnsupportedAlgorithm | JwtError::Invalid(_)
        )
    }
}

/// Issues and verifies time-bounded identity tokens
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtManager {
    /// Create a manager signing with `secret`; tokens expire `ttl` after issuance.
    ///
    /// ## Errors
    ///
    /// Returns `JwtError::InvalidKey` if the secret is empty.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("JWT secret must not be empty".to_string()));
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a signed token for `username` carrying `role`
    ///
    /// ## Errors
    ///
    /// Returns `JwtError::Signing` if encoding fails.
    pub fn generate(&self, username: &str, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Validate signature, algorithm and expiry, returning the decoded claims
    ///
    /// ## Errors
    ///
    /// - `JwtError::Expired` if `exp` is in the past
    /// - `JwtError::UnsupportedAlgorithm` if the header names anything but HS256
    /// - `JwtError::Invalid` for malformed tokens and signature mismatches
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidAlgorithm => JwtError::UnsupportedAlgorithm,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager")
            .field("algorithm", &JWT_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
