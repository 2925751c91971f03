/// Login: credential check followed by token issuance
use crate::error::{IdentityError, Result};
use crate::models::Credential;
use crate::security::{hash_password, verify_password};
use crate::store::CredentialStore;
use crypto_core::JwtManager;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-for-unknown-users";

/// Verifier checked when the username is unknown, so both failure paths pay
/// for one Argon2 verification.
fn placeholder_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| match hash_password(PLACEHOLDER_PASSWORD) {
        Ok(hash) => Some(hash),
        Err(e) => {
            warn!(error = %e, "Failed to prepare placeholder password hash");
            None
        }
    })
    .as_deref()
}

#[derive(Clone)]
pub struct LoginService {
    store: Arc<dyn CredentialStore>,
    jwt: Arc<JwtManager>,
}

impl LoginService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: Arc<JwtManager>) -> Self {
        // hashed up front so the first unknown-user login costs the same as later ones
        placeholder_hash();
        Self { store, jwt }
    }

    /// Register a new identity
    ///
    /// ## Errors
    ///
    /// - `IdentityError::UsernameAlreadyExists` if the username is taken
    /// - `IdentityError::InvalidUsername` / `InvalidRole` for blank fields
    pub async fn register(&self, username: &str, password: &str, role: &str) -> Result<()> {
        let credential = Credential::new(username, password, role)?;
        self.store.save(&credential).await?;
        info!(username = %credential.username, role = %credential.role, "User registered");
        Ok(())
    }

    /// Verify `username`/`password` and issue an access token
    ///
    /// Unknown users and wrong passwords both yield
    /// `IdentityError::InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let credential = match self.store.find(username).await? {
            Some(credential) if credential.is_correct_password(password) => credential,
            Some(_) => {
                warn!(username, "Login failed");
                return Err(IdentityError::InvalidCredentials);
            }
            None => {
                if let Some(hash) = placeholder_hash() {
                    // result ignored: the user does not exist either way
                    let _ = verify_password(password, hash);
                }
                warn!(username, "Login failed");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        let token = self.jwt.generate(&credential.username, &credential.role)?;
        info!(username = %credential.username, role = %credential.role, "Access token issued");
        Ok(token)
    }
}
