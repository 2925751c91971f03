use crate::error::{IdentityError, Result};
use crate::security::{hash_password, verify_password};
use std::fmt;
use tracing::warn;

/// Identity record: username, password verifier and role
///
/// Owned by a [`crate::store::CredentialStore`]; stores hand out clones only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl Credential {
    /// Build a credential, hashing `password`
    ///
    /// ## Errors
    ///
    /// - `IdentityError::InvalidUsername` if the username is blank
    /// - `IdentityError::InvalidRole` if the role is blank
    pub fn new(username: &str, password: &str, role: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(IdentityError::InvalidUsername(
                "username must not be empty".to_string(),
            ));
        }
        let role = role.trim();
        if role.is_empty() {
            return Err(IdentityError::InvalidRole("role must not be empty".to_string()));
        }

        Ok(Self {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: role.to_string(),
        })
    }

    /// Check `password` against the stored verifier; an unusable hash counts as a mismatch
    pub fn is_correct_password(&self, password: &str) -> bool {
        match verify_password(password, &self.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(username = %self.username, error = %e, "Stored password hash unusable");
                false
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
