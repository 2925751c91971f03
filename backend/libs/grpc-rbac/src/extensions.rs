//! Request extension trait for reading verified claims in handlers

use crypto_core::Claims;
use tonic::Request;

/// Access to the claims the RBAC layer attached to an authorized call
///
/// Public methods carry no claims.
pub trait AuthClaimsExt {
    fn auth_claims(&self) -> Option<&Claims>;

    /// Username of the caller, or `"anonymous"` for public calls
    fn caller(&self) -> &str {
        self.auth_claims()
            .map(|claims| claims.sub.as_str())
            .unwrap_or("anonymous")
    }
}

impl<T> AuthClaimsExt for Request<T> {
    fn auth_claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }
}
