/// Security primitives for identity-service
///
/// - **password**: Argon2id password hashing and verification
///
/// Token issuance and validation live in `crypto_core::jwt`.
pub mod password;

pub use crypto_core::jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
