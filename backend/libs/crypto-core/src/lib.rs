//! Shared cryptographic primitives for the order platform.
//!
//! - `jwt`: HS256 access token issuance and verification

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtManager};
