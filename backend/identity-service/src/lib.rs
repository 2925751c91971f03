/// Identity Service Library
///
/// Provides credential storage, password verification and access token
/// issuance for the order platform.
///
/// ## Modules
///
/// - `config`: JWT and seed-user settings
/// - `error`: Error types
/// - `grpc`: AuthService gRPC server
/// - `models`: Credential model
/// - `security`: Password hashing and verification
/// - `services`: Login business logic
/// - `store`: Credential store abstraction and in-memory implementation
pub mod config;
pub mod error;
pub mod grpc;
pub mod models;
pub mod security;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use grpc::IdentityServiceServer;
pub use models::Credential;
pub use services::LoginService;
pub use store::{CredentialStore, InMemoryCredentialStore};
