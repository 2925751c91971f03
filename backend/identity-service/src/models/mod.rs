/// Data models for identity-service
pub mod credential;

pub use credential::Credential;
