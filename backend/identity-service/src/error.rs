use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            // Missing user and wrong password share one message
            IdentityError::InvalidCredentials => {
                Status::new(Code::Unauthenticated, "incorrect username/password")
            }
            IdentityError::UsernameAlreadyExists(_) => {
                Status::new(Code::AlreadyExists, "Username already exists")
            }
            IdentityError::InvalidUsername(msg) => {
                Status::new(Code::InvalidArgument, format!("Invalid username: {}", msg))
            }
            IdentityError::InvalidRole(msg) => {
                Status::new(Code::InvalidArgument, format!("Invalid role: {}", msg))
            }
            IdentityError::JwtError(_) | IdentityError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "cannot generate access token")
            }
        }
    }
}

impl From<crypto_core::JwtError> for IdentityError {
    fn from(err: crypto_core::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        IdentityError::JwtError(err.to_string())
    }
}

// gRPC Status conversion
impl From<IdentityError> for Status {
    fn from(err: IdentityError) -> Self {
        err.to_status()
    }
}
