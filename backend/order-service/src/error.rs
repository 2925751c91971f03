use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl OrderError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            OrderError::ProductNotFound(id) => {
                Status::new(Code::NotFound, format!("product does not exist: {}", id))
            }
            OrderError::OrderNotFound(id) => {
                Status::new(Code::NotFound, format!("order does not exist: {}", id))
            }
            OrderError::InvalidArgument(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            OrderError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                // Don't leak internal details
                Status::new(Code::Internal, "internal error")
            }
        }
    }
}

impl From<OrderError> for Status {
    fn from(err: OrderError) -> Self {
        err.to_status()
    }
}
