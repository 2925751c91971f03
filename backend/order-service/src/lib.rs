/// Order Service Library
///
/// Product catalogue and order management over gRPC, gated by the RBAC
/// layer from `grpc-rbac` and fronted by `identity-service` logins.
///
/// ## Modules
///
/// - `app`: Component wiring and server startup
/// - `batch`: Shipment consolidation state machine
/// - `config`: Environment settings
/// - `error`: Error types
/// - `grpc`: ProductInfo and OrderManagement servers, default access table
/// - `store`: In-memory product and order collections
pub mod app;
pub mod batch;
pub mod config;
pub mod error;
pub mod grpc;
pub mod store;

// Re-export commonly used types
pub use app::App;
pub use config::Settings;
pub use error::{OrderError, Result};
pub use grpc::{ecommerce, OrderServiceServer};
