//! Role-based access control for gRPC services
//!
//! ## Core Components
//!
//! - **AccessPolicy**: static table of fully-qualified method → allowed roles
//! - **RbacInterceptor**: token extraction, verification and role check for one call
//! - **RbacLayer**: tower layer applying the interceptor to every call on a router,
//!   unary and streaming alike (checked once when the call is opened)
//! - **AuthClaimsExt**: handler-side access to the verified claims
//! - **JwtClientInterceptor**: attaches the bearer token to outgoing calls
//! - **ObservedStream**: message-observing stream decorator
//!
//! ## Server Side
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::Duration;
//! use crypto_core::JwtManager;
//! use grpc_rbac::{AccessPolicy, RbacInterceptor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let jwt = Arc::new(JwtManager::new("secret", Duration::minutes(15))?);
//! let policy = AccessPolicy::new()
//!     .allow("/ecommerce.OrderManagement/GetOrder", ["admin", "user"]);
//! let rbac = RbacInterceptor::new(jwt, policy);
//!
//! // tonic::transport::Server::builder().layer(rbac.layer()).add_service(...)
//! # Ok(())
//! # }
//! ```
//!
//! Methods missing from the policy are public: no token is required and any
//! token presented is ignored.

mod client;
mod extensions;
mod policy;
mod server;
mod stream;

pub use client::JwtClientInterceptor;
pub use extensions::AuthClaimsExt;
pub use policy::AccessPolicy;
pub use server::{Decision, RbacInterceptor, RbacLayer, RbacService};
pub use stream::{Direction, ObservedStream};

pub use crypto_core::Claims;
pub use tonic::Status;
