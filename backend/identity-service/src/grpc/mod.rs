/// gRPC server module for identity-service
///
/// Exports:
/// - IdentityServiceServer: AuthService implementation
/// - ecommerce: Generated protobuf types from auth_service.proto
pub mod server;

pub use server::ecommerce;
pub use server::IdentityServiceServer;
