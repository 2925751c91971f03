/// gRPC server implementation for identity-service
///
/// Implements AuthService from auth_service.proto:
/// - Login: username/password → access token
use crate::services::LoginService;
use tonic::{Request, Response, Status};
use tracing::info;

// Import generated protobuf types
pub mod ecommerce {
    pub mod auth {
        tonic::include_proto!("ecommerce.auth");
    }
}

use ecommerce::auth::auth_service_server::{AuthService, AuthServiceServer};
use ecommerce::auth::{LoginRequest, LoginResponse};

/// Identity service gRPC server
#[derive(Clone)]
pub struct IdentityServiceServer {
    login: LoginService,
}

impl IdentityServiceServer {
    pub fn new(login: LoginService) -> Self {
        Self { login }
    }

    pub fn into_service(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl AuthService for IdentityServiceServer {
    /// Verify username/password and return an access token
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        info!(username = %req.username, "Login request");

        let access_token = self.login.login(&req.username, &req.password).await?;

        Ok(Response::new(LoginResponse { access_token }))
    }
}
