//! Service wiring shared by the binary and the integration tests
//!
//! Builds the credential store, token manager and handlers from [`Settings`]
//! and mounts them behind the RBAC layer on a single tonic router.

use crate::config::Settings;
use crate::grpc::{default_access_policy, OrderServiceServer};
use anyhow::{Context, Result};
use grpc_rbac::{AccessPolicy, RbacInterceptor, RbacLayer};
use identity_service::{IdentityServiceServer, InMemoryCredentialStore, LoginService};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tower::layer::util::{Identity, Stack};
use tracing::info;

pub struct App {
    rbac: RbacInterceptor,
    identity: IdentityServiceServer,
    orders: OrderServiceServer,
}

impl App {
    /// Wire every component with the default access table
    pub async fn build(settings: &Settings) -> Result<Self> {
        Self::build_with_policy(settings, default_access_policy()).await
    }

    pub async fn build_with_policy(settings: &Settings, policy: AccessPolicy) -> Result<Self> {
        let jwt = Arc::new(settings.jwt.build_manager()?);
        info!(ttl_secs = settings.jwt.ttl_secs, "Token manager initialized");

        let login = LoginService::new(Arc::new(InMemoryCredentialStore::new()), jwt.clone());
        for user in &settings.seed_users {
            login
                .register(&user.username, &user.password, &user.role)
                .await
                .with_context(|| format!("Failed to seed user {}", user.username))?;
        }
        info!(count = settings.seed_users.len(), "Seed users registered");

        let rbac = RbacInterceptor::new(jwt, policy);
        info!(protected_methods = rbac.policy().len(), "Access policy installed");

        Ok(Self {
            rbac,
            identity: IdentityServiceServer::new(login),
            orders: OrderServiceServer::new(settings.orders),
        })
    }

    fn router(self) -> Router<Stack<RbacLayer, Identity>> {
        Server::builder()
            .layer(self.rbac.layer())
            .add_service(self.identity.into_service())
            .add_service(self.orders.product_info())
            .add_service(self.orders.order_management())
    }

    /// Bind `addr` and serve until `shutdown` resolves
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Starting gRPC server on {}", addr);
        self.router()
            .serve_with_shutdown(addr, shutdown)
            .await
            .context("gRPC server error")
    }

    /// Serve connections accepted on an already bound `listener`
    pub async fn serve_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.router()
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await
            .context("gRPC server error")
    }
}
