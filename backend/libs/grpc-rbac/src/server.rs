//! Server-side RBAC interceptor
//!
//! Gates every incoming call on the method's allowed-role set. The decision is
//! made once per call from the request path and headers, so unary calls and
//! stream establishment go through exactly the same check.

use crate::policy::AccessPolicy;
use crypto_core::{Claims, JwtManager};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::metadata::MetadataMap;
use tonic::Status;
use tower::{Layer, Service};
use tracing::{debug, warn};

const AUTHORIZATION_HEADER: &str = "authorization";

/// Outcome of a successful authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Method is not in the policy; forwarded without looking at any token
    Public,
    /// Token verified and role permitted
    Authorized(Claims),
}

/// Per-call authorization logic
///
/// 1. Method not in the policy → `Decision::Public`
/// 2. Extract the token from the `authorization` metadata entry
/// 3. Verify it with the [`JwtManager`]
/// 4. Check the role against the method's allowed set
#[derive(Clone, Debug)]
pub struct RbacInterceptor {
    jwt: Arc<JwtManager>,
    policy: Arc<AccessPolicy>,
}

impl RbacInterceptor {
    pub fn new(jwt: Arc<JwtManager>, policy: AccessPolicy) -> Self {
        Self {
            jwt,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Tower layer applying this interceptor to a whole router
    pub fn layer(&self) -> RbacLayer {
        RbacLayer {
            interceptor: self.clone(),
        }
    }

    /// Authorize a call to `method` carrying `metadata`
    ///
    /// ## Errors
    ///
    /// - `Status::unauthenticated` if the token is missing, unreadable, invalid or expired
    /// - `Status::permission_denied` if the token's role may not call `method`
    pub fn authorize(&self, method: &str, metadata: &MetadataMap) -> Result<Decision, Status> {
        let Some(allowed) = self.policy.allowed_roles(method) else {
            debug!(method, "Public method, skipping authorization");
            return Ok(Decision::Public);
        };

        let token = extract_bearer_token(metadata).map_err(|status| {
            warn!(method, reason = status.message(), "Rejected unauthenticated call");
            status
        })?;

        let claims = self.jwt.verify(token).map_err(|e| {
            warn!(method, error = %e, "Rejected call with invalid access token");
            Status::unauthenticated(format!("access token is invalid: {e}"))
        })?;

        if !allowed.contains(&claims.role) {
            warn!(
                method,
                username = %claims.sub,
                role = %claims.role,
                "Rejected call: role not permitted"
            );
            return Err(Status::permission_denied("no permission to access this RPC"));
        }

        debug!(method, username = %claims.sub, role = %claims.role, "Call authorized");
        Ok(Decision::Authorized(claims))
    }
}

/// Read the token from the `authorization` entry, accepting an optional
/// `Bearer ` prefix.
fn extract_bearer_token(metadata: &MetadataMap) -> Result<&str, Status> {
    let value = metadata
        .get(AUTHORIZATION_HEADER)
        .ok_or_else(|| Status::unauthenticated("authorization token is not provided"))?;

    let raw = value
        .to_str()
        .map_err(|_| Status::unauthenticated("invalid authorization header encoding"))?;

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        return Err(Status::unauthenticated("authorization token is not provided"));
    }

    Ok(token)
}

/// Build the trailers-only gRPC response used to reject a call
fn rejection(status: &Status) -> http::Response<BoxBody> {
    let mut response = http::Response::new(tonic::body::empty_body());
    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/grpc"),
    );
    if let Err(e) = status.add_header(headers) {
        warn!(error = %e, "Failed to encode rejection status");
    }
    response
}

/// Tower layer wrapping a tonic router with [`RbacService`]
#[derive(Clone, Debug)]
pub struct RbacLayer {
    interceptor: RbacInterceptor,
}

impl<S> Layer<S> for RbacLayer {
    type Service = RbacService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RbacService {
            inner: service,
            interceptor: self.interceptor.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RbacService<S> {
    inner: S,
    interceptor: RbacInterceptor,
}

impl<S, B> Service<http::Request<B>> for RbacService<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        let method = req.uri().path().to_string();
        let metadata = MetadataMap::from_headers(req.headers().clone());
        debug!(method = %method, "--> rbac interceptor");

        match self.interceptor.authorize(&method, &metadata) {
            Ok(Decision::Public) => {}
            Ok(Decision::Authorized(claims)) => {
                req.extensions_mut().insert(claims);
            }
            Err(status) => {
                let response = rejection(&status);
                return Box::pin(async move { Ok(response) });
            }
        }

        // The readied service is the one that must handle the call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(inner.call(req))
    }
}
