//! Client-side token interceptor
//!
//! Injects the bearer token into the `authorization` metadata entry of every
//! outgoing request.

use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Attaches `authorization: Bearer {token}` to each outgoing request
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_rbac::JwtClientInterceptor;
/// use tonic::transport::Channel;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let interceptor = JwtClientInterceptor::new("eyJhbGc...")?;
/// let channel = Channel::from_static("http://[::1]:50051").connect().await?;
/// // let client = OrderManagementClient::with_interceptor(channel, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JwtClientInterceptor {
    /// Pre-formatted "Bearer {token}" value
    auth_header: AsciiMetadataValue,
}

impl JwtClientInterceptor {
    /// ## Errors
    ///
    /// Returns `Status::invalid_argument` if the token is not valid header ASCII.
    pub fn new(token: impl AsRef<str>) -> Result<Self, Status> {
        let auth_header = AsciiMetadataValue::try_from(format!("Bearer {}", token.as_ref()))
            .map_err(|_| Status::invalid_argument("token contains invalid characters"))?;

        Ok(Self { auth_header })
    }
}

impl Interceptor for JwtClientInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.auth_header.clone());
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_bearer_header() {
        let mut interceptor = JwtClientInterceptor::new("abc.def.ghi").unwrap();
        let request = interceptor.call(Request::new(())).unwrap();

        let value = request.metadata().get("authorization").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_rejects_non_ascii_token() {
        let err = JwtClientInterceptor::new("tok\nen").unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }
}
