use super::ecommerce::product_info_server::ProductInfo;
use super::ecommerce::{Product, ProductId};
use super::OrderServiceServer;
use crate::error::OrderError;
use grpc_rbac::AuthClaimsExt;
use tonic::{Request, Response, Status};
use tracing::info;

#[tonic::async_trait]
impl ProductInfo for OrderServiceServer {
    async fn add_product(
        &self,
        request: Request<Product>,
    ) -> Result<Response<ProductId>, Status> {
        let caller = request.caller().to_string();
        let product = request.into_inner();
        let name = product.name.clone();

        let id = self.products.insert(product).await?;
        info!(product_id = %id, name = %name, caller = %caller, "Product added");

        Ok(Response::new(ProductId { value: id }))
    }

    async fn get_product(
        &self,
        request: Request<ProductId>,
    ) -> Result<Response<Product>, Status> {
        let id = request.into_inner().value;
        if id.is_empty() {
            return Err(OrderError::InvalidArgument("product id must not be empty".into()).into());
        }

        let product = self
            .products
            .get(&id)
            .await
            .ok_or(OrderError::ProductNotFound(id))?;

        Ok(Response::new(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderSettings;

    fn iphone() -> Product {
        Product {
            id: String::new(),
            name: "Apple iPhone 11".into(),
            description: "Meet Apple iPhone 11.".into(),
            price: 699.0,
        }
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let server = OrderServiceServer::new(OrderSettings::default());

        let id = server
            .add_product(Request::new(iphone()))
            .await
            .unwrap()
            .into_inner()
            .value;

        let product = server
            .get_product(Request::new(ProductId { value: id.clone() }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(product.id, id);
        assert_eq!(product.name, "Apple iPhone 11");
    }

    #[tokio::test]
    async fn test_get_unknown_product() {
        let server = OrderServiceServer::new(OrderSettings::default());

        let status = server
            .get_product(Request::new(ProductId {
                value: "unknown".into(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_get_empty_id() {
        let server = OrderServiceServer::new(OrderSettings::default());

        let status = server
            .get_product(Request::new(ProductId::default()))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
