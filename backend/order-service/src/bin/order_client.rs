/// Order Client
///
/// Logs in against a running order-service and exercises every RPC once,
/// logging each response. Connection and credentials come from:
///
/// - `ORDER_SERVICE_URL` (default `http://localhost:50051`)
/// - `ORDER_CLIENT_USERNAME` / `ORDER_CLIENT_PASSWORD` (default `admin1` / `secret`)
use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use grpc_rbac::{JwtClientInterceptor, ObservedStream};
use identity_service::grpc::ecommerce::auth::auth_service_client::AuthServiceClient;
use identity_service::grpc::ecommerce::auth::LoginRequest;
use order_service::ecommerce::order_management_client::OrderManagementClient;
use order_service::ecommerce::product_info_client::ProductInfoClient;
use order_service::ecommerce::{Order, OrderId, Product, ProductId, SearchQuery};
use std::env;
use std::time::Duration;
use tonic::transport::Channel;
use tonic::Request;
use tracing::info;

const CALL_DEADLINE: Duration = Duration::from_secs(2);

/// Wrap `message` in a request bounded by [`CALL_DEADLINE`]
fn with_deadline<T>(message: T) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(CALL_DEADLINE);
    request
}

fn order(id: &str, item: &str) -> Order {
    Order {
        id: id.to_string(),
        items: vec![item.to_string()],
        description: "Will be released?".to_string(),
        price: 100.0,
        destination: "Seoul".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "order_client=info,grpc_rbac=debug".into()),
        )
        .init();

    let url = env::var("ORDER_SERVICE_URL").unwrap_or_else(|_| "http://localhost:50051".into());
    let username = env::var("ORDER_CLIENT_USERNAME").unwrap_or_else(|_| "admin1".into());
    let password = env::var("ORDER_CLIENT_PASSWORD").unwrap_or_else(|_| "secret".into());

    let channel = Channel::from_shared(url.clone())
        .context("Invalid ORDER_SERVICE_URL")?
        .connect()
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    info!(url = %url, "Connected");

    // Login is public, so this client carries no token
    let access_token = AuthServiceClient::new(channel.clone())
        .login(with_deadline(LoginRequest { username, password }))
        .await
        .context("Login failed")?
        .into_inner()
        .access_token;
    info!("Login succeeded");

    let auth = JwtClientInterceptor::new(&access_token)?;
    let mut products = ProductInfoClient::with_interceptor(channel.clone(), auth.clone());
    let mut orders = OrderManagementClient::with_interceptor(channel, auth);

    // Products
    let product_id = products
        .add_product(with_deadline(Product {
            id: String::new(),
            name: "Apple iPhone 12".into(),
            description: "Meet Apple iPhone 12. All-new dual-camera system with Ultra Wide and Night mode.".into(),
            price: 1000.0,
        }))
        .await?
        .into_inner();
    info!(product_id = %product_id.value, "AddProduct response");

    let product = products
        .get_product(with_deadline(ProductId {
            value: product_id.value,
        }))
        .await?
        .into_inner();
    info!(?product, "GetProduct response");

    // Unary orders
    let order_id = orders
        .create_order(with_deadline(order("", "Google glass")))
        .await?
        .into_inner();
    info!(order_id = %order_id.value, "CreateOrder response");

    let retrieved = orders
        .get_order(with_deadline(OrderId {
            value: order_id.value.clone(),
        }))
        .await?
        .into_inner();
    info!(order = ?retrieved, "GetOrder response");

    // Server streaming
    let found = orders
        .search_orders(with_deadline(SearchQuery {
            value: "Google".into(),
        }))
        .await?
        .into_inner();
    let mut found = std::pin::pin!(ObservedStream::inbound(found, "SearchOrders"));
    while let Some(order) = found.next().await {
        let order = order?;
        info!(order_id = %order.id, items = ?order.items, "Search result");
    }

    // Client streaming
    let updates = vec![
        order("aaaa", "Google glass"),
        order("fjdkao", "iPhone 15 pro max"),
        order("fjdkao", "iPhone 15 pro"),
    ];
    let summary = orders
        .update_orders(with_deadline(stream::iter(updates)))
        .await?
        .into_inner();
    info!(order_ids = ?summary.order_ids, message = %summary.message, "UpdateOrders response");

    // Bidirectional streaming
    let ids = ["aaaa", "fjdkao", order_id.value.as_str(), "102"]
        .into_iter()
        .map(|value| OrderId {
            value: value.to_string(),
        })
        .collect::<Vec<_>>();
    let shipments = orders
        .process_orders(with_deadline(stream::iter(ids)))
        .await?
        .into_inner();
    let mut shipments = std::pin::pin!(ObservedStream::inbound(shipments, "ProcessOrders"));
    while let Some(shipment) = shipments.next().await {
        let shipment = shipment?;
        info!(
            id = %shipment.id,
            status = %shipment.status,
            batch = shipment.batch,
            "Combined shipment"
        );
    }

    Ok(())
}
