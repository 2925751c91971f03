//! End-to-end tests for order-service
//!
//! Each test starts the full server (login, RBAC layer, product and order
//! handlers) on an ephemeral port and drives it through generated clients.

use chrono::Duration;
use crypto_core::JwtManager;
use futures::stream;
use grpc_rbac::JwtClientInterceptor;
use identity_service::config::{JwtSettings, SeedUser};
use identity_service::grpc::ecommerce::auth::auth_service_client::AuthServiceClient;
use identity_service::grpc::ecommerce::auth::LoginRequest;
use order_service::config::{OrderSettings, ServerSettings};
use order_service::ecommerce::order_management_client::OrderManagementClient;
use order_service::ecommerce::product_info_client::ProductInfoClient;
use order_service::ecommerce::{CombinedShipment, Order, OrderId, Product, ProductId, SearchQuery};
use order_service::{App, Settings};
use std::num::NonZeroUsize;
use tokio::net::TcpListener;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tonic::{Code, Status};

const SECRET: &str = "order-service-test-secret";

type AuthedOrders = OrderManagementClient<InterceptedService<Channel, JwtClientInterceptor>>;
type AuthedProducts = ProductInfoClient<InterceptedService<Channel, JwtClientInterceptor>>;

fn settings(batch_size: usize) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        jwt: JwtSettings {
            secret: SECRET.into(),
            ttl_secs: 900,
        },
        orders: OrderSettings {
            batch_size: NonZeroUsize::new(batch_size).unwrap(),
            search_buffer: 2,
        },
        seed_users: SeedUser::parse_list("admin1:secret:admin,user1:secret:user").unwrap(),
    }
}

/// Start a server and return a channel connected to it
async fn start_server(batch_size: usize) -> Channel {
    let app = App::build(&settings(batch_size)).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(app.serve_listener(listener, std::future::pending()));

    Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap()
}

async fn login(channel: &Channel, username: &str, password: &str) -> Result<String, Status> {
    AuthServiceClient::new(channel.clone())
        .login(LoginRequest {
            username: username.into(),
            password: password.into(),
        })
        .await
        .map(|response| response.into_inner().access_token)
}

async fn orders_as(channel: &Channel, username: &str) -> AuthedOrders {
    let token = login(channel, username, "secret").await.unwrap();
    OrderManagementClient::with_interceptor(
        channel.clone(),
        JwtClientInterceptor::new(token).unwrap(),
    )
}

async fn products_as(channel: &Channel, username: &str) -> AuthedProducts {
    let token = login(channel, username, "secret").await.unwrap();
    ProductInfoClient::with_interceptor(channel.clone(), JwtClientInterceptor::new(token).unwrap())
}

fn order(id: &str, items: &[&str]) -> Order {
    Order {
        id: id.into(),
        items: items.iter().map(|s| s.to_string()).collect(),
        description: "test order".into(),
        price: 100.0,
        destination: "Seoul".into(),
    }
}

fn order_ids(values: &[&str]) -> Vec<OrderId> {
    values
        .iter()
        .map(|value| OrderId {
            value: value.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let channel = start_server(3).await;

    assert!(login(&channel, "admin1", "secret").await.is_ok());

    let wrong_password = login(&channel, "admin1", "nope").await.unwrap_err();
    let unknown_user = login(&channel, "ghost", "secret").await.unwrap_err();

    for status in [&wrong_password, &unknown_user] {
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "incorrect username/password");
    }
}

#[tokio::test]
async fn test_protected_method_without_token() {
    let channel = start_server(3).await;
    let mut client = OrderManagementClient::new(channel);

    let status = client
        .get_order(OrderId {
            value: "unknown".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_rejected() {
    let channel = start_server(3).await;

    let expired = JwtManager::new(SECRET, Duration::seconds(-60))
        .unwrap()
        .generate("admin1", "admin")
        .unwrap();
    let foreign = JwtManager::new("another-secret", Duration::minutes(5))
        .unwrap()
        .generate("admin1", "admin")
        .unwrap();

    for token in [expired, foreign] {
        let mut client = OrderManagementClient::with_interceptor(
            channel.clone(),
            JwtClientInterceptor::new(token).unwrap(),
        );
        let status = client
            .create_order(order("", &["Google glass"]))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }
}

#[tokio::test]
async fn test_user_role_denied_admin_methods() {
    let channel = start_server(3).await;
    let mut products = products_as(&channel, "user1").await;
    let mut orders = orders_as(&channel, "user1").await;

    let status = products
        .add_product(Product {
            name: "Apple iPhone 12".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let status = orders
        .update_orders(stream::iter(vec![order("102", &["Pixel"])]))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let status = orders
        .process_orders(stream::iter(order_ids(&["102"])))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);
}

#[tokio::test]
async fn test_add_and_get_product() {
    let channel = start_server(3).await;
    let mut admin = products_as(&channel, "admin1").await;
    let mut user = products_as(&channel, "user1").await;

    let id = admin
        .add_product(Product {
            id: "client-id".into(),
            name: "Apple iPhone 12".into(),
            description: "Meet Apple iPhone 12.".into(),
            price: 1000.0,
        })
        .await
        .unwrap()
        .into_inner()
        .value;
    assert_ne!(id, "client-id");

    let product = user
        .get_product(ProductId { value: id.clone() })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(product.id, id);
    assert_eq!(product.name, "Apple iPhone 12");

    let status = user
        .get_product(ProductId {
            value: "unknown".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_create_then_get_order() {
    let channel = start_server(3).await;
    let mut user = orders_as(&channel, "user1").await;

    let id = user
        .create_order(order("", &["Google glass"]))
        .await
        .unwrap()
        .into_inner()
        .value;

    let fetched = user
        .get_order(OrderId { value: id.clone() })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, order(&id, &["Google glass"]));

    let status = user
        .get_order(OrderId {
            value: "unknown".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_search_orders() {
    let channel = start_server(3).await;
    let mut user = orders_as(&channel, "user1").await;

    let google = user
        .create_order(order("", &["Google Pixel 3A", "Google Pixel Book"]))
        .await
        .unwrap()
        .into_inner()
        .value;
    user.create_order(order("", &["Apple Watch S4"]))
        .await
        .unwrap();

    let mut results = user
        .search_orders(SearchQuery {
            value: "Google".into(),
        })
        .await
        .unwrap()
        .into_inner();
    let mut found = Vec::new();
    while let Some(order) = results.message().await.unwrap() {
        found.push(order.id);
    }
    assert_eq!(found, vec![google]);

    let mut results = user
        .search_orders(SearchQuery {
            value: "xyz".into(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(results.message().await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_orders_single_summary() {
    let channel = start_server(3).await;
    let mut admin = orders_as(&channel, "admin1").await;

    let summary = admin
        .update_orders(stream::iter(vec![
            order("o1", &["Google glass"]),
            order("o2", &["iPhone 15 pro max"]),
            order("o3", &["iPhone 15 pro"]),
        ]))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(summary.order_ids, vec!["o1", "o2", "o3"]);
    assert_eq!(summary.message, "Orders processed: o1, o2, o3");

    let o2 = admin
        .get_order(OrderId { value: "o2".into() })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(o2.items, vec!["iPhone 15 pro max"]);
}

#[tokio::test]
async fn test_update_orders_rejects_empty_id_and_writes_nothing() {
    let channel = start_server(3).await;
    let mut admin = orders_as(&channel, "admin1").await;

    let status = admin
        .update_orders(stream::iter(vec![order("o1", &["a"]), order("", &["b"])]))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = admin
        .get_order(OrderId { value: "o1".into() })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_process_orders_batches() {
    let channel = start_server(2).await;
    let mut admin = orders_as(&channel, "admin1").await;

    let mut shipments = admin
        .process_orders(stream::iter(order_ids(&["a", "b", "c"])))
        .await
        .unwrap()
        .into_inner();

    let mut received: Vec<CombinedShipment> = Vec::new();
    while let Some(shipment) = shipments.message().await.unwrap() {
        received.push(shipment);
    }

    let summary: Vec<(u64, &str, &str)> = received
        .iter()
        .map(|s| (s.batch, s.id.as_str(), s.order_ids[0].as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "cmb-a", "a"), (1, "cmb-b", "b"), (2, "cmb-c", "c")]
    );
    assert!(received.iter().all(|s| s.status == "PROCESSED"));
}

#[tokio::test]
async fn test_concurrent_process_orders_calls_do_not_share_batches() {
    let channel = start_server(2).await;
    let admin = orders_as(&channel, "admin1").await;

    let calls: Vec<_> = ["x", "y"]
        .into_iter()
        .map(|prefix| {
            let mut client = admin.clone();
            tokio::spawn(async move {
                let ids: Vec<String> = (0..3).map(|i| format!("{prefix}-{i}")).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let mut shipments = client
                    .process_orders(stream::iter(order_ids(&refs)))
                    .await
                    .unwrap()
                    .into_inner();

                let mut batches = Vec::new();
                while let Some(shipment) = shipments.message().await.unwrap() {
                    batches.push((shipment.batch, shipment.order_ids[0].clone()));
                }
                (prefix, batches)
            })
        })
        .collect();

    for call in calls {
        let (prefix, batches) = call.await.unwrap();
        assert_eq!(
            batches,
            vec![
                (1, format!("{prefix}-0")),
                (1, format!("{prefix}-1")),
                (2, format!("{prefix}-2")),
            ]
        );
    }
}
