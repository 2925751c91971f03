/// gRPC server implementation for order-service
///
/// - `product`: ProductInfo (AddProduct, GetProduct)
/// - `orders`: OrderManagement (unary, server, client and bidi streaming)
/// - `policy`: default method → role access table
mod orders;
pub mod policy;
mod product;

use crate::config::OrderSettings;
use crate::store::{OrderStore, ProductStore};
use std::sync::Arc;

// Import generated protobuf types
pub mod ecommerce {
    tonic::include_proto!("ecommerce");
}

pub use ecommerce::order_management_server::OrderManagementServer;
pub use ecommerce::product_info_server::ProductInfoServer;
pub use policy::default_access_policy;

pub const ADD_PRODUCT: &str = "/ecommerce.ProductInfo/AddProduct";
pub const GET_PRODUCT: &str = "/ecommerce.ProductInfo/GetProduct";
pub const CREATE_ORDER: &str = "/ecommerce.OrderManagement/CreateOrder";
pub const GET_ORDER: &str = "/ecommerce.OrderManagement/GetOrder";
pub const SEARCH_ORDERS: &str = "/ecommerce.OrderManagement/SearchOrders";
pub const UPDATE_ORDERS: &str = "/ecommerce.OrderManagement/UpdateOrders";
pub const PROCESS_ORDERS: &str = "/ecommerce.OrderManagement/ProcessOrders";
pub const LOGIN: &str = "/ecommerce.auth.AuthService/Login";

/// Order service gRPC server
///
/// One value backs both `ProductInfo` and `OrderManagement`; clones share
/// the same collections.
#[derive(Clone, Debug)]
pub struct OrderServiceServer {
    products: Arc<ProductStore>,
    orders: Arc<OrderStore>,
    settings: OrderSettings,
}

impl OrderServiceServer {
    pub fn new(settings: OrderSettings) -> Self {
        Self::with_stores(
            Arc::new(ProductStore::new()),
            Arc::new(OrderStore::new()),
            settings,
        )
    }

    pub fn with_stores(
        products: Arc<ProductStore>,
        orders: Arc<OrderStore>,
        settings: OrderSettings,
    ) -> Self {
        Self {
            products,
            orders,
            settings,
        }
    }

    pub fn orders(&self) -> &Arc<OrderStore> {
        &self.orders
    }

    pub fn product_info(&self) -> ProductInfoServer<Self> {
        ProductInfoServer::new(self.clone())
    }

    pub fn order_management(&self) -> OrderManagementServer<Self> {
        OrderManagementServer::new(self.clone())
    }
}
