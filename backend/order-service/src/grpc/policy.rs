//! Default access table for the order platform

use super::{
    ADD_PRODUCT, CREATE_ORDER, GET_ORDER, GET_PRODUCT, PROCESS_ORDERS, SEARCH_ORDERS,
    UPDATE_ORDERS,
};
use grpc_rbac::AccessPolicy;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Method → allowed roles. `Login` is deliberately absent so it stays public.
pub fn default_access_policy() -> AccessPolicy {
    AccessPolicy::new()
        .allow(ADD_PRODUCT, [ROLE_ADMIN])
        .allow(GET_PRODUCT, [ROLE_ADMIN, ROLE_USER])
        .allow(CREATE_ORDER, [ROLE_ADMIN, ROLE_USER])
        .allow(GET_ORDER, [ROLE_ADMIN, ROLE_USER])
        .allow(SEARCH_ORDERS, [ROLE_ADMIN, ROLE_USER])
        .allow(UPDATE_ORDERS, [ROLE_ADMIN])
        .allow(PROCESS_ORDERS, [ROLE_ADMIN])
}
