use thiserror::Error;

use crate::{
    db_types::CustomerId,
    traits::{CatalogError, GatewayError, OrderManagementError},
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Customer {0} does not exist")]
    CustomerNotFound(CustomerId),
    #[error("Order {0} does not exist")]
    OrderNotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Payment gateway error: {0}")]
    Upstream(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderManagementError> for OrderFlowError {
    fn from(e: OrderManagementError) -> Self {
        match e {
            OrderManagementError::DatabaseError(s) => OrderFlowError::DatabaseError(s),
            OrderManagementError::DuplicateGatewayOrder(id) => {
                OrderFlowError::Conflict(format!("An order for gateway order {id} already exists"))
            },
            OrderManagementError::DuplicateOrderId(id) => {
                OrderFlowError::Conflict(format!("Order {id} already exists"))
            },
        }
    }
}

impl From<CatalogError> for OrderFlowError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::DatabaseError(s) => OrderFlowError::DatabaseError(s),
        }
    }
}

impl From<GatewayError> for OrderFlowError {
    fn from(e: GatewayError) -> Self {
        OrderFlowError::Upstream(e.to_string())
    }
}
