use thiserror::Error;

use crate::{
    db_types::{CustomerId, GatewayOrderId, NewOrder, Order, OrderId},
    traits::data_objects::PaymentUpdate,
};

#[derive(Debug, Clone, Error)]
pub enum OrderManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("An order for gateway order {0} already exists")]
    DuplicateGatewayOrder(GatewayOrderId),
    #[error("Order {0} already exists")]
    DuplicateOrderId(OrderId),
}

impl From<sqlx::Error> for OrderManagementError {
    fn from(e: sqlx::Error) -> Self {
        OrderManagementError::DatabaseError(e.to_string())
    }
}

/// The order repository.
///
/// Orders are keyed three ways: the row id, the internal [`OrderId`] and the [`GatewayOrderId`]. Both string ids are
/// unique across all orders, and backends MUST enforce this.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a brand-new order with `Pending` order and payment status.
    ///
    /// If the gateway order id (or internal order id) is already in use, the call fails with
    /// [`OrderManagementError::DuplicateGatewayOrder`] (or [`OrderManagementError::DuplicateOrderId`]) and nothing is
    /// written.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderManagementError>;

    async fn fetch_order_by_gateway_order_id(
        &self,
        id: &GatewayOrderId,
    ) -> Result<Option<Order>, OrderManagementError>;

    async fn fetch_order_by_order_id(&self, id: &OrderId) -> Result<Option<Order>, OrderManagementError>;

    /// Looks `id` up as an internal order id first, and then as a gateway order id.
    async fn fetch_order_by_id_or_gateway_id(&self, id: &str) -> Result<Option<Order>, OrderManagementError>;

    /// All orders for the customer, newest first.
    async fn fetch_orders_for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, OrderManagementError>;

    /// Moves the order to `Paid`/`InProcess`, storing the payment id and the projected due date.
    ///
    /// This is a conditional update: it is only applied if the payment status is still `Pending`. If the guard fails,
    /// or the order does not exist, `None` is returned and nothing is written.
    async fn mark_order_paid(
        &self,
        id: &GatewayOrderId,
        update: PaymentUpdate,
    ) -> Result<Option<Order>, OrderManagementError>;

    /// Moves the payment status to `Failed`, leaving the order status untouched.
    ///
    /// Like [`Self::mark_order_paid`], this is only applied while the payment status is `Pending`. Otherwise `None` is
    /// returned.
    async fn mark_order_failed(&self, id: &GatewayOrderId) -> Result<Option<Order>, OrderManagementError>;
}
