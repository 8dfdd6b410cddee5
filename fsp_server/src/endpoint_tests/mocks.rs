use fsp_engine::{
    db_types::{Customer, CustomerId, GatewayOrderId, NewOrder, Order, OrderId, Service, ServiceId},
    traits::{CatalogError, CatalogLookup, OrderManagement, OrderManagementError, PaymentUpdate},
};
use mockall::mock;

mock! {
    pub LifecycleDb {}
    impl OrderManagement for LifecycleDb {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderManagementError>;
        async fn fetch_order_by_gateway_order_id(
            &self,
            id: &GatewayOrderId,
        ) -> Result<Option<Order>, OrderManagementError>;
        async fn fetch_order_by_order_id(&self, id: &OrderId) -> Result<Option<Order>, OrderManagementError>;
        async fn fetch_order_by_id_or_gateway_id(&self, id: &str) -> Result<Option<Order>, OrderManagementError>;
        async fn fetch_orders_for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, OrderManagementError>;
        async fn mark_order_paid(
            &self,
            id: &GatewayOrderId,
            update: PaymentUpdate,
        ) -> Result<Option<Order>, OrderManagementError>;
        async fn mark_order_failed(&self, id: &GatewayOrderId) -> Result<Option<Order>, OrderManagementError>;
    }
    impl CatalogLookup for LifecycleDb {
        async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<Customer>, CatalogError>;
        async fn fetch_service(&self, id: &ServiceId) -> Result<Option<Service>, CatalogError>;
    }
}
