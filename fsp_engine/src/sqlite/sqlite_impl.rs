//! `SqliteDatabase` is a concrete implementation of an order lifecycle backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{catalog, db_url, new_pool, orders};
use crate::{
    db_types::{Customer, CustomerId, GatewayOrderId, NewOrder, Order, OrderId, Service, ServiceId},
    traits::{CatalogError, CatalogLookup, OrderManagement, OrderManagementError, PaymentUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_gateway_order_id(
        &self,
        id: &GatewayOrderId,
    ) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_gateway_order_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_order_id(&self, id: &OrderId) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_id_or_gateway_id(&self, id: &str) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id_or_gateway_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_customer(customer_id, &mut conn).await?;
        Ok(orders)
    }

    async fn mark_order_paid(
        &self,
        id: &GatewayOrderId,
        update: PaymentUpdate,
    ) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::mark_order_paid(id, update, &mut conn).await?;
        Ok(order)
    }

    async fn mark_order_failed(&self, id: &GatewayOrderId) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::mark_order_failed(id, &mut conn).await?;
        Ok(order)
    }
}

impl CatalogLookup for SqliteDatabase {
    async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<Customer>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let customer = catalog::fetch_customer(id, &mut conn).await?;
        Ok(customer)
    }

    async fn fetch_service(&self, id: &ServiceId) -> Result<Option<Service>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let service = catalog::fetch_service(id, &mut conn).await?;
        Ok(service)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the `FSP_DATABASE_URL` environment variable, or the default URL if the
    /// variable is not set.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
    }

    pub async fn upsert_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::upsert_customer(customer, &mut conn).await?;
        Ok(())
    }

    pub async fn upsert_service(&self, service: &Service) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::upsert_service(service, &mut conn).await?;
        Ok(())
    }
}
