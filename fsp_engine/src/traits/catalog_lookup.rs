use thiserror::Error;

use crate::db_types::{Customer, CustomerId, Service, ServiceId};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

/// Read-only lookups against the customer and service records. These records are owned by the registration and
/// catalog subsystems; the order lifecycle never modifies them.
#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<Customer>, CatalogError>;

    async fn fetch_service(&self, id: &ServiceId) -> Result<Option<Service>, CatalogError>;
}
