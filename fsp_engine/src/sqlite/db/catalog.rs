use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{Customer, CustomerId, Service, ServiceId};

pub async fn fetch_customer(id: &CustomerId, conn: &mut SqliteConnection) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT id, name, email, mobile FROM customers WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(customer)
}

pub async fn fetch_service(id: &ServiceId, conn: &mut SqliteConnection) -> Result<Option<Service>, sqlx::Error> {
    let service = sqlx::query_as("SELECT id, name, processing_days FROM services WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(service)
}

/// Inserts or replaces a customer record. The lifecycle never calls this; it is here for seeding and tests.
pub async fn upsert_customer(customer: &Customer, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, name, email, mobile) VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE SET name = excluded.name, email = excluded.email, mobile = excluded.mobile
        "#,
    )
    .bind(customer.id.as_str())
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(customer.mobile.as_deref())
    .execute(conn)
    .await?;
    trace!("🗃️ Customer {} saved", customer.id);
    Ok(())
}

/// Inserts or replaces a service record. The lifecycle never calls this; it is here for seeding and tests.
pub async fn upsert_service(service: &Service, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO services (id, name, processing_days) VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE SET name = excluded.name, processing_days = excluded.processing_days
        "#,
    )
    .bind(service.id.as_str())
    .bind(&service.name)
    .bind(service.processing_days.as_deref())
    .execute(conn)
    .await?;
    trace!("🗃️ Service {} saved", service.id);
    Ok(())
}
