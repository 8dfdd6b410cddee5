use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{CustomerId, GatewayOrderId, NewOrder, Order, OrderId},
    traits::{OrderManagementError, PaymentUpdate},
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// The order and payment status are always `Pending` for a new order. A clash on either the gateway order id or the
/// internal order id is reported as a duplicate error rather than a generic database error.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderManagementError> {
    let gateway_order_id = order.gateway_order_id.clone();
    let order_id = order.order_id.clone();
    let result = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (
                order_id,
                gateway_order_id,
                customer_id,
                customer_name,
                customer_email,
                customer_mobile,
                service_id,
                service_name,
                package_id,
                package_name,
                service_price,
                discount_amount,
                cgst_amount,
                sgst_amount,
                igst_amount,
                total_amount,
                currency,
                order_status,
                payment_status,
                payment_method,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, 'Pending', 'Pending',
                $18, $19, $19)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.gateway_order_id)
    .bind(order.customer_id)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.customer_mobile)
    .bind(order.service_id)
    .bind(order.service_name)
    .bind(order.package_id)
    .bind(order.package_name)
    .bind(order.service_price)
    .bind(order.discount_amount)
    .bind(order.cgst_amount)
    .bind(order.sgst_amount)
    .bind(order.igst_amount)
    .bind(order.total_amount)
    .bind(order.currency)
    .bind(order.payment_method)
    .bind(order.created_at)
    .fetch_one(conn)
    .await;
    match result {
        Ok(order) => {
            debug!("🗃️ Order [{}] inserted with id {}", order.order_id, order.id);
            Ok(order)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            if e.message().contains("gateway_order_id") {
                Err(OrderManagementError::DuplicateGatewayOrder(gateway_order_id))
            } else {
                Err(OrderManagementError::DuplicateOrderId(order_id))
            }
        },
        Err(e) => Err(e.into()),
    }
}

/// Returns the entry in the orders table for the corresponding `order_id`
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns the entry in the orders table for the corresponding `gateway_order_id`
pub async fn fetch_order_by_gateway_order_id(
    id: &GatewayOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_order_id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Returns the order matching `id` on either `order_id` or `gateway_order_id`.
/// If the id matches an `order_id` and a `gateway_order_id` on different orders, then the one matching the `order_id`
/// is returned.
pub async fn fetch_order_by_id_or_gateway_id(
    id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
        SELECT * FROM orders WHERE order_id = $1 OR gateway_order_id = $1
        ORDER BY CASE WHEN order_id = $1 THEN 0 ELSE 1 END
        LIMIT 1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Fetches all the orders for the given customer, newest first. Orders created at the same instant are returned in
/// reverse insertion order.
pub async fn fetch_orders_for_customer(
    customer_id: &CustomerId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    trace!("🗃️ Fetching orders for customer {customer_id}");
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(customer_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Marks the order as paid and in process, but only if its payment status is still `Pending`.
///
/// Returns `None` if the order does not exist, or if another writer got there first.
pub async fn mark_order_paid(
    id: &GatewayOrderId,
    update: PaymentUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders SET
            payment_status = 'Paid',
            order_status = 'InProcess',
            gateway_payment_id = $1,
            expected_completion_date = $2,
            due_date = $2,
            updated_at = $3
        WHERE gateway_order_id = $4 AND payment_status = 'Pending'
        RETURNING *;
        "#,
    )
    .bind(update.payment_id)
    .bind(update.due_date)
    .bind(Utc::now())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    match &order {
        Some(o) => debug!("🗃️ Order [{}] is now Paid/InProcess", o.order_id),
        None => debug!("🗃️ Gateway order {id} was not updated. It is missing or no longer Pending"),
    }
    Ok(order)
}

/// Marks the payment as failed, but only if its payment status is still `Pending`. The order status is not changed.
pub async fn mark_order_failed(id: &GatewayOrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders SET payment_status = 'Failed', updated_at = $1
        WHERE gateway_order_id = $2 AND payment_status = 'Pending'
        RETURNING *;
        "#,
    )
    .bind(Utc::now())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    match &order {
        Some(o) => debug!("🗃️ Payment for order [{}] marked as Failed", o.order_id),
        None => debug!("🗃️ Gateway order {id} was not marked as failed. It is missing or no longer Pending"),
    }
    Ok(order)
}
