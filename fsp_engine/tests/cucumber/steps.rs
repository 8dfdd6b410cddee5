use chrono::{Days, Utc};
use cucumber::{then, when};
use fsp_common::Inr;
use fsp_engine::{
    db_types::{CustomerId, OrderStatusType, PaymentStatusType},
    order_objects::{CreateOrderParams, VerifyPaymentParams},
    OrderFlowError,
    OrderManagement,
};

use crate::cucumber::LifecycleWorld;

#[when(expr = "customer '{word}' orders service '{word}' for {word} rupees")]
async fn simple_order(world: &mut LifecycleWorld, customer: String, service: String, rupees: String) {
    let amount = Inr::from_rupees(rupees.parse().expect("Not a number")).expect("Not a rupee amount");
    let params = CreateOrderParams::new(service.clone(), format!("Service {service}"), amount);
    let result = world.api().create_order(params, &CustomerId::new(customer)).await;
    if let Some(order) = world.record(result) {
        world.last_order = Some(order);
    }
}

#[when(expr = "customer '{word}' submits the order {string}")]
async fn raw_order(world: &mut LifecycleWorld, customer: String, body: String) {
    let params: CreateOrderParams = serde_json::from_str(&body).expect("Invalid order JSON");
    let result = world.api().create_order(params, &CustomerId::new(customer)).await;
    if let Some(order) = world.record(result) {
        world.last_order = Some(order);
    }
}

#[when(expr = "the gateway confirms payment '{word}'")]
async fn valid_callback(world: &mut LifecycleWorld, payment_id: String) {
    let order_id = world.last_order().gateway_order_id.clone();
    let customer_id = world.last_order().order.customer_id.clone();
    let signature = world.system().gateway.sign(&order_id, &payment_id);
    let params = VerifyPaymentParams::new(order_id.as_str(), payment_id.as_str(), signature.as_str());
    let result = world.api().verify_payment(params, &customer_id).await;
    world.last_verification = world.record(result);
}

#[when(expr = "a forged callback arrives for payment '{word}'")]
async fn forged_callback(world: &mut LifecycleWorld, payment_id: String) {
    let customer_id = world.last_order().order.customer_id.clone();
    send_forged_callback(world, payment_id, customer_id).await;
}

#[when(expr = "customer '{word}' sends a forged callback for payment '{word}'")]
async fn forged_callback_from(world: &mut LifecycleWorld, customer: String, payment_id: String) {
    send_forged_callback(world, payment_id, CustomerId::new(customer)).await;
}

async fn send_forged_callback(world: &mut LifecycleWorld, payment_id: String, customer_id: CustomerId) {
    let order_id = world.last_order().gateway_order_id.clone();
    let params = VerifyPaymentParams::new(order_id.as_str(), payment_id.as_str(), "0badc0ffee");
    let result = world.api().verify_payment(params, &customer_id).await;
    world.last_verification = world.record(result);
}

#[then(expr = "the payment is verified")]
async fn is_verified(world: &mut LifecycleWorld) {
    let verification = world.last_verification.as_ref().expect("No verification result");
    assert!(verification.verified, "Payment should be verified");
}

#[then(expr = "the payment is not verified")]
async fn is_not_verified(world: &mut LifecycleWorld) {
    let verification = world.last_verification.as_ref().expect("No verification result");
    assert!(!verification.verified, "Payment should not be verified");
}

#[then(expr = "the order has payment status {word} and order status {word}")]
async fn check_statuses(world: &mut LifecycleWorld, payment: String, status: String) {
    let id = world.last_order().gateway_order_id.clone();
    let order = world.api().db().fetch_order_by_gateway_order_id(&id).await.unwrap().expect("Order not found");
    assert_eq!(order.payment_status, payment.parse::<PaymentStatusType>().unwrap());
    assert_eq!(order.order_status, status.parse::<OrderStatusType>().unwrap());
}

#[then(expr = "the order total is {word} rupees with CGST {word}, SGST {word} and IGST {word}")]
async fn check_amounts(world: &mut LifecycleWorld, total: String, cgst: String, sgst: String, igst: String) {
    let rupees = |s: &str| Inr::from_rupees(s.parse().expect("Not a number")).expect("Not a rupee amount");
    let order = &world.last_order().order;
    assert_eq!(order.total_amount, rupees(&total));
    assert_eq!(order.cgst_amount, rupees(&cgst));
    assert_eq!(order.sgst_amount, rupees(&sgst));
    assert_eq!(order.igst_amount, rupees(&igst));
}

#[then(expr = "the gateway was asked for {int} paise")]
async fn check_gateway_amount(world: &mut LifecycleWorld, paise: i64) {
    assert_eq!(world.last_order().amount, paise);
    let orders = world.system().gateway.orders();
    assert_eq!(orders.last().map(|o| o.amount), Some(paise));
}

#[then(expr = "the order is due in {int} days")]
async fn check_due_date(world: &mut LifecycleWorld, days: u64) {
    let id = world.last_order().gateway_order_id.clone();
    let order = world.api().db().fetch_order_by_gateway_order_id(&id).await.unwrap().expect("Order not found");
    let due = order.due_date.expect("Due date not set");
    let expected = Utc::now().checked_add_days(Days::new(days)).unwrap();
    assert_eq!(due.date_naive(), expected.date_naive());
    assert_eq!(order.expected_completion_date, Some(due));
}

#[then(expr = "the order has no due date")]
async fn check_no_due_date(world: &mut LifecycleWorld) {
    let id = world.last_order().gateway_order_id.clone();
    let order = world.api().db().fetch_order_by_gateway_order_id(&id).await.unwrap().expect("Order not found");
    assert!(order.due_date.is_none());
    assert!(order.expected_completion_date.is_none());
}

#[then(expr = "customer '{word}' has {int} orders")]
async fn check_order_count(world: &mut LifecycleWorld, customer: String, count: usize) {
    let orders = world.api().orders_for_customer(&CustomerId::new(customer)).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "the request fails with a missing fields error for {string}")]
async fn check_missing(world: &mut LifecycleWorld, fields: String) {
    let expected = fields.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>();
    match world.last_error.as_ref() {
        Some(OrderFlowError::MissingFields(missing)) => assert_eq!(missing, &expected),
        other => panic!("Expected a missing fields error, got {other:?}"),
    }
}

#[then(expr = "the request fails with a {word} error")]
async fn check_error_kind(world: &mut LifecycleWorld, kind: String) {
    let err = world.last_error.as_ref().expect("The last request succeeded");
    let actual = match err {
        OrderFlowError::MissingFields(_) => "validation",
        OrderFlowError::InvalidRequest(_) => "validation",
        OrderFlowError::CustomerNotFound(_) | OrderFlowError::OrderNotFound(_) => "not-found",
        OrderFlowError::Conflict(_) => "conflict",
        OrderFlowError::Upstream(_) => "upstream",
        OrderFlowError::DatabaseError(_) => "database",
    };
    assert_eq!(actual, kind, "Unexpected error: {err}");
}
