use actix_web::http::StatusCode;
use fsp_common::Inr;
use fsp_engine::{
    db_types::{GatewayOrderId, OrderStatusType, PaymentStatusType, Service},
    test_utils::mock_gateway::{MockGateway, MOCK_KEY_ID},
};
use serde_json::json;

use super::{
    helpers::{configure_routes, customer, json, orders_api, pending_order, post_request, saved, token_for},
    mocks::MockLifecycleDb,
};

const ITR_ORDER: &str = r#"{
    "serviceId": "svc-itr",
    "serviceName": "ITR Filing",
    "packageId": "pkg-basic",
    "packageName": "Basic",
    "servicePrice": 1000,
    "CGST": 90,
    "SGST": 90,
    "totalAmount": 1180
}"#;

fn paid(id: i64, gateway_order_id: &str, payment_id: &str) -> fsp_engine::db_types::Order {
    let mut order = pending_order(id, "cust-1", gateway_order_id, 3);
    order.payment_status = PaymentStatusType::Paid;
    order.order_status = OrderStatusType::InProcess;
    order.gateway_payment_id = Some(payment_id.into());
    order
}

fn verify_body(gateway: &MockGateway, order_id: &str, payment_id: &str) -> String {
    let signature = gateway.sign(&GatewayOrderId::new(order_id), payment_id);
    json!({ "gatewayOrderId": order_id, "gatewayPaymentId": payment_id, "signature": signature }).to_string()
}

/// A correctly-formed callback whose signature is off by one hex digit.
fn forged_body(gateway: &MockGateway, order_id: &str, payment_id: &str) -> String {
    let mut signature = gateway.sign(&GatewayOrderId::new(order_id), payment_id);
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.replace_range(signature.len() - 1.., last);
    json!({ "gatewayOrderId": order_id, "gatewayPaymentId": payment_id, "signature": signature }).to_string()
}

//--------------------------------------      create-order     ---------------------------------------------------------

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_customer().times(1).returning(|id| Ok(Some(customer(id.as_str()))));
    db.expect_insert_order()
        .withf(|o| {
            o.gateway_order_id.as_str() == "order_Mock0000000001" &&
                o.total_amount == Inr::from_paise(118_000) &&
                o.service_price == Inr::from_paise(100_000) &&
                o.cgst_amount == Inr::from_paise(9_000) &&
                o.sgst_amount == Inr::from_paise(9_000) &&
                o.igst_amount.is_zero() &&
                o.discount_amount.is_zero() &&
                o.package_name == "Basic" &&
                o.customer_email == "asha@example.com"
        })
        .times(1)
        .returning(|o| Ok(saved(o, 1)));
    let gateway = MockGateway::new();
    let api = orders_api(db, gateway.clone());
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", ITR_ORDER, configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(
        body,
        json!({
            "success": true,
            "orderId": "order_Mock0000000001",
            "order": { "id": "order_Mock0000000001", "amount": 118000, "currency": "INR" },
            "amount": 118000,
            "currency": "INR",
            "keyId": MOCK_KEY_ID,
        })
    );
    let remote = gateway.orders();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].amount, 118_000);
    assert!(remote[0].receipt.as_deref().is_some_and(|r| r.starts_with("order_")));
}

#[actix_web::test]
async fn create_order_missing_fields() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::new();
    let api = orders_api(MockLifecycleDb::new(), gateway.clone());
    let (status, body) =
        post_request(&token_for("cust-1"), "/create-order", r#"{"serviceName": "ITR"}"#, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["missing"], json!(["serviceId", "amount"]));
    assert!(gateway.orders().is_empty());
}

#[actix_web::test]
async fn create_order_totals_must_add_up() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let order = r#"{"serviceId": "svc-itr", "serviceName": "ITR", "servicePrice": 1000, "CGST": 90, "amount": 1500}"#;
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", order, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert!(body.get("missing").is_none());
}

#[actix_web::test]
async fn create_order_taxes_without_service_price() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_customer().times(1).returning(|id| Ok(Some(customer(id.as_str()))));
    db.expect_insert_order()
        .withf(|o| o.total_amount == Inr::from_paise(118_000) && o.service_price == Inr::from_paise(100_000))
        .times(1)
        .returning(|o| Ok(saved(o, 1)));
    let gateway = MockGateway::new();
    let api = orders_api(db, gateway.clone());
    let order = r#"{"serviceId": "svc-itr", "serviceName": "ITR", "amount": 1180, "CGST": 90, "SGST": 90}"#;
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", order, configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["amount"], 118_000);
    assert_eq!(gateway.orders()[0].amount, 118_000);
}

#[actix_web::test]
async fn create_order_huge_amounts() {
    let _ = env_logger::try_init().ok();
    let gateway = MockGateway::new();
    let api = orders_api(MockLifecycleDb::new(), gateway.clone());
    let order = r#"{"serviceId": "s", "serviceName": "n", "amount": 9e16, "servicePrice": 9e16, "cgstAmount": 9e16}"#;
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", order, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["success"], false);
    assert!(gateway.orders().is_empty());
}

#[actix_web::test]
async fn create_order_unknown_customer() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_customer().returning(|_| Ok(None));
    let gateway = MockGateway::new();
    let api = orders_api(db, gateway.clone());
    let (status, body) = post_request(&token_for("ghost"), "/create-order", ITR_ORDER, configure_routes(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["message"], "The data was not found. Customer not found");
    assert!(gateway.orders().is_empty());
}

#[actix_web::test]
async fn create_order_gateway_down() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_customer().returning(|id| Ok(Some(customer(id.as_str()))));
    let gateway = MockGateway::new();
    gateway.fail_next(1);
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", ITR_ORDER, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "The payment gateway is unavailable. Please try again later.");
}

#[actix_web::test]
async fn create_order_malformed_json() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let (status, body) = post_request(&token_for("cust-1"), "/create-order", "{not json", configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn create_order_needs_a_token() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let (status, _) = post_request("", "/create-order", ITR_ORDER, configure_routes(api)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

//--------------------------------------     verify-payment    ---------------------------------------------------------

#[actix_web::test]
async fn verify_payment() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id()
        .times(1)
        .returning(|id| Ok(Some(pending_order(1, "cust-1", id.as_str(), 3))));
    db.expect_fetch_service().returning(|id| {
        Ok(Some(Service { id: id.clone(), name: "ITR Filing".into(), processing_days: Some("7".into()) }))
    });
    db.expect_mark_order_paid()
        .withf(|id, update| {
            id.as_str() == "order_GW1" && update.payment_id.as_str() == "pay_1" && update.due_date.is_some()
        })
        .times(1)
        .returning(|_, _| Ok(Some(paid(1, "order_GW1", "pay_1"))));
    let gateway = MockGateway::new();
    let body = verify_body(&gateway, "order_GW1", "pay_1");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        json!({ "success": true, "message": "Payment verified successfully", "orderId": "order_GW1" })
    );
}

#[actix_web::test]
async fn verify_payment_with_gateway_field_names() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id().returning(|id| Ok(Some(pending_order(1, "cust-1", id.as_str(), 3))));
    db.expect_fetch_service().returning(|_| Ok(None));
    db.expect_mark_order_paid()
        .withf(|_, update| update.due_date.is_none())
        .times(1)
        .returning(|_, _| Ok(Some(paid(1, "order_GW1", "pay_1"))));
    let gateway = MockGateway::new();
    let signature = gateway.sign(&GatewayOrderId::new("order_GW1"), "pay_1");
    let body = json!({
        "razorpay_order_id": "order_GW1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": signature,
    })
    .to_string();
    let api = orders_api(db, gateway);
    let (status, _) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn verify_payment_bad_signature() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id()
        .times(1)
        .returning(|id| Ok(Some(pending_order(1, "cust-1", id.as_str(), 3))));
    db.expect_mark_order_failed().withf(|id| id.as_str() == "order_GW1").times(1).returning(|id| {
        let mut order = pending_order(1, "cust-1", id.as_str(), 3);
        order.payment_status = PaymentStatusType::Failed;
        Ok(Some(order))
    });
    let gateway = MockGateway::new();
    let body = forged_body(&gateway, "order_GW1", "pay_1");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json(&body),
        json!({ "success": false, "message": "Invalid payment signature", "orderId": "order_GW1" })
    );
}

#[actix_web::test]
async fn bad_signature_for_another_customers_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id()
        .times(1)
        .returning(|id| Ok(Some(pending_order(1, "cust-1", id.as_str(), 3))));
    // No expect_mark_order_failed: the mock panics if the order is touched
    let gateway = MockGateway::new();
    let body = forged_body(&gateway, "order_GW1", "pay_1");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-2"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["success"], false);
}

#[actix_web::test]
async fn repeated_callback_is_accepted_without_writing() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id().returning(|id| Ok(Some(paid(1, id.as_str(), "pay_1"))));
    let gateway = MockGateway::new();
    let body = verify_body(&gateway, "order_GW1", "pay_1");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["success"], true);
}

#[actix_web::test]
async fn conflicting_callback() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id().returning(|id| Ok(Some(paid(1, id.as_str(), "pay_1"))));
    let gateway = MockGateway::new();
    let body = verify_body(&gateway, "order_GW1", "pay_2");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json(&body)["success"], false);
}

#[actix_web::test]
async fn verify_payment_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_gateway_order_id().returning(|_| Ok(None));
    let gateway = MockGateway::new();
    let body = verify_body(&gateway, "order_nope", "pay_1");
    let api = orders_api(db, gateway);
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", &body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["success"], false);
}

#[actix_web::test]
async fn verify_payment_missing_fields() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let body = r#"{"gatewayOrderId": "order_GW1"}"#;
    let (status, body) = post_request(&token_for("cust-1"), "/verify-payment", body, configure_routes(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["missing"], json!(["gatewayPaymentId", "signature"]));
}
