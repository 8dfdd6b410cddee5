use actix_web::http::StatusCode;
use fsp_engine::test_utils::mock_gateway::MockGateway;
use log::debug;

use super::{
    helpers::{configure_routes, get_request, json, orders_api, pending_order, token_for},
    mocks::MockLifecycleDb,
};

#[actix_web::test]
async fn health_needs_no_token() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let (status, body) = get_request("", "/health", configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn fetch_my_orders_no_token() {
    let _ = env_logger::try_init().ok();
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let (status, body) = get_request("", "/my-orders", configure_routes(api)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication Error. No bearer token was provided.");
}

#[actix_web::test]
async fn fetch_my_orders_invalid_sig() {
    let _ = env_logger::try_init().ok();
    let mut token = token_for("cust-1");
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    debug!("Calling /my-orders with invalid token {token}");
    let api = orders_api(MockLifecycleDb::new(), MockGateway::new());
    let (status, body) = get_request(&token, "/my-orders", configure_routes(api)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["success"], false);
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_orders_for_customer()
        .withf(|id| id.as_str() == "cust-1")
        .times(1)
        .returning(|_| {
            Ok(vec![pending_order(2, "cust-1", "order_GW2", 5), pending_order(1, "cust-1", "order_GW1", 3)])
        });
    let api = orders_api(db, MockGateway::new());
    let (status, body) = get_request(&token_for("cust-1"), "/my-orders", configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["success"], true);
    let orders = body["orders"].as_array().expect("orders should be an array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["gatewayOrderId"], "order_GW2");
    assert_eq!(orders[1]["gatewayOrderId"], "order_GW1");
    assert_eq!(orders[0]["totalAmount"], 1180);
    assert_eq!(orders[0]["cgstAmount"], 90);
    assert_eq!(orders[0]["paymentStatus"], "Pending");
    assert_eq!(orders[0]["orderStatus"], "Pending");
    assert_eq!(orders[0]["customerName"], "Asha Rao");
}

#[actix_web::test]
async fn fetch_my_orders_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_orders_for_customer().returning(|_| Ok(vec![]));
    let api = orders_api(db, MockGateway::new());
    let (status, body) = get_request(&token_for("cust-9"), "/my-orders", configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({ "success": true, "orders": [] }));
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_id_or_gateway_id()
        .withf(|id| id.to_string() == "order_GW1")
        .times(1)
        .returning(|_| Ok(Some(pending_order(1, "cust-1", "order_GW1", 3))));
    let api = orders_api(db, MockGateway::new());
    let (status, body) = get_request(&token_for("cust-1"), "/order/order_GW1", configure_routes(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["id"], 1);
    assert_eq!(body["order"]["gatewayOrderId"], "order_GW1");
    assert_eq!(body["order"]["serviceName"], "ITR Filing");
}

#[actix_web::test]
async fn fetch_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_id_or_gateway_id().returning(|_| Ok(None));
    let api = orders_api(db, MockGateway::new());
    let (status, body) = get_request(&token_for("cust-1"), "/order/order_nope", configure_routes(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body = json(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "The data was not found. Order not found");
}

#[actix_web::test]
async fn another_customers_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockLifecycleDb::new();
    db.expect_fetch_order_by_id_or_gateway_id().returning(|_| Ok(Some(pending_order(1, "cust-1", "order_GW1", 3))));
    let api = orders_api(db, MockGateway::new());
    let (status, body) = get_request(&token_for("cust-2"), "/order/order_GW1", configure_routes(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["success"], false);
}
