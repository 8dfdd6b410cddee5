use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc,
    Mutex,
};

use fsp_common::Secret;

use crate::{
    db_types::GatewayOrderId,
    helpers::expected_signature,
    traits::{GatewayError, GatewayOrder, NewGatewayOrder, PaymentGateway},
};

pub const MOCK_KEY_ID: &str = "rzp_test_mockKey";
pub const MOCK_KEY_SECRET: &str = "mock-gateway-secret";

/// An in-memory payment gateway. It hands out sequential order ids and remembers every order it created, so that
/// reconciliation can be exercised without network access.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    orders: Arc<Mutex<Vec<GatewayOrder>>>,
    counter: Arc<AtomicU64>,
    failures_remaining: Arc<AtomicU32>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` calls to `create_order` are rejected.
    pub fn fail_next(&self, n: u32) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    /// Orders the gateway has created, in creation order.
    pub fn orders(&self) -> Vec<GatewayOrder> {
        self.orders.lock().expect("Gateway lock poisoned").clone()
    }

    /// Signs the callback the way the real gateway would.
    pub fn sign(&self, order_id: &GatewayOrderId, payment_id: &str) -> String {
        expected_signature(MOCK_KEY_SECRET, order_id.as_str(), payment_id).expect("HMAC accepts any key length")
    }
}

impl PaymentGateway for MockGateway {
    fn key_id(&self) -> String {
        MOCK_KEY_ID.to_string()
    }

    fn signing_secret(&self) -> Secret<String> {
        Secret::new(MOCK_KEY_SECRET.to_string())
    }

    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(GatewayError::Rejected { status: 503, message: "The mock gateway is unavailable".into() });
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let created = GatewayOrder {
            id: GatewayOrderId::new(format!("order_Mock{n:010}")),
            amount: order.amount,
            currency: order.currency,
            receipt: Some(order.receipt),
        };
        self.orders.lock().expect("Gateway lock poisoned").push(created.clone());
        Ok(created)
    }

    async fn fetch_orders_by_receipt(&self, receipt: &str) -> Result<Vec<GatewayOrder>, GatewayError> {
        let orders = self.orders.lock().expect("Gateway lock poisoned");
        Ok(orders.iter().filter(|o| o.receipt.as_deref() == Some(receipt)).cloned().collect())
    }
}
