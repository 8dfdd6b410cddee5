use fsp_common::Secret;
use thiserror::Error;

use crate::traits::data_objects::{GatewayOrder, NewGatewayOrder};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not reach the payment gateway: {0}")]
    Request(String),
    #[error("The payment gateway rejected the request. Status {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("The payment gateway sent a response we could not understand: {0}")]
    InvalidResponse(String),
}

/// The contract of the third-party payment gateway.
///
/// Implementations wrap the gateway SDK or REST client. The key secret is used for HMAC signing of payment callbacks,
/// so it must be the same secret the gateway uses.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The public key identifier. Safe to hand to clients.
    fn key_id(&self) -> String;

    /// The shared secret used to sign payment callbacks.
    fn signing_secret(&self) -> Secret<String>;

    /// Requests a new remote order for `order.amount` (in minor units).
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError>;

    /// Returns every remote order created with the given receipt label.
    async fn fetch_orders_by_receipt(&self, receipt: &str) -> Result<Vec<GatewayOrder>, GatewayError>;
}
