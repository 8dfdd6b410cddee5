//! # Payment callback signatures
//!
//! When a customer completes a payment, the gateway redirects back with the gateway order id, the gateway payment id
//! and a signature. The signature is a lower-case hex HMAC-SHA256 of the message
//!
//! ```text
//!    {gateway_order_id}|{gateway_payment_id}
//! ```
//!
//! keyed with the merchant's key secret. Recomputing the HMAC and comparing it with the supplied value proves that the
//! callback came from the gateway and was not tampered with.
//!
//! The comparison runs in constant time, so the verifier does not leak how many leading bytes of a forged signature
//! were correct.
use hmac::{Hmac, Mac};
use log::{error, trace};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
#[error("Could not initialise the signature MAC: {0}")]
pub struct SignatureError(String);

fn keyed_mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SignatureError(e.to_string()))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// The signature the gateway should have sent for this order/payment pair, as lower-case hex.
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
    let mac = keyed_mac(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Returns true if `signature` is the valid hex HMAC for the order/payment pair. Signatures that are not valid hex are
/// simply a mismatch.
pub fn verify_payment_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let supplied = match hex::decode(signature.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            trace!("🔐️ Payment signature for {order_id} is not valid hex: {e}");
            return false;
        },
    };
    match keyed_mac(secret, order_id, payment_id) {
        Ok(mac) => mac.verify_slice(&supplied).is_ok(),
        Err(e) => {
            error!("🔐️ {e}");
            false
        },
    }
}
