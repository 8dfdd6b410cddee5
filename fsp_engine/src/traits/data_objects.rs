use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{GatewayOrderId, GatewayPaymentId};

/// A request to the payment gateway to open a new payment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGatewayOrder {
    /// Amount in the currency's minor unit (paise for INR).
    pub amount: i64,
    pub currency: String,
    /// A label unique to this order attempt. Used to find orphaned remote orders during reconciliation.
    pub receipt: String,
    /// Free-form metadata attached to the remote order for auditing.
    pub notes: HashMap<String, String>,
}

/// The payment gateway's view of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: GatewayOrderId,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
}

/// The fields written when a payment is verified.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUpdate {
    pub payment_id: GatewayPaymentId,
    /// Mirrored into both `expected_completion_date` and `due_date`.
    pub due_date: Option<DateTime<Utc>>,
}
