use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request body for `POST /orders`. `amount` is in the currency's minor unit (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRazorpayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    /// Razorpay returns an empty *array* rather than an empty object when there are no notes.
    #[serde(default)]
    pub notes: serde_json::Value,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrderCollection {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<RazorpayOrder>,
}
