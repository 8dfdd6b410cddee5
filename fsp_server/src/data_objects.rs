use fsp_engine::{
    db_types::{GatewayOrderId, Order},
    order_objects::{CreateOrderResult, PaymentVerification},
};
use serde::{Deserialize, Serialize};

//--------------------------------------   CreateOrderResponse  --------------------------------------------------------
/// The gateway order summary a client needs to open the payment UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderSummary {
    pub id: GatewayOrderId,
    /// In paise.
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    /// The gateway order id.
    pub order_id: GatewayOrderId,
    pub order: GatewayOrderSummary,
    /// In paise.
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        let order = GatewayOrderSummary {
            id: result.gateway_order_id.clone(),
            amount: result.amount,
            currency: result.currency.clone(),
        };
        Self {
            success: true,
            order_id: result.gateway_order_id,
            order,
            amount: result.amount,
            currency: result.currency,
            key_id: result.key_id,
        }
    }
}

//--------------------------------------  VerifyPaymentResponse  -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    /// The gateway order id.
    pub order_id: GatewayOrderId,
}

impl From<PaymentVerification> for VerifyPaymentResponse {
    fn from(v: PaymentVerification) -> Self {
        let message = if v.verified { "Payment verified successfully" } else { "Invalid payment signature" };
        Self { success: v.verified, message: message.to_string(), order_id: v.gateway_order_id }
    }
}

//--------------------------------------     Order queries      --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self { success: true, order }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

impl From<Vec<Order>> for OrdersResponse {
    fn from(orders: Vec<Order>) -> Self {
        Self { success: true, orders }
    }
}
