use fsp_common::Inr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    db_types::{GatewayOrderId, GatewayPaymentId, Order, OrderId, ServiceId},
    fsp_api::errors::OrderFlowError,
    traits::GatewayOrder,
};

/// Amounts may arrive as numbers, numeric strings, `null` or empty strings. The last two count as absent.
fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Inr>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => Inr::deserialize(v).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Takes the first alias that holds a non-zero amount.
fn first_amount(candidates: &[Option<Inr>]) -> Option<Inr> {
    candidates.iter().flatten().copied().find(|v| !v.is_zero())
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

//--------------------------------------   CreateOrderParams   ---------------------------------------------------------
/// The create-order request, exactly as the client sent it.
///
/// Clients use more than one name for several fields. [`CreateOrderParams::normalize`] resolves the aliases into a
/// single [`NormalizedOrderRequest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderParams {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub amount: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub total_amount: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub service_price: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub discount_amount: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub cgst_amount: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub sgst_amount: Option<Inr>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub igst_amount: Option<Inr>,
    #[serde(default, rename = "CGST", deserialize_with = "optional_amount")]
    pub cgst: Option<Inr>,
    #[serde(default, rename = "SGST", deserialize_with = "optional_amount")]
    pub sgst: Option<Inr>,
    #[serde(default, rename = "IGST", deserialize_with = "optional_amount")]
    pub igst: Option<Inr>,
}

impl CreateOrderParams {
    pub fn new<S: Into<String>>(service_id: S, service_name: S, amount: Inr) -> Self {
        Self {
            service_id: Some(service_id.into()),
            service_name: Some(service_name.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn with_package<S: Into<String>>(mut self, package_id: S, package_name: S) -> Self {
        self.package_id = Some(package_id.into());
        self.package_name = Some(package_name.into());
        self
    }

    pub fn with_price_breakdown(mut self, service_price: Inr, discount: Inr) -> Self {
        self.service_price = Some(service_price);
        self.discount_amount = Some(discount);
        self
    }

    pub fn with_taxes(mut self, cgst: Inr, sgst: Inr, igst: Inr) -> Self {
        self.cgst_amount = Some(cgst);
        self.sgst_amount = Some(sgst);
        self.igst_amount = Some(igst);
        self
    }

    /// Resolves the field aliases and applies the defaults.
    ///
    /// * `totalAmount` takes precedence over `amount`. A zero amount counts as missing.
    /// * `CGST`/`SGST`/`IGST` take precedence over `cgstAmount`/`sgstAmount`/`igstAmount`. Absent taxes are zero.
    /// * An absent discount is zero. An absent `servicePrice` is whatever is left of the total once the taxes are taken
    ///   off and the discount added back, so a request without a price breakdown always agrees with its own total.
    ///
    /// All missing required fields are reported together in a single [`OrderFlowError::MissingFields`]. Negative
    /// amounts, and taxes that come to more than the total, are rejected with [`OrderFlowError::InvalidRequest`].
    pub fn normalize(self) -> Result<NormalizedOrderRequest, OrderFlowError> {
        let service_id = non_blank(self.service_id);
        let service_name = non_blank(self.service_name);
        let total = first_amount(&[self.total_amount, self.amount]);
        let mut missing = Vec::new();
        if service_id.is_none() {
            missing.push("serviceId".to_string());
        }
        if service_name.is_none() {
            missing.push("serviceName".to_string());
        }
        if total.is_none() {
            missing.push("amount".to_string());
        }
        let (Some(service_id), Some(service_name), Some(total)) = (service_id, service_name, total) else {
            return Err(OrderFlowError::MissingFields(missing));
        };
        let service_price = first_amount(&[self.service_price]);
        let mut request = NormalizedOrderRequest {
            service_id: ServiceId::new(service_id),
            service_name,
            package_id: non_blank(self.package_id).unwrap_or_default(),
            package_name: non_blank(self.package_name).unwrap_or_default(),
            service_price: service_price.unwrap_or_default(),
            discount: self.discount_amount.unwrap_or_default(),
            cgst: first_amount(&[self.cgst, self.cgst_amount]).unwrap_or_default(),
            sgst: first_amount(&[self.sgst, self.sgst_amount]).unwrap_or_default(),
            igst: first_amount(&[self.igst, self.igst_amount]).unwrap_or_default(),
            total,
        };
        request.check_signs()?;
        if service_price.is_none() {
            request.service_price = request.derived_service_price()?;
        }
        Ok(request)
    }
}

fn amounts_too_large() -> OrderFlowError {
    OrderFlowError::InvalidRequest("The amounts are too large".into())
}

//--------------------------------------  NormalizedOrderRequest  ------------------------------------------------------
/// A create-order request with every alias resolved and every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrderRequest {
    pub service_id: ServiceId,
    pub service_name: String,
    pub package_id: String,
    pub package_name: String,
    pub service_price: Inr,
    pub discount: Inr,
    pub cgst: Inr,
    pub sgst: Inr,
    pub igst: Inr,
    pub total: Inr,
}

impl NormalizedOrderRequest {
    /// `service_price - discount + CGST + SGST + IGST`, or `None` if the sum overflows.
    pub fn computed_total(&self) -> Option<Inr> {
        self.service_price
            .checked_sub(self.discount)?
            .checked_add(self.cgst)?
            .checked_add(self.sgst)?
            .checked_add(self.igst)
    }

    /// `total + discount - CGST - SGST - IGST`
    fn derived_service_price(&self) -> Result<Inr, OrderFlowError> {
        let price = self
            .total
            .checked_add(self.discount)
            .and_then(|v| v.checked_sub(self.cgst))
            .and_then(|v| v.checked_sub(self.sgst))
            .and_then(|v| v.checked_sub(self.igst))
            .ok_or_else(amounts_too_large)?;
        if price.is_negative() {
            return Err(OrderFlowError::InvalidRequest(format!(
                "The taxes come to more than the total amount {}",
                self.total
            )));
        }
        Ok(price)
    }

    fn check_signs(&self) -> Result<(), OrderFlowError> {
        let fields = [
            ("amount", self.total),
            ("servicePrice", self.service_price),
            ("discountAmount", self.discount),
            ("cgstAmount", self.cgst),
            ("sgstAmount", self.sgst),
            ("igstAmount", self.igst),
        ];
        let negative = fields.iter().filter(|(_, v)| v.is_negative()).map(|(n, _)| *n).collect::<Vec<_>>();
        if negative.is_empty() {
            Ok(())
        } else {
            Err(OrderFlowError::InvalidRequest(format!("Amounts cannot be negative: {}", negative.join(", "))))
        }
    }

    /// Checks that the total agrees with the price breakdown, to within one paisa.
    pub fn check_totals(&self) -> Result<(), OrderFlowError> {
        let computed = self.computed_total().ok_or_else(amounts_too_large)?;
        let difference = computed.checked_sub(self.total).ok_or_else(amounts_too_large)?;
        if difference.paise().unsigned_abs() <= 1 {
            Ok(())
        } else {
            Err(OrderFlowError::InvalidRequest(format!(
                "The total amount {} does not match the price breakdown, which comes to {computed}",
                self.total
            )))
        }
    }
}

//--------------------------------------   CreateOrderResult   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct CreateOrderResult {
    pub gateway_order_id: GatewayOrderId,
    /// As confirmed by the gateway, in paise.
    pub amount: i64,
    pub currency: String,
    /// The gateway's public key id, needed by the client to open the payment UI.
    pub key_id: String,
    pub order: Order,
}

//--------------------------------------  VerifyPaymentParams  ---------------------------------------------------------
/// The signed payload the gateway hands back to the client after a payment attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyPaymentParams {
    #[serde(default, rename = "gatewayOrderId", alias = "razorpay_order_id")]
    pub gateway_order_id: Option<String>,
    #[serde(default, rename = "gatewayPaymentId", alias = "razorpay_payment_id")]
    pub gateway_payment_id: Option<String>,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: Option<String>,
}

impl VerifyPaymentParams {
    pub fn new(
        gateway_order_id: impl Into<String>,
        gateway_payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            gateway_order_id: Some(gateway_order_id.into()),
            gateway_payment_id: Some(gateway_payment_id.into()),
            signature: Some(signature.into()),
        }
    }

    pub(crate) fn validate(self) -> Result<(GatewayOrderId, GatewayPaymentId, String), OrderFlowError> {
        let order_id = non_blank(self.gateway_order_id);
        let payment_id = non_blank(self.gateway_payment_id);
        let signature = non_blank(self.signature);
        match (order_id, payment_id, signature) {
            (Some(o), Some(p), Some(s)) => Ok((GatewayOrderId::new(o), GatewayPaymentId::new(p), s)),
            (o, p, s) => {
                let fields = [
                    ("gatewayOrderId", o.is_none()),
                    ("gatewayPaymentId", p.is_none()),
                    ("signature", s.is_none()),
                ];
                let missing = fields
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then(|| name.to_string()))
                    .collect();
                Err(OrderFlowError::MissingFields(missing))
            },
        }
    }
}

//--------------------------------------  PaymentVerification  ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct PaymentVerification {
    /// True if the callback signature was valid.
    pub verified: bool,
    pub gateway_order_id: GatewayOrderId,
    /// The order after the update, if there is one. A mismatched callback for an unknown order, or for an order that
    /// has already left `Pending`, leaves this empty.
    pub order: Option<Order>,
}

//-------------------------------------- ReconciliationReport  ---------------------------------------------------------
/// What the gateway knows about a receipt label, compared with what we have stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub receipt: OrderId,
    pub local_order: Option<Order>,
    /// Gateway orders carrying this receipt that have no local record.
    pub orphans: Vec<GatewayOrder>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
    }
}
