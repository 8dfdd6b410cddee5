use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fsp_common::{Inr, INR_CURRENCY_CODE};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The payment method tag stored with every order created through the gateway flow.
pub const GATEWAY_PAYMENT_METHOD: &str = "Razorpay";

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new<S: Into<String>>(s: S) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

//--------------------------------------      Identifiers      ---------------------------------------------------------
string_id!(
    /// The internal order id. It doubles as the receipt label sent to the payment gateway.
    OrderId
);
string_id!(
    /// The order id assigned by the payment gateway for a single payment attempt.
    GatewayOrderId
);
string_id!(
    /// The payment id assigned by the payment gateway once the customer has paid.
    GatewayPaymentId
);
string_id!(CustomerId);
string_id!(ServiceId);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created, but fulfilment has not started, since the order is unpaid.
    Pending,
    /// The order has been paid and is being worked on.
    InProcess,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::InProcess => write!(f, "InProcess"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "InProcess" | "In Process" => Ok(Self::InProcess),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------  PaymentStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatusType {
    /// A gateway order exists, but no verified payment has been received.
    Pending,
    /// The payment callback carried a valid signature.
    Paid,
    /// The payment callback carried an invalid signature.
    Failed,
}

impl PaymentStatusType {
    /// Payment status only ever moves forward: `Pending -> Paid` or `Pending -> Failed`.
    pub fn can_transition_to(&self, new_status: PaymentStatusType) -> bool {
        matches!((self, new_status), (Self::Pending, Self::Paid | Self::Failed))
    }
}

impl Display for PaymentStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatusType::Pending => write!(f, "Pending"),
            PaymentStatusType::Paid => write!(f, "Paid"),
            PaymentStatusType::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for PaymentStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatusType::Pending
        })
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
/// An order record.
///
/// The customer name, email and mobile number are a snapshot taken when the order was created. They are never
/// refreshed from the customer record, so that the order shows exactly who was billed.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub gateway_order_id: GatewayOrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub service_id: ServiceId,
    pub service_name: String,
    pub package_id: String,
    pub package_name: String,
    pub service_price: Inr,
    pub discount_amount: Inr,
    pub cgst_amount: Inr,
    pub sgst_amount: Inr,
    pub igst_amount: Inr,
    pub total_amount: Inr,
    pub currency: String,
    pub order_status: OrderStatusType,
    pub payment_status: PaymentStatusType,
    pub payment_method: String,
    pub gateway_payment_id: Option<GatewayPaymentId>,
    pub expected_completion_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// `service_price - discount + CGST + SGST + IGST`, or `None` if the sum overflows.
    pub fn computed_total(&self) -> Option<Inr> {
        self.service_price
            .checked_sub(self.discount_amount)?
            .checked_add(self.cgst_amount)?
            .checked_add(self.sgst_amount)?
            .checked_add(self.igst_amount)
    }
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub gateway_order_id: GatewayOrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_mobile: String,
    pub service_id: ServiceId,
    pub service_name: String,
    pub package_id: String,
    pub package_name: String,
    pub service_price: Inr,
    pub discount_amount: Inr,
    pub cgst_amount: Inr,
    pub sgst_amount: Inr,
    pub igst_amount: Inr,
    pub total_amount: Inr,
    pub currency: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Creates a new order for the given customer with no taxes, discount or package. Use the `with_*` methods to
    /// fill in the rest.
    pub fn new(
        order_id: OrderId,
        gateway_order_id: GatewayOrderId,
        customer: &Customer,
        service_id: ServiceId,
        service_name: String,
        total_amount: Inr,
    ) -> Self {
        Self {
            order_id,
            gateway_order_id,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            customer_mobile: customer.mobile.clone().unwrap_or_default(),
            service_id,
            service_name,
            package_id: String::default(),
            package_name: String::default(),
            service_price: total_amount,
            discount_amount: Inr::default(),
            cgst_amount: Inr::default(),
            sgst_amount: Inr::default(),
            igst_amount: Inr::default(),
            total_amount,
            currency: INR_CURRENCY_CODE.to_string(),
            payment_method: GATEWAY_PAYMENT_METHOD.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_package<S: Into<String>>(mut self, package_id: S, package_name: S) -> Self {
        self.package_id = package_id.into();
        self.package_name = package_name.into();
        self
    }

    pub fn with_price_breakdown(mut self, service_price: Inr, discount: Inr) -> Self {
        self.service_price = service_price;
        self.discount_amount = discount;
        self
    }

    pub fn with_taxes(mut self, cgst: Inr, sgst: Inr, igst: Inr) -> Self {
        self.cgst_amount = cgst;
        self.sgst_amount = sgst;
        self.igst_amount = igst;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

//--------------------------------------  Customer & Service   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Free-form in the catalog. Only meaningful when it holds a non-negative whole number of days.
    pub processing_days: Option<String>,
}

impl Service {
    pub fn processing_days(&self) -> Option<i64> {
        self.processing_days.as_deref().and_then(|d| d.trim().parse::<i64>().ok()).filter(|d| *d >= 0)
    }
}
