use fsp_common::Secret;
use fsp_engine::{
    db_types::GatewayOrderId,
    traits::{GatewayError, GatewayOrder, NewGatewayOrder, PaymentGateway},
};
use log::*;
use razorpay_tools::{NewRazorpayOrder, RazorpayApi, RazorpayApiError, RazorpayConfig, RazorpayOrder};

/// [`PaymentGateway`] backed by the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &RazorpayApi {
        &self.api
    }
}

fn to_gateway_error(e: RazorpayApiError) -> GatewayError {
    match e {
        RazorpayApiError::QueryError { status, message } => GatewayError::Rejected { status, message },
        RazorpayApiError::JsonError(s) | RazorpayApiError::RestResponseError(s) => GatewayError::InvalidResponse(s),
        RazorpayApiError::Initialization(s) | RazorpayApiError::RestRequestError(s) => GatewayError::Request(s),
    }
}

fn to_gateway_order(order: RazorpayOrder) -> GatewayOrder {
    GatewayOrder {
        id: GatewayOrderId::new(order.id),
        amount: order.amount,
        currency: order.currency,
        receipt: order.receipt,
    }
}

impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> String {
        self.api.config().key_id.clone()
    }

    fn signing_secret(&self) -> Secret<String> {
        self.api.config().key_secret.clone()
    }

    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        let request = NewRazorpayOrder {
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            notes: order.notes,
        };
        let created = self.api.create_order(request).await.map_err(|e| {
            warn!("💳️ Razorpay order creation failed. {e}");
            to_gateway_error(e)
        })?;
        debug!("💳️ Razorpay order {} created for receipt {:?}", created.id, created.receipt);
        Ok(to_gateway_order(created))
    }

    async fn fetch_orders_by_receipt(&self, receipt: &str) -> Result<Vec<GatewayOrder>, GatewayError> {
        let orders = self.api.fetch_orders_by_receipt(receipt).await.map_err(to_gateway_error)?;
        Ok(orders.into_iter().map(to_gateway_order).collect())
    }
}
