use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{NewRazorpayOrder, RazorpayOrder, RazorpayOrderCollection},
    RazorpayApiError,
};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        if config.key_secret.is_empty() {
            warn!("💳️ The Razorpay key secret is empty. Gateway calls and signature checks will fail.");
        }
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("💳️ Sending REST query: {method} {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Creates a new order on Razorpay. The order id in the response is what the checkout form needs.
    pub async fn create_order(&self, order: NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError> {
        debug!("💳️ Creating order for receipt {} ({} {})", order.receipt, order.amount, order.currency);
        let result = self.rest_query::<RazorpayOrder, _>(Method::POST, "/orders", &[], Some(order)).await?;
        info!("💳️ Created Razorpay order {}", result.id);
        Ok(result)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder, RazorpayApiError> {
        let path = format!("/orders/{order_id}");
        debug!("💳️ Fetching order {order_id}");
        self.rest_query::<RazorpayOrder, ()>(Method::GET, &path, &[], None).await
    }

    /// Fetches all orders that were created with the given receipt label.
    pub async fn fetch_orders_by_receipt(&self, receipt: &str) -> Result<Vec<RazorpayOrder>, RazorpayApiError> {
        debug!("💳️ Fetching orders with receipt {receipt}");
        let query = [("receipt", receipt)];
        let result = self.rest_query::<RazorpayOrderCollection, ()>(Method::GET, "/orders", &query, None).await?;
        trace!("💳️ {} orders found for receipt {receipt}", result.count);
        Ok(result.items)
    }
}
