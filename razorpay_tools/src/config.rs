use fsp_common::Secret;
use log::*;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    /// Base url of the Orders API, without a trailing slash.
    pub api_url: String,
    /// The public key id. This is handed to browser clients so they can open the checkout form.
    pub key_id: String,
    /// The key secret. Used for basic auth against the API and for signing payment callbacks.
    pub key_secret: Secret<String>,
}

impl RazorpayConfig {
    pub fn new<S: Into<String>>(key_id: S, key_secret: Secret<String>) -> Self {
        Self { api_url: DEFAULT_RAZORPAY_API_URL.to_string(), key_id: key_id.into(), key_secret }
    }

    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("FSP_RAZORPAY_API_URL").unwrap_or_else(|_| {
            info!("FSP_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL}");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let key_id = std::env::var("FSP_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("FSP_RAZORPAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_00000000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("FSP_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("FSP_RAZORPAY_KEY_SECRET not set, using (probably useless) default");
            String::default()
        }));
        Self { api_url: api_url.trim_end_matches('/').to_string(), key_id, key_secret }
    }
}
