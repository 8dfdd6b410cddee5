//! A small REST client for the subset of the Razorpay Orders API used by the payment server.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder, RazorpayOrderCollection};
pub use error::RazorpayApiError;
