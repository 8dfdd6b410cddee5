//! Adapters between third-party clients and the engine's backend contracts.
pub mod razorpay;
