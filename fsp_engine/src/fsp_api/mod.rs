//! # Order lifecycle public API
//!
//! The `fsp_api` module exposes the programmatic API for the order lifecycle.
//!
//! * [`order_flow_api`] creates orders against the payment gateway, verifies payment callbacks and serves order
//!   queries.
//! * [`order_objects`] holds the request and result types of the API, including the input normalization step.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements
//! [`crate::traits::PaymentLifecycleDatabase`] and a [`crate::traits::PaymentGateway`].
//!
//! ```rust,ignore
//! use fsp_engine::{OrderFlowApi, OrderFlowConfig, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = OrderFlowApi::new(db, gateway, OrderFlowConfig::default());
//! let orders = api.orders_for_customer(&customer_id).await?;
//! ```
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
