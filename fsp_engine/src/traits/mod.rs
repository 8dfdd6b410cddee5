//! # Backend contracts
//!
//! This module defines the behaviour that backends must expose in order to be driven by the order lifecycle API.
//!
//! * [`OrderManagement`] is the order repository. It persists and retrieves order records, and applies the
//!   conditional payment status transitions.
//! * [`CatalogLookup`] provides read-only access to the customer and service records owned by other subsystems.
//! * [`PaymentGateway`] is the boundary to the third-party payment gateway. It is not a database, but is specified
//!   the same way so that the lifecycle API can be exercised against fakes.
//! * [`PaymentLifecycleDatabase`] is implemented for any backend that is both an order repository and a catalog.
mod catalog_lookup;
mod order_management;
mod payment_gateway;

mod data_objects;

pub use catalog_lookup::{CatalogError, CatalogLookup};
pub use data_objects::{GatewayOrder, NewGatewayOrder, PaymentUpdate};
pub use order_management::{OrderManagement, OrderManagementError};
pub use payment_gateway::{GatewayError, PaymentGateway};

/// Everything the order lifecycle needs from its storage backend.
pub trait PaymentLifecycleDatabase: OrderManagement + CatalogLookup {}

impl<T> PaymentLifecycleDatabase for T where T: OrderManagement + CatalogLookup {}
