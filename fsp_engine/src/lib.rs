//! FinShelter Payment Engine
//!
//! This library contains the core logic of the order and payment lifecycle for the FinShelter tax-filing service. It
//! is independent of the HTTP layer and of any particular payment gateway SDK.
//!
//! The library is divided into these sections:
//! 1. Data types ([`mod@db_types`]). Orders, customers and services, and their identifiers and status enums.
//! 2. Backend contracts ([`mod@traits`]). The order repository, the catalog lookups and the payment gateway boundary.
//!    Specific backends need to implement these traits in order to drive the lifecycle.
//! 3. A SQLite backend ([`SqliteDatabase`]). You should never need to access the database directly. Instead, use the
//!    public API provided by the engine.
//! 4. The payment engine public API ([`OrderFlowApi`]). It creates gateway orders, verifies payment callbacks, projects
//!    due dates and serves order queries.
//!
//! [`helpers`] holds the payment callback signature verifier.
pub mod db_types;
pub mod helpers;
pub mod traits;

mod fsp_api;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use fsp_api::{
    errors::OrderFlowError,
    order_flow_api::{OrderFlowApi, OrderFlowConfig, DEFAULT_ORDER_WRITE_ATTEMPTS},
    order_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};
pub use traits::{CatalogLookup, OrderManagement, PaymentGateway, PaymentLifecycleDatabase};
