//! # FinShelter payment server
//! This crate hosts the HTTP server for the FinShelter order and payment lifecycle. It is responsible for:
//! * Authenticating customers from their bearer tokens.
//! * Creating Razorpay orders when a customer buys a service, and storing the matching local order.
//! * Verifying the signed payment callbacks that the client relays after checkout.
//! * Serving order details and order history to the customer who owns them.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /create-order`: Opens a payment attempt for a service purchase.
//! * `POST /verify-payment`: Verifies a payment callback and marks the order as paid (or failed).
//! * `GET /order/{order_id}`: Fetches one of the caller's orders, by internal or gateway order id.
//! * `GET /my-orders`: Lists the caller's orders, newest first.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;

pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
