//! SQLite backend for the order lifecycle.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
