//! Shared cache layer for executive order tracking
//!
//! This crate owns the on-disk cache of executive orders: one JSON file per
//! order, keyed by its identifier. Used by both eo-fetch (which writes the
//! cache) and eo-web (which reads it).

pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use cache::{list_orders_in, load_order_in, save_order_in, sort_rows};
pub use error::CacheError;
pub use types::{order_identifier, ExecutiveOrder, Metadata, OrderRow, SortKey, SortOrder};
