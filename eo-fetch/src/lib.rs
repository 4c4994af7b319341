//! Executive order fetcher
//!
//! Pulls executive orders from the Federal Register API and writes each one
//! into the shared flat-file cache.

pub mod batch;
pub mod registry;

pub use batch::{display_executive_orders, save_executive_order};
pub use registry::{Record, RegistryClient, PER_PAGE};
