//! foodshare-core: the query engine behind the food-donation dashboard.
//!
//! A `Dataset` is loaded once from a `DataSource`, then the thirteen
//! dashboard questions run against it under a per-request `FilterContext`.

pub mod claim_queries;
pub mod config;
pub mod dataset;
pub mod directory_queries;
pub mod engine;
pub mod error;
pub mod filter;
pub mod frame;
pub mod listing_queries;
pub mod query;
pub mod record;
pub mod source;
pub mod store;
pub mod table;
pub mod types;
