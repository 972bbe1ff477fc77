//! Rule table storage and persistence.
//!
//! Provides the thread-safe [`RuleStore`] that holds the latest endpoint
//! reported for every rule and keeps it in sync with a JSON data file.

pub mod error;
pub mod persistence;
pub mod rule_store;
pub mod types;

pub use error::StoreError;
pub use rule_store::RuleStore;
pub use types::*;
