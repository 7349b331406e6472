//! # Persistence Layer
//!
//! File-backed and in-memory data sources.
//!
//! ## Source Traits (Ports)
//!
//! - [`TransactionSource`]: transaction dataset for the systemic engine
//!
//! ## Implementations
//!
//! - [`JsonFileTransactionSource`], [`InMemoryTransactionSource`]: transactions
//! - [`JsonFileNewsSource`]: headlines for the sentiment producer
//! - [`JsonFileCreditFeatureSource`]: financial ratios for the credit producer
//! - [`PrecomputedSignals`]: signals replayed into fusion

pub mod credit_source;
pub mod json_file;
pub mod news_source;
pub mod signal_source;
pub mod traits;
pub mod transaction_source;

pub use credit_source::JsonFileCreditFeatureSource;
pub use news_source::JsonFileNewsSource;
pub use signal_source::{PrecomputedSignalProducer, PrecomputedSignals};
pub use traits::TransactionSource;
pub use transaction_source::{InMemoryTransactionSource, JsonFileTransactionSource};
