//! # Infrastructure Layer
//!
//! Adapters between the engines and the outside world.
//!
//! - [`config`]: layered configuration (file + environment)
//! - [`logging`]: `tracing` subscriber setup
//! - [`persistence`]: file-backed and in-memory data sources
//! - [`models`]: learned model loaders

pub mod config;
pub mod logging;
pub mod models;
pub mod persistence;
