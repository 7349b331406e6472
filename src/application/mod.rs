//! # Application Layer
//!
//! Engines that orchestrate domain services and infrastructure.
//!
//! - [`services`]: per-domain risk producers, fusion and batch analysis
//! - [`error`]: application error taxonomy

pub mod error;
pub mod services;
