//! # layerkv Testkit
//!
//! Test utilities for layerkv.
//!
//! This crate provides:
//! - Test fixtures and scripted scenarios
//! - Property-based test generators using proptest
//! - A reference model for differential testing
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use layerkv_testkit::prelude::*;
//!
//! let store = seeded_store(&[("a", "hello")]);
//! run_steps(&store, &nested_scenario()[1..]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
pub use stress::*;
