//! # layerkv Storage
//!
//! Key-value containers for layerkv.
//!
//! This crate provides the lowest-level storage abstraction for layerkv.
//! Containers are **plain string maps** - they know nothing about
//! transactions, nesting, or locking.
//!
//! ## Design Principles
//!
//! - The committed keyspace is a simple string-to-string map
//! - A transaction level is a map of tagged slots, so a deletion is
//!   recorded as a fact rather than an absence
//! - Both are addressed through the [`KeySpace`] trait
//! - Must be `Send + Sync` so callers can guard them with their own locks
//!
//! ## Available Containers
//!
//! - [`KeyValueMap`] - The committed base keyspace
//! - [`WorkingSet`] - One transaction level's overlay of [`Slot`]s
//!
//! ## Example
//!
//! ```rust
//! use layerkv_storage::{KeySpace, KeyValueMap};
//!
//! let mut base = KeyValueMap::new();
//! base.write("a".into(), "hello".into());
//!
//! let mut overlay = base.snapshot();
//! assert!(overlay.delete("a"));
//! assert_eq!(overlay.read("a"), None);
//!
//! for (key, slot) in overlay.into_slots() {
//!     base.apply(key, slot);
//! }
//! assert_eq!(base.read("a"), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod keyspace;
mod map;
mod working_set;

pub use keyspace::KeySpace;
pub use map::KeyValueMap;
pub use working_set::{Slot, WorkingSet};
