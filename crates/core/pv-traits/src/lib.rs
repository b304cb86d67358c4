//! Core traits for partview.
//!
//! This crate defines the abstractions the discovery engine consumes:
//! - [`Storage`] - Trait for storage backends (object stores, local filesystem, mocks)

pub mod storage;

pub use storage::*;
