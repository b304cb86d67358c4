//! Storage backends for discovery.
//!
//! [`ObjectStoreStorage`] adapts any `object_store` backend (local filesystem,
//! S3, in-memory) to the [`Storage`](pv_traits::Storage) trait, and
//! [`storage_from_url`] builds one from a root URL.

mod factory;
mod store;

pub use factory::{StorageOptions, parse_root_url, storage_from_url};
pub use store::ObjectStoreStorage;
