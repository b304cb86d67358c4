//! Integration tests for pv-discovery.
//!
//! Discovery runs against an in-memory mock tree that counts listing calls,
//! and against real `object_store` backends (in-memory and a temporary local
//! directory).

mod common;
mod discovery_test;
mod storage_test;
