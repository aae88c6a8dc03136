//! Sled 持久化

mod kv_store;

pub use kv_store::SledKeyValueStore;
