//! Memory Layer - In-Memory State Management
//!
//! 内存键值存储，用于测试和不需要持久化的场景

mod kv_store;

pub use kv_store::InMemoryKeyValueStore;
