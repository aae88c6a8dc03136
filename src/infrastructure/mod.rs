//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod bootstrap;
pub mod memory;
pub mod persistence;

pub use bootstrap::{assemble, build_runtime, open_store, BootstrapError, ChatRuntime};
pub use memory::InMemoryKeyValueStore;
pub use persistence::{KvAudioCache, KvFileLedger, KvSessionManager, SledKeyValueStore, TranscriptStore};
