pub mod config_service;
pub mod file_kv;
pub mod memory_kv;
pub mod paths;
pub mod probe;

pub use crate::config_service::ConfigService;
pub use crate::file_kv::FileKeyValueStore;
pub use crate::memory_kv::MemoryKeyValueStore;
pub use crate::paths::ZwenPaths;
pub use crate::probe::probe_attachment;
