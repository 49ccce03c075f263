pub mod attachment;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

// Re-export common types
pub use attachment::{Attachment, AttachmentKind};
pub use config::ZwenConfig;
pub use error::{PersistenceError, ZwenError};
pub use storage::KeyValueStore;
