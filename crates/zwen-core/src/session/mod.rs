//! Session domain module.
//!
//! This module contains the chat-session model, the store that owns every
//! session, and the notification interface used by presentation layers.
//!
//! # Module Structure
//!
//! - `model`: Core session model (`Session`, `SessionSummary`)
//! - `message`: Chat message types (`Message`, `Sender`)
//! - `observer`: Outbound notifications (`SessionObserver`)
//! - `store`: Session collection and persistence (`SessionStore`)
//!
//! # Usage
//!
//! ```ignore
//! use zwen_core::session::{SessionStore, Session, Message, Sender};
//! ```

mod message;
mod model;
mod observer;
mod store;

// Re-export public API
pub use message::{Message, Sender};
pub use model::{
    DEFAULT_SESSION_TITLE, SESSION_ID_PREFIX, Session, SessionSummary, new_session_id,
};
pub use observer::SessionObserver;
pub use store::SessionStore;
