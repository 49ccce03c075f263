//! Application services for Zwen AI.
//!
//! This crate wires the session store to user actions: sending messages,
//! opening and switching chats, and attaching files.

pub mod chat;
pub mod gate;
pub mod observer;
pub mod responder;
pub mod upload;

pub use chat::{ChatService, PendingReply, SendOutcome};
pub use gate::{ProcessingGate, ProcessingGuard};
pub use observer::{ChannelObserver, StoreEvent};
pub use responder::Responder;
