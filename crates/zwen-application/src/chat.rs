//! Chat service: the entry point a presentation layer talks to.

use crate::gate::ProcessingGate;
use crate::responder::Responder;
use crate::upload::{acknowledgement, validate_attachment};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use zwen_core::attachment::Attachment;
use zwen_core::config::ChatConfig;
use zwen_core::error::Result;
use zwen_core::session::{Message, Sender, Session, SessionObserver, SessionStore, SessionSummary};

/// Result of [`ChatService::on_user_send`].
#[derive(Debug)]
pub enum SendOutcome {
    /// The message was recorded; the reply arrives through the handle.
    Accepted(PendingReply),
    /// A reply is still pending; the message was dropped.
    Busy,
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Accepted(_))
    }
}

/// A delayed assistant message that has been scheduled but not yet appended.
#[derive(Debug)]
pub struct PendingReply {
    session_id: String,
    handle: JoinHandle<Option<Message>>,
}

impl PendingReply {
    /// The session the reply will be appended to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the reply to be appended and returns it.
    pub async fn wait(self) -> Option<Message> {
        match self.handle.await {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(session_id = %self.session_id, error = %e, "Reply task failed");
                None
            }
        }
    }
}

/// Handles user actions against the session store.
///
/// `ChatService` is responsible for:
/// - Restoring saved chats at startup
/// - Recording user messages and scheduling Zwen AI's delayed replies
/// - Starting and switching chats
/// - Accepting attachments
///
/// Only one reply can be pending at a time; sends made meanwhile are
/// rejected, not queued.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<Mutex<SessionStore>>,
    config: ChatConfig,
    gate: ProcessingGate,
    responder: Responder,
}

impl ChatService {
    /// Wraps an already prepared store.
    pub fn new(store: SessionStore, config: ChatConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
            gate: ProcessingGate::new(),
            responder: Responder::new(),
        }
    }

    /// Restores saved chats and makes sure a chat is open.
    ///
    /// A failed restore is logged and the service starts with no history.
    pub fn bootstrap(mut store: SessionStore, config: ChatConfig) -> Self {
        if let Err(e) = store.restore() {
            tracing::warn!(error = %e, "Could not load saved chats, starting fresh");
        }

        if store.is_empty() || config.start_with_new_chat {
            store.create_session(true);
        } else if store.get_active_session().is_none() {
            let newest = store.list_sessions().first().map(|s| s.id.clone());
            if let Some(id) = newest {
                store.select_session(&id);
            }
        }

        tracing::info!(
            sessions = store.len(),
            active = ?store.active_session_id(),
            "Chat service ready"
        );
        Self::new(store, config)
    }

    /// Registers an observer on the underlying store.
    pub async fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.store.lock().await.subscribe(observer);
    }

    /// Records a user message and schedules the reply.
    pub async fn on_user_send(&self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Ignored;
        }

        let Some(guard) = self.gate.try_begin() else {
            tracing::debug!("Reply pending, ignoring send");
            return SendOutcome::Busy;
        };

        let session_id = {
            let mut store = self.store.lock().await;
            let session_id = active_or_create(&mut store);
            store.append_message(&session_id, content, Sender::User);
            session_id
        };

        let reply = self.responder.respond(content);
        let delay = self.reply_delay();
        let store = self.store.clone();
        let target = session_id.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(delay).await;
            store
                .lock()
                .await
                .append_message(&target, reply, Sender::Assistant)
        });

        SendOutcome::Accepted(PendingReply { session_id, handle })
    }

    /// Opens a new chat and greets the user in it.
    pub async fn on_new_chat_requested(&self) -> Session {
        let mut store = self.store.lock().await;
        let session = store.create_session(false);
        store.append_message(&session.id, self.config.greeting.as_str(), Sender::Assistant);
        store.get_session(&session.id).cloned().unwrap_or(session)
    }

    /// Switches to another chat. Unknown ids are ignored.
    pub async fn on_chat_selected(&self, session_id: &str) -> bool {
        self.store.lock().await.select_session(session_id)
    }

    /// Accepts an attachment for the active chat.
    ///
    /// Oversized attachments are rejected without touching the store.
    /// Otherwise the acknowledgement is appended after the simulated upload
    /// and processing time.
    pub async fn on_attachment(&self, attachment: Attachment) -> Result<PendingReply> {
        validate_attachment(&attachment, self.config.max_attachment_bytes)?;

        let session_id = {
            let mut store = self.store.lock().await;
            active_or_create(&mut store)
        };

        tracing::info!(
            session_id = %session_id,
            name = %attachment.name,
            kind = %attachment.kind,
            size = attachment.size_bytes,
            "Attachment accepted"
        );

        let delay = Duration::from_millis(
            self.config
                .upload_delay_ms
                .saturating_add(self.config.upload_ack_delay_ms),
        );
        let reply = acknowledgement(attachment.kind);
        let store = self.store.clone();
        let target = session_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store
                .lock()
                .await
                .append_message(&target, reply, Sender::Assistant)
        });

        Ok(PendingReply { session_id, handle })
    }

    pub async fn active_session(&self) -> Option<Session> {
        self.store.lock().await.get_active_session().cloned()
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.store.lock().await.active_session_id().map(String::from)
    }

    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        self.store.lock().await.list_sessions()
    }

    /// Whether a reply is currently pending.
    pub fn is_processing(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn reply_delay(&self) -> Duration {
        let low = self.config.reply_delay_min_ms.min(self.config.reply_delay_max_ms);
        let high = self.config.reply_delay_min_ms.max(self.config.reply_delay_max_ms);
        let millis = if high > low {
            rand::thread_rng().gen_range(low..=high)
        } else {
            low
        };
        Duration::from_millis(millis)
    }
}

/// The active session id, creating a session if none is active.
fn active_or_create(store: &mut SessionStore) -> String {
    match store.active_session_id() {
        Some(id) => id.to_string(),
        None => store.create_session(true).id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zwen_core::attachment::AttachmentKind;
    use zwen_core::config::StorageConfig;
    use zwen_core::storage::KeyValueStore;
    use zwen_infrastructure::MemoryKeyValueStore;

    fn empty_store() -> (Arc<MemoryKeyValueStore>, SessionStore) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(backend.clone(), StorageConfig::default());
        (backend, store)
    }

    fn instant_service() -> ChatService {
        let (_, store) = empty_store();
        ChatService::bootstrap(store, ChatConfig::instant())
    }

    #[tokio::test]
    async fn test_bootstrap_opens_initial_chat() {
        let service = instant_service();

        let sessions = service.list_sessions().await;
        assert_eq!(sessions.len(), 1);
        let active = service.active_session().await.unwrap();
        assert_eq!(active.id, sessions[0].id);
        assert!(active.messages.is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_recovers_from_corrupt_storage() {
        let (backend, store) = empty_store();
        backend
            .set(&StorageConfig::default().sessions_key, "{not json")
            .unwrap();

        let service = ChatService::bootstrap(store, ChatConfig::instant());

        assert_eq!(service.list_sessions().await.len(), 1);
        assert!(service.active_session().await.is_some());
    }

    #[tokio::test]
    async fn test_bootstrap_selects_newest_when_active_missing() {
        let (backend, mut store) = empty_store();
        store.create_session(true);
        let newest = store.create_session(true);
        backend
            .remove(&StorageConfig::default().active_session_key)
            .unwrap();

        let restored = SessionStore::new(backend, StorageConfig::default());
        let service = ChatService::bootstrap(restored, ChatConfig::instant());

        assert_eq!(service.list_sessions().await.len(), 2);
        assert_eq!(service.active_session_id().await, Some(newest.id));
    }

    #[tokio::test]
    async fn test_send_appends_user_message_then_reply() {
        let service = instant_service();

        let SendOutcome::Accepted(pending) = service.on_user_send("  hello  ").await else {
            panic!("send should be accepted");
        };
        let reply = pending.wait().await.unwrap();

        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.content, "Hello! 👋 I'm Zwen AI! How can I help you?");

        let session = service.active_session().await.unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].content, "hello");
        assert_eq!(session.messages[0].sender, Sender::User);
        assert!(!service.is_processing());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let service = instant_service();

        assert!(matches!(service.on_user_send("   \n\t").await, SendOutcome::Ignored));
        assert!(service.active_session().await.unwrap().messages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_while_processing_is_rejected() {
        let (_, store) = empty_store();
        let config = ChatConfig {
            reply_delay_min_ms: 1000,
            reply_delay_max_ms: 2000,
            ..ChatConfig::instant()
        };
        let service = ChatService::bootstrap(store, config);

        let SendOutcome::Accepted(pending) = service.on_user_send("first").await else {
            panic!("first send should be accepted");
        };
        assert!(service.is_processing());
        assert!(matches!(service.on_user_send("second").await, SendOutcome::Busy));

        pending.wait().await.unwrap();
        assert!(!service.is_processing());

        let session = service.active_session().await.unwrap();
        let contents: Vec<_> = session.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0], "first");

        assert!(service.on_user_send("third").await.is_accepted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_reaches_observer_without_waiting_on_handle() {
        let (_, store) = empty_store();
        let config = ChatConfig {
            reply_delay_min_ms: 1000,
            reply_delay_max_ms: 1000,
            ..ChatConfig::instant()
        };
        let service = ChatService::bootstrap(store, config);
        let (observer, mut events) = crate::observer::ChannelObserver::channel();
        service.subscribe(Arc::new(observer)).await;

        let SendOutcome::Accepted(pending) = service.on_user_send("thanks").await else {
            panic!("send should be accepted");
        };
        assert!(!pending.is_finished());
        assert!(matches!(service.on_user_send("again").await, SendOutcome::Busy));

        let mut list_changes = 0;
        let reply = loop {
            match events.recv().await.unwrap() {
                crate::observer::StoreEvent::MessageAppended { message, .. }
                    if message.sender == Sender::Assistant =>
                {
                    break message;
                }
                crate::observer::StoreEvent::SessionListChanged(sessions) => {
                    assert_eq!(sessions.len(), 1);
                    list_changes += 1;
                }
                crate::observer::StoreEvent::MessageAppended { .. } => {}
            }
        };

        assert_eq!(reply.content, "You're welcome! 😊");
        assert!(list_changes >= 1);
        assert_eq!(pending.wait().await.unwrap().content, "You're welcome! 😊");
        assert!(!service.is_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_lands_in_the_chat_it_was_sent_from() {
        let (_, store) = empty_store();
        let config = ChatConfig {
            reply_delay_min_ms: 500,
            reply_delay_max_ms: 500,
            ..ChatConfig::instant()
        };
        let service = ChatService::bootstrap(store, config);
        let original = service.active_session_id().await.unwrap();

        let SendOutcome::Accepted(pending) = service.on_user_send("thanks").await else {
            panic!("send should be accepted");
        };
        let new_chat = service.on_new_chat_requested().await;
        pending.wait().await.unwrap();

        let store = service.store.lock().await;
        assert_eq!(store.get_session(&original).unwrap().messages.len(), 2);
        assert_eq!(store.get_session(&new_chat.id).unwrap().messages.len(), 1);
        assert_eq!(store.active_session_id(), Some(new_chat.id.as_str()));
    }

    #[tokio::test]
    async fn test_new_chat_is_greeted_and_active() {
        let service = instant_service();

        let session = service.on_new_chat_requested().await;

        assert_eq!(service.list_sessions().await[0].id, session.id);
        assert_eq!(service.active_session_id().await, Some(session.id.clone()));
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::Assistant);
        assert_eq!(session.messages[0].content, service.config().greeting);
    }

    #[tokio::test]
    async fn test_chat_selection() {
        let service = instant_service();
        let first = service.active_session_id().await.unwrap();
        service.on_new_chat_requested().await;

        assert!(service.on_chat_selected(&first).await);
        assert_eq!(service.active_session_id().await, Some(first.clone()));
        assert!(!service.on_chat_selected("chat_missing").await);
        assert_eq!(service.active_session_id().await, Some(first));
    }

    #[tokio::test]
    async fn test_attachment_acknowledged() {
        let service = instant_service();
        let attachment = Attachment {
            name: "IMG_0001.jpg".to_string(),
            size_bytes: 4096,
            mime_type: Some("image/jpeg".to_string()),
            kind: AttachmentKind::Camera,
        };

        let pending = service.on_attachment(attachment).await.unwrap();
        let reply = pending.wait().await.unwrap();

        assert!(reply.content.starts_with("I've successfully processed your photo!"));
        assert_eq!(service.active_session().await.unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_attachment_rejected() {
        let service = instant_service();
        let attachment = Attachment {
            name: "huge.iso".to_string(),
            size_bytes: 11 * 1024 * 1024,
            mime_type: None,
            kind: AttachmentKind::File,
        };

        let err = service.on_attachment(attachment).await.unwrap_err();

        assert!(matches!(err, zwen_core::ZwenError::AttachmentTooLarge { .. }));
        assert!(service.active_session().await.unwrap().messages.is_empty());
    }
}
