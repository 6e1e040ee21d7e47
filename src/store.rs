//! Append-only message store.
//!
//! Single logical owner of the chat log and the typing flag. Every mutation
//! except the typing toggle re-serializes the full log to durable storage,
//! best-effort. Appending a user message dispatches it to the configured
//! responder; the reply (or a synthesized failure notification) is folded back
//! into the log. Consumers read snapshots and watch `revision()` for changes.

use crate::api::Responder;
use crate::storage::HistoryStorage;
use crate::types::{Message, MessageDraft, Sender, Status};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Pause between a `send_message` call and the message becoming visible.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Body of the system notification appended after a clear.
pub const CLEAR_NOTICE_BODY: &str = "Chat history has been cleared.";

/// Body of the system notification appended when dispatch fails.
pub const DISPATCH_FAILURE_BODY: &str = "Failed to get response from server.";

/// Date separator label, e.g. `Mar 5, 2025`.
const DATE_LABEL_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

struct StoreState {
    items: Vec<Message>,
    typing: bool,
}

struct Inner {
    state: Mutex<StoreState>,
    storage: Box<dyn HistoryStorage>,
    responder: Mutex<Option<Arc<dyn Responder>>>,
    settle_delay: Duration,
    revision: AtomicU64,
    pending: Mutex<Vec<AbortHandle>>,
}

/// Handle to an in-flight `send_message` or dispatch task. Dropping the handle
/// does not cancel the task; `abort()` does.
pub struct ReplyHandle {
    inner: Option<AbortHandle>,
}

impl ReplyHandle {
    fn inert() -> Self {
        Self { inner: None }
    }

    pub fn abort(&self) {
        if let Some(handle) = &self.inner {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(|h| h.is_finished())
    }
}

/// Cheap-clone handle to the shared store.
#[derive(Clone)]
pub struct MessageStore {
    inner: Arc<Inner>,
}

/// Identity comparison: two handles are equal when they share the same store.
impl PartialEq for MessageStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MessageStore {
    /// Build a store over the given storage backend, loading whatever history
    /// it holds. Corrupt history loads as an empty log.
    pub fn new(storage: Box<dyn HistoryStorage>) -> Self {
        let items = storage.load();
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState {
                    items,
                    typing: false,
                }),
                storage,
                responder: Mutex::new(None),
                settle_delay: DEFAULT_SETTLE_DELAY,
                revision: AtomicU64::new(0),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_settle_delay(storage: Box<dyn HistoryStorage>, settle_delay: Duration) -> Self {
        let mut store = Self::new(storage);
        // The Arc is still unique right after construction.
        if let Some(inner) = Arc::get_mut(&mut store.inner) {
            inner.settle_delay = settle_delay;
        }
        store
    }

    /// Install or replace the reply source. `None` disables dispatch.
    pub fn set_responder(&self, responder: Option<Arc<dyn Responder>>) {
        if let Ok(mut slot) = self.inner.responder.lock() {
            *slot = responder;
        }
    }

    // ----------------------------------------
    // Reads
    // ----------------------------------------

    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .state
            .lock()
            .map(|state| state.items.clone())
            .unwrap_or_default()
    }

    pub fn is_typing(&self) -> bool {
        self.inner
            .state
            .lock()
            .map(|state| state.typing)
            .unwrap_or(false)
    }

    /// Monotone change counter covering both the log and the typing flag.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Chronological view with date separators, in the viewer's local offset.
    pub fn grouped_by_date(&self) -> Vec<Message> {
        group_by_date(&self.messages())
    }

    // ----------------------------------------
    // Mutations
    // ----------------------------------------

    /// Assign id and timestamp, append, persist, and dispatch if the message
    /// is from the user. Payload shape is not validated.
    pub fn add_message(&self, draft: MessageDraft) -> Message {
        let message = Message::from_draft(
            draft,
            Uuid::new_v4().to_string(),
            OffsetDateTime::now_utc(),
        );
        self.append(message.clone());
        if message.from == Sender::User {
            self.dispatch(message.clone());
        }
        message
    }

    /// Wipe the log, then record the clear as a system notification.
    pub fn clear_messages(&self) {
        let notice = Message::from_draft(
            MessageDraft::notification(Sender::System, CLEAR_NOTICE_BODY, Status::Info),
            Uuid::new_v4().to_string(),
            OffsetDateTime::now_utc(),
        );
        if let Ok(mut state) = self.inner.state.lock() {
            state.items.clear();
            state.items.push(notice);
        }
        self.persist();
        self.bump();
    }

    /// Not persisted; bumps the revision so derived views recompute.
    pub fn set_typing(&self, typing: bool) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.typing = typing;
        }
        self.bump();
    }

    /// Wholesale replacement for migrations. Anything that does not parse as
    /// a message array replaces the log with an empty one; never fails.
    pub fn set_all_messages(&self, value: serde_json::Value) {
        let items = serde_json::from_value::<Vec<Message>>(value).unwrap_or_default();
        if let Ok(mut state) = self.inner.state.lock() {
            state.items = items;
        }
        self.persist();
        self.bump();
    }

    /// Local echo with a settle delay: typing goes on immediately, and the
    /// message appears only after the delay, with typing off again.
    ///
    /// The returned handle can abort the pending append; by default a clear
    /// does not abort anything and a late append still lands.
    pub fn send_message(&self, draft: MessageDraft) -> ReplyHandle {
        self.set_typing(true);
        let store = self.clone();
        let delay = self.inner.settle_delay;
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            store.set_typing(false);
            store.add_message(draft);
        })
    }

    /// Abort every tracked settle timer and in-flight dispatch.
    pub fn cancel_pending(&self) {
        if let Ok(mut pending) = self.inner.pending.lock() {
            for handle in pending.drain(..) {
                handle.abort();
            }
        }
    }

    // ----------------------------------------
    // Internals
    // ----------------------------------------

    /// Append verbatim: no id reassignment and no dispatch. Used for replies
    /// and failure notices.
    fn append(&self, message: Message) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.items.push(message);
        }
        self.persist();
        self.bump();
    }

    fn dispatch(&self, message: Message) {
        let responder = match self.inner.responder.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        let Some(responder) = responder else {
            return;
        };
        let store = self.clone();
        self.spawn(async move {
            match responder.respond(&message).await {
                Ok(reply) => store.append(reply),
                Err(err) => {
                    tracing::warn!("chat dispatch failed: {err}");
                    store.append(Message::from_draft(
                        MessageDraft::notification(
                            Sender::System,
                            DISPATCH_FAILURE_BODY,
                            Status::Error,
                        ),
                        Uuid::new_v4().to_string(),
                        OffsetDateTime::now_utc(),
                    ));
                }
            }
        });
    }

    fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) -> ReplyHandle {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!("message store used outside a tokio runtime; task dropped");
            return ReplyHandle::inert();
        };
        let handle = runtime.spawn(task).abort_handle();
        if let Ok(mut pending) = self.inner.pending.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle.clone());
        }
        ReplyHandle {
            inner: Some(handle),
        }
    }

    fn persist(&self) {
        if let Ok(state) = self.inner.state.lock() {
            self.inner.storage.save(&state.items);
        }
    }

    fn bump(&self) {
        self.inner.revision.fetch_add(1, Ordering::Release);
    }
}

// ============================================
// Derived view
// ============================================

/// Stable chronological sort plus one synthetic `date` separator before the
/// first message of each calendar day, in the viewer's local offset. Pure
/// function of the log; safe to recompute unconditionally.
pub fn group_by_date(messages: &[Message]) -> Vec<Message> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    group_by_date_at(messages, offset)
}

/// Same as [`group_by_date`] with an explicit viewer offset.
pub fn group_by_date_at(messages: &[Message], offset: UtcOffset) -> Vec<Message> {
    let mut ordered = messages.to_vec();
    // Stable: equal timestamps keep their append order.
    ordered.sort_by_key(|m| m.ts);

    let mut grouped = Vec::with_capacity(ordered.len());
    let mut current_day = None;
    for message in ordered {
        let local = message.ts.to_offset(offset);
        if current_day != Some(local.date()) {
            current_day = Some(local.date());
            let label = local
                .format(DATE_LABEL_FORMAT)
                .unwrap_or_else(|_| local.date().to_string());
            grouped.push(Message::date_separator(&label, message.ts));
        }
        grouped.push(message);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageKind;
    use time::macros::datetime;

    fn msg(id: &str, ts: OffsetDateTime, body: &str) -> Message {
        Message::from_draft(MessageDraft::text(Sender::User, body), id.to_string(), ts)
    }

    #[test]
    fn grouping_is_stable_for_equal_timestamps() {
        let ts = datetime!(2025-03-05 12:00:00 UTC);
        let log = vec![msg("a", ts, "first"), msg("b", ts, "second")];
        let grouped = group_by_date_at(&log, UtcOffset::UTC);
        let bodies: Vec<_> = grouped
            .iter()
            .filter(|m| m.kind != MessageKind::Date)
            .map(|m| m.text_body().unwrap())
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[test]
    fn one_separator_per_day_before_first_message() {
        let log = vec![
            msg("c", datetime!(2025-03-06 09:00:00 UTC), "later day"),
            msg("a", datetime!(2025-03-05 08:00:00 UTC), "early"),
            msg("b", datetime!(2025-03-05 18:00:00 UTC), "late"),
        ];
        let grouped = group_by_date_at(&log, UtcOffset::UTC);
        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped[0].kind, MessageKind::Date);
        assert_eq!(grouped[0].label.as_deref(), Some("Mar 5, 2025"));
        assert_eq!(grouped[0].id, "date-Mar 5, 2025");
        assert_eq!(grouped[1].id, "a");
        assert_eq!(grouped[2].id, "b");
        assert_eq!(grouped[3].kind, MessageKind::Date);
        assert_eq!(grouped[4].id, "c");
    }

    #[test]
    fn empty_log_groups_to_empty() {
        assert!(group_by_date_at(&[], UtcOffset::UTC).is_empty());
    }
}
