//! Integration tests for the message store
//!
//! Covers append/clear/replace semantics, the date-grouped derived view,
//! persistence round-trips, and the send/dispatch orchestration.

use floatchat::api::{CannedResponder, ChatError, ChatResult, Responder};
use floatchat::storage::{FileHistory, HistoryStorage, MemoryHistory};
use floatchat::store::{
    CLEAR_NOTICE_BODY, DISPATCH_FAILURE_BODY, MessageStore, group_by_date_at,
};
use floatchat::types::{Message, MessageDraft, MessageKind, Sender, Status};
use std::collections::HashSet;
use std::time::Duration;
use time::macros::datetime;
use time::{OffsetDateTime, UtcOffset};

fn memory_store() -> MessageStore {
    MessageStore::new(Box::new(MemoryHistory::new()))
}

async fn wait_for_len(store: &MessageStore, len: usize) {
    for _ in 0..100 {
        if store.messages().len() == len {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "log never reached {len} messages (got {})",
        store.messages().len()
    );
}

mod log_tests {
    use super::*;

    #[test]
    fn every_append_grows_the_log_with_a_unique_id() {
        let store = memory_store();
        for i in 0..25 {
            store.add_message(MessageDraft::text(Sender::User, format!("msg {i}")));
        }

        let messages = store.messages();
        assert_eq!(messages.len(), 25);
        let ids: HashSet<_> = messages.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn clear_leaves_exactly_one_system_notification() {
        let store = memory_store();
        store.add_message(MessageDraft::text(Sender::User, "one"));
        store.add_message(MessageDraft::text(Sender::Bot, "two"));

        store.clear_messages();

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        let notice = &messages[0];
        assert_eq!(notice.from, Sender::System);
        assert_eq!(notice.kind, MessageKind::Notification);
        assert_eq!(notice.status, Some(Status::Info));
        assert_eq!(
            notice.notification.as_ref().map(|n| n.body.as_str()),
            Some(CLEAR_NOTICE_BODY)
        );
    }

    #[test]
    fn set_all_messages_replaces_or_empties() {
        let store = memory_store();
        store.add_message(MessageDraft::text(Sender::User, "old"));

        let replacement = vec![
            Message::from_draft(
                MessageDraft::text(Sender::Bot, "a"),
                "m1".to_string(),
                datetime!(2025-04-01 10:00:00 UTC),
            ),
            Message::from_draft(
                MessageDraft::text(Sender::User, "b"),
                "m2".to_string(),
                datetime!(2025-04-01 10:01:00 UTC),
            ),
        ];
        store.set_all_messages(serde_json::to_value(&replacement).unwrap());
        assert_eq!(store.messages(), replacement);

        store.set_all_messages(serde_json::json!({"not": "a sequence"}));
        assert!(store.messages().is_empty());

        store.set_all_messages(serde_json::json!(42));
        assert!(store.messages().is_empty());
    }

    #[test]
    fn malformed_payloads_are_accepted_as_is() {
        let store = memory_store();
        // A "text" message with no text payload at all.
        let draft = MessageDraft {
            from: Sender::Bot,
            kind: MessageKind::Text,
            ..Default::default()
        };
        let message = store.add_message(draft);
        assert_eq!(message.text_body(), None);
        assert_eq!(store.messages().len(), 1);
    }
}

mod derived_view_tests {
    use super::*;

    fn at(id: &str, ts: OffsetDateTime) -> Message {
        Message::from_draft(MessageDraft::text(Sender::User, id), id.to_string(), ts)
    }

    #[test]
    fn stripped_view_equals_stable_chronological_sort() {
        let log = vec![
            at("late", datetime!(2025-04-02 18:00:00 UTC)),
            at("tie-first", datetime!(2025-04-02 09:00:00 UTC)),
            at("tie-second", datetime!(2025-04-02 09:00:00 UTC)),
            at("early", datetime!(2025-04-02 08:00:00 UTC)),
        ];

        let grouped = group_by_date_at(&log, UtcOffset::UTC);
        let stripped: Vec<_> = grouped
            .iter()
            .filter(|m| m.kind != MessageKind::Date)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(stripped, vec!["early", "tie-first", "tie-second", "late"]);
    }

    #[test]
    fn one_separator_per_distinct_day() {
        let log = vec![
            at("d2", datetime!(2025-04-02 12:00:00 UTC)),
            at("d1a", datetime!(2025-04-01 12:00:00 UTC)),
            at("d1b", datetime!(2025-04-01 13:00:00 UTC)),
            at("d3", datetime!(2025-04-03 12:00:00 UTC)),
        ];

        let grouped = group_by_date_at(&log, UtcOffset::UTC);
        let separators: Vec<_> = grouped
            .iter()
            .filter(|m| m.kind == MessageKind::Date)
            .collect();
        assert_eq!(separators.len(), 3);
        for separator in &separators {
            assert_eq!(separator.from, Sender::System);
            assert!(separator.id.starts_with("date-"));
        }
        // Each separator sits immediately before its day's first message.
        assert_eq!(grouped[0].kind, MessageKind::Date);
        assert_eq!(grouped[1].id, "d1a");
        assert_eq!(grouped[2].id, "d1b");
        assert_eq!(grouped[3].kind, MessageKind::Date);
        assert_eq!(grouped[4].id, "d2");
        assert_eq!(grouped[5].kind, MessageKind::Date);
        assert_eq!(grouped[6].id, "d3");
    }
}

mod persistence_tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn history_round_trips_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat_messages_v1.json");

        let store = MessageStore::new(Box::new(FileHistory::at(path.clone())));
        store.add_message(MessageDraft::text(Sender::User, "persist me"));
        store.add_message(MessageDraft::text(Sender::Bot, "and me"));
        let original = store.messages();

        let reloaded = MessageStore::new(Box::new(FileHistory::at(path)));
        assert_eq!(reloaded.messages(), original);
    }

    #[test]
    fn corrupt_history_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat_messages_v1.json");
        std::fs::write(&path, "{definitely not an array").unwrap();

        let store = MessageStore::new(Box::new(FileHistory::at(path)));
        assert!(store.messages().is_empty());
    }

    struct CountingStorage {
        saves: Arc<AtomicUsize>,
        inner: MemoryHistory,
    }

    impl HistoryStorage for CountingStorage {
        fn load_raw(&self) -> Option<String> {
            self.inner.load_raw()
        }

        fn save_raw(&self, value: &str) -> Result<(), String> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_raw(value)
        }
    }

    #[test]
    fn typing_flag_is_never_persisted() {
        let saves = Arc::new(AtomicUsize::new(0));
        let store = MessageStore::new(Box::new(CountingStorage {
            saves: saves.clone(),
            inner: MemoryHistory::new(),
        }));

        store.set_typing(true);
        store.set_typing(false);
        assert_eq!(saves.load(Ordering::SeqCst), 0);

        store.add_message(MessageDraft::text(Sender::User, "persisted"));
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    struct BrokenStorage;

    impl HistoryStorage for BrokenStorage {
        fn load_raw(&self) -> Option<String> {
            None
        }

        fn save_raw(&self, _value: &str) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }
    }

    #[test]
    fn write_failures_never_block_the_in_memory_log() {
        let store = MessageStore::new(Box::new(BrokenStorage));
        store.add_message(MessageDraft::text(Sender::User, "still here"));
        assert_eq!(store.messages().len(), 1);
    }
}

mod send_tests {
    use super::*;

    struct FailingResponder;

    #[async_trait::async_trait]
    impl Responder for FailingResponder {
        async fn respond(&self, _message: &Message) -> ChatResult<Message> {
            Err(ChatError::new("connection refused"))
        }
    }

    #[tokio::test]
    async fn send_message_shows_typing_for_the_settle_window() {
        let store = MessageStore::with_settle_delay(
            Box::new(MemoryHistory::new()),
            Duration::from_millis(80),
        );

        store.send_message(MessageDraft::text(Sender::User, "hello"));
        assert!(store.is_typing());
        assert!(store.messages().is_empty());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!store.is_typing());
        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, Sender::User);
        assert_eq!(messages[0].text_body(), Some("hello"));
    }

    #[tokio::test]
    async fn failed_dispatch_appends_one_error_notification() {
        let store = memory_store();
        store.set_responder(Some(std::sync::Arc::new(FailingResponder)));

        store.add_message(MessageDraft::text(Sender::User, "anyone there?"));
        wait_for_len(&store, 2).await;

        let messages = store.messages();
        let failure = &messages[1];
        assert_eq!(failure.from, Sender::System);
        assert_eq!(failure.kind, MessageKind::Notification);
        assert_eq!(failure.status, Some(Status::Error));
        assert_eq!(
            failure.notification.as_ref().map(|n| n.body.as_str()),
            Some(DISPATCH_FAILURE_BODY)
        );
    }

    #[tokio::test]
    async fn canned_responder_replies_to_user_messages() {
        let store = memory_store();
        store.set_responder(Some(std::sync::Arc::new(CannedResponder::with_replies(
            vec![MessageDraft::text(Sender::Bot, "canned hello")],
        ))));

        store.add_message(MessageDraft::text(Sender::User, "hi"));
        wait_for_len(&store, 2).await;

        let reply = &store.messages()[1];
        assert_eq!(reply.from, Sender::Bot);
        assert_eq!(reply.text_body(), Some("canned hello"));
    }

    #[tokio::test]
    async fn bot_messages_do_not_trigger_dispatch() {
        let store = memory_store();
        store.set_responder(Some(std::sync::Arc::new(CannedResponder::new())));

        store.add_message(MessageDraft::text(Sender::Bot, "no reply expected"));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test]
    async fn pending_send_lands_after_clear_by_default() {
        let store = MessageStore::with_settle_delay(
            Box::new(MemoryHistory::new()),
            Duration::from_millis(60),
        );

        store.send_message(MessageDraft::text(Sender::User, "late arrival"));
        store.clear_messages();
        tokio::time::sleep(Duration::from_millis(250)).await;

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, MessageKind::Notification);
        assert_eq!(messages[1].text_body(), Some("late arrival"));
    }

    #[tokio::test]
    async fn cancel_pending_suppresses_the_settle_append() {
        let store = MessageStore::with_settle_delay(
            Box::new(MemoryHistory::new()),
            Duration::from_millis(60),
        );

        store.send_message(MessageDraft::text(Sender::User, "never lands"));
        store.cancel_pending();
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn reply_handle_abort_cancels_one_send() {
        let store = MessageStore::with_settle_delay(
            Box::new(MemoryHistory::new()),
            Duration::from_millis(60),
        );

        let doomed = store.send_message(MessageDraft::text(Sender::User, "aborted"));
        doomed.abort();
        store.send_message(MessageDraft::text(Sender::User, "survives"));
        tokio::time::sleep(Duration::from_millis(250)).await;

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text_body(), Some("survives"));
    }
}
