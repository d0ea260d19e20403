//! Server actions demo: counter, message board and newsletter signup
//!
//! Every operation sleeps a little first so the client-side pending and
//! optimistic states have something to show.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use super::{lock, timestamp, Demos, Latency, Outcome};
use crate::error::DemoError;
use crate::http::FormData;

/// Messages kept on the board; older ones are evicted
pub const MESSAGE_CAPACITY: usize = 10;

/// Non-negative counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Decrement, stopping at zero
    pub fn decrement(&self) -> u64 {
        let previous = self
            .value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(v.saturating_sub(1)))
            .unwrap_or_default();
        previous.saturating_sub(1)
    }

    pub fn reset(&self) -> u64 {
        self.value.store(0, Ordering::SeqCst);
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub timestamp: String,
}

/// Bounded message list, newest first
#[derive(Debug, Default)]
pub struct MessageBoard {
    messages: Mutex<VecDeque<Message>>,
}

impl MessageBoard {
    pub fn list(&self) -> Vec<Message> {
        lock(&self.messages).iter().cloned().collect()
    }

    /// Post `text`; returns `None` when it is blank
    pub fn post(&self, text: &str) -> Option<Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            timestamp: timestamp(),
        };
        let mut messages = lock(&self.messages);
        messages.push_front(message.clone());
        messages.truncate(MESSAGE_CAPACITY);
        Some(message)
    }

    /// Remove the message with `id`; returns whether one was removed
    pub fn remove(&self, id: &str) -> bool {
        let mut messages = lock(&self.messages);
        let before = messages.len();
        messages.retain(|m| m.id != id);
        before != messages.len()
    }
}

/// Newsletter signups
#[derive(Debug, Default)]
pub struct Subscribers {
    emails: Mutex<Vec<String>>,
}

impl Subscribers {
    /// Record `email`; returns false if it was already subscribed
    pub fn subscribe(&self, email: &str) -> bool {
        let mut emails = lock(&self.emails);
        if emails.iter().any(|e| e.eq_ignore_ascii_case(email)) {
            return false;
        }
        emails.push(email.to_string());
        true
    }

    pub fn count(&self) -> usize {
        lock(&self.emails).len()
    }
}

/// Operations the server-actions route accepts, keyed by `intent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerIntent {
    Increment,
    Decrement,
    Reset,
    AddMessage { text: String },
    DeleteMessage { id: String },
    Subscribe { email: String },
}

impl ServerIntent {
    pub fn from_form(form: &FormData) -> Result<Self, DemoError> {
        match form.get_or_empty("intent") {
            "increment" => Ok(Self::Increment),
            "decrement" => Ok(Self::Decrement),
            "reset" => Ok(Self::Reset),
            "add-message" => Ok(Self::AddMessage {
                text: form.get_or_empty("message").to_string(),
            }),
            "delete-message" => Ok(Self::DeleteMessage {
                id: form.get_or_empty("id").to_string(),
            }),
            "subscribe" => Ok(Self::Subscribe {
                email: form.get_or_empty("email").trim().to_string(),
            }),
            other => Err(DemoError::UnknownOperation(other.to_string())),
        }
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Reset => "reset",
            Self::AddMessage { .. } => "add-message",
            Self::DeleteMessage { .. } => "delete-message",
            Self::Subscribe { .. } => "subscribe",
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

pub async fn action(demos: &Demos, form: &FormData) -> Result<Outcome, DemoError> {
    let intent = ServerIntent::from_form(form)?;
    let operation = intent.tag();
    let latency = demos.latency;

    let outcome = match intent {
        ServerIntent::Increment => {
            latency.pause(200).await;
            Outcome::applied(operation).with("value", demos.counter.increment())
        }
        ServerIntent::Decrement => {
            latency.pause(200).await;
            Outcome::applied(operation).with("value", demos.counter.decrement())
        }
        ServerIntent::Reset => {
            latency.pause(100).await;
            Outcome::applied(operation).with("value", demos.counter.reset())
        }
        ServerIntent::AddMessage { text } => {
            if text.trim().is_empty() {
                return Ok(Outcome::rejected(operation, "Message is required"));
            }
            latency.pause(150).await;
            match demos.messages.post(&text) {
                Some(message) => Outcome::applied(operation).with("message", message),
                None => Outcome::rejected(operation, "Message is required"),
            }
        }
        ServerIntent::DeleteMessage { id } => {
            if demos.messages.remove(&id) {
                Outcome::applied(operation)
            } else {
                Outcome::unchanged(operation)
            }
        }
        ServerIntent::Subscribe { email } => {
            if !is_plausible_email(&email) {
                return Ok(Outcome::rejected(operation, "A valid email is required"));
            }
            latency.pause(1000).await;
            let outcome = if demos.subscribers.subscribe(&email) {
                Outcome::applied(operation)
            } else {
                Outcome::unchanged(operation)
            };
            outcome.with("email", email)
        }
    };
    Ok(outcome)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_users: u32,
    pub active_today: u32,
    pub new_this_week: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: u32,
    pub action: &'static str,
    pub user: &'static str,
    pub time: &'static str,
}

pub async fn fetch_user_stats(latency: Latency) -> UserStats {
    latency.pause(1500).await;
    UserStats {
        total_users: 1234,
        active_today: 456,
        new_this_week: 78,
    }
}

pub async fn fetch_recent_activity(latency: Latency) -> Vec<Activity> {
    latency.pause(2000).await;
    vec![
        Activity {
            id: 1,
            action: "User signup",
            user: "alice@example.com",
            time: "2 min ago",
        },
        Activity {
            id: 2,
            action: "Purchase completed",
            user: "bob@example.com",
            time: "5 min ago",
        },
        Activity {
            id: 3,
            action: "Comment added",
            user: "carol@example.com",
            time: "12 min ago",
        },
        Activity {
            id: 4,
            action: "Profile updated",
            user: "david@example.com",
            time: "1 hour ago",
        },
    ]
}

#[derive(Debug, Serialize)]
pub struct ServerActionsPage {
    pub counter: u64,
    pub messages: Vec<Message>,
    pub subscribers: usize,
    pub user_stats: UserStats,
    pub recent_activity: Vec<Activity>,
}

pub async fn loader(demos: &Demos) -> Result<ServerActionsPage, DemoError> {
    let (user_stats, recent_activity) = tokio::join!(
        fetch_user_stats(demos.latency),
        fetch_recent_activity(demos.latency)
    );
    Ok(ServerActionsPage {
        counter: demos.counter.get(),
        messages: demos.messages.list(),
        subscribers: demos.subscribers.count(),
        user_stats,
        recent_activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::test_demos;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_counter_floor_at_zero() {
        let counter = Counter::default();
        assert_eq!(counter.decrement(), 0);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_counter_increment_then_decrement() {
        let counter = Counter::default();
        counter.increment();
        counter.increment();
        let start = counter.get();
        assert_eq!(counter.increment(), start + 1);
        assert_eq!(counter.decrement(), start);
        assert_eq!(counter.reset(), 0);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_board_caps_at_ten_newest_first() {
        let board = MessageBoard::default();
        for i in 1..=11 {
            board.post(&format!("message {i}")).unwrap();
        }
        let messages = board.list();
        assert_eq!(messages.len(), MESSAGE_CAPACITY);
        assert_eq!(messages[0].text, "message 11");
        assert_eq!(messages[9].text, "message 2");
        assert!(messages.iter().all(|m| m.text != "message 1"));
    }

    #[test]
    fn test_board_rejects_blank() {
        let board = MessageBoard::default();
        assert!(board.post("  \t").is_none());
        assert!(board.list().is_empty());
    }

    #[test]
    fn test_board_remove_is_idempotent() {
        let board = MessageBoard::default();
        let message = board.post("hello").unwrap();
        board.post("world").unwrap();

        assert!(!board.remove("no-such-id"));
        assert_eq!(board.list().len(), 2);

        assert!(board.remove(&message.id));
        assert!(!board.remove(&message.id));
        assert_eq!(board.list().len(), 1);
        assert_eq!(board.list()[0].text, "world");
    }

    #[test]
    fn test_email_check() {
        assert!(is_plausible_email("jane@example.com"));
        assert!(!is_plausible_email("jane"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("jane@"));
        assert!(!is_plausible_email(""));
    }

    #[tokio::test]
    async fn test_counter_actions_report_value() {
        let demos = test_demos();
        let outcome = action(&demos, &form(&[("intent", "increment")])).await.unwrap();
        assert_eq!(outcome.fields["value"], 1);
        let outcome = action(&demos, &form(&[("intent", "decrement")])).await.unwrap();
        assert_eq!(outcome.fields["value"], 0);
        let outcome = action(&demos, &form(&[("intent", "decrement")])).await.unwrap();
        assert_eq!(outcome.fields["value"], 0);
        let outcome = action(&demos, &form(&[("intent", "reset")])).await.unwrap();
        assert_eq!(outcome.fields["value"], 0);
    }

    #[tokio::test]
    async fn test_add_message_validation_is_reported() {
        let demos = test_demos();
        let outcome = action(&demos, &form(&[("intent", "add-message"), ("message", " ")]))
            .await
            .unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.error.as_deref(), Some("Message is required"));
        assert!(demos.messages.list().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_delete_message() {
        let demos = test_demos();
        let outcome = action(&demos, &form(&[("intent", "add-message"), ("message", "hi")]))
            .await
            .unwrap();
        assert!(outcome.applied);
        let id = outcome.fields["message"]["id"].as_str().unwrap().to_string();

        let outcome = action(&demos, &form(&[("intent", "delete-message"), ("id", &id)]))
            .await
            .unwrap();
        assert!(outcome.applied);
        assert!(demos.messages.list().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe() {
        let demos = test_demos();
        let bad = action(&demos, &form(&[("intent", "subscribe"), ("email", "nope")]))
            .await
            .unwrap();
        assert!(!bad.ok);

        let first = action(&demos, &form(&[("intent", "subscribe"), ("email", "a@b.io")]))
            .await
            .unwrap();
        assert!(first.applied);
        assert_eq!(first.fields["email"], "a@b.io");

        let again = action(&demos, &form(&[("intent", "subscribe"), ("email", "A@B.io")]))
            .await
            .unwrap();
        assert!(again.ok);
        assert!(!again.applied);
        assert_eq!(demos.subscribers.count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_intent() {
        let demos = test_demos();
        let err = action(&demos, &form(&[("intent", "explode")])).await.unwrap_err();
        assert!(matches!(err, DemoError::UnknownOperation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loader_fetches_concurrently() {
        let mut demos = test_demos();
        demos.latency = Latency::new(true);
        let start = tokio::time::Instant::now();
        let page = loader(&demos).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(2000));
        assert!(elapsed < std::time::Duration::from_millis(3500));
        assert_eq!(page.user_stats.total_users, 1234);
        assert_eq!(page.recent_activity.len(), 4);
    }
}
