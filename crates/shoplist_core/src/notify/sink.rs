//! Reminder payload and delivery targets.

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fixed title carried by every reminder.
///
/// English rendering of the Ukrainian copy shipped by the earlier mobile
/// app (`🛒 Не забудь купити!` / `Товар: <name>`). Localization belongs to
/// the presentation layer.
pub const REMINDER_TITLE: &str = "🛒 Don't forget to buy!";

/// One delivered reminder notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
}

impl Reminder {
    pub fn for_item(item_name: &str) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: format!("Item: {item_name}"),
        }
    }
}

/// Destination for reminders once their delay elapses.
pub trait ReminderSink: Send + Sync {
    fn deliver(&self, reminder: Reminder);
}

impl<S: ReminderSink + ?Sized> ReminderSink for Arc<S> {
    fn deliver(&self, reminder: Reminder) {
        (**self).deliver(reminder);
    }
}

/// Sink that only records delivery in the core log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReminderSink;

impl ReminderSink for LogReminderSink {
    fn deliver(&self, reminder: Reminder) {
        info!(
            "event=reminder_delivered module=notify status=ok body_chars={}",
            reminder.body.chars().count()
        );
    }
}

/// Sink forwarding reminders to an async consumer (UI bridge, CLI, tests).
#[derive(Debug, Clone)]
pub struct ChannelReminderSink {
    tx: mpsc::UnboundedSender<Reminder>,
}

impl ChannelReminderSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reminder>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReminderSink for ChannelReminderSink {
    fn deliver(&self, reminder: Reminder) {
        if self.tx.send(reminder).is_err() {
            warn!("event=reminder_delivered module=notify status=dropped reason=receiver_closed");
        }
    }
}
