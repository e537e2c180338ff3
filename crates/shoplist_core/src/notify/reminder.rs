//! Reminder scheduling contracts and the tokio timer implementation.

use crate::notify::sink::{Reminder, ReminderSink};
use async_trait::async_trait;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay between adding an item and its reminder.
pub const DEFAULT_REMINDER_DELAY: Duration = Duration::from_secs(10);

/// Platform hook asked once whether notifications may be shown.
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    async fn request(&self) -> bool;
}

/// Permission answer fixed up front (CLI, tests, pre-granted platforms).
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub bool);

#[async_trait]
impl PermissionPrompt for StaticPermission {
    async fn request(&self) -> bool {
        self.0
    }
}

/// Fire-and-forget reminder scheduling.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Asks for notification permission. Called once at startup.
    async fn request_permission(&self) -> bool;

    /// Last permission answer; `false` until `request_permission` ran.
    fn is_permitted(&self) -> bool;

    /// Requests one reminder for `item_name`. Never fails.
    fn schedule(&self, item_name: &str);
}

/// Scheduler that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReminderScheduler;

#[async_trait]
impl ReminderScheduler for NoopReminderScheduler {
    async fn request_permission(&self) -> bool {
        false
    }

    fn is_permitted(&self) -> bool {
        false
    }

    fn schedule(&self, _item_name: &str) {}
}

/// Scheduler that sleeps on the tokio timer, then hands the reminder to a sink.
///
/// Must be used from within a tokio runtime.
pub struct DelayedReminderScheduler {
    delay: Duration,
    prompt: Box<dyn PermissionPrompt>,
    sink: Arc<dyn ReminderSink>,
    granted: AtomicBool,
}

impl DelayedReminderScheduler {
    pub fn new(
        delay: Duration,
        prompt: impl PermissionPrompt + 'static,
        sink: impl ReminderSink + 'static,
    ) -> Self {
        Self {
            delay,
            prompt: Box::new(prompt),
            sink: Arc::new(sink),
            granted: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ReminderScheduler for DelayedReminderScheduler {
    async fn request_permission(&self) -> bool {
        let granted = self.prompt.request().await;
        self.granted.store(granted, Ordering::SeqCst);
        info!("event=notify_permission module=notify status=ok granted={granted}");
        granted
    }

    fn is_permitted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn schedule(&self, item_name: &str) {
        if !self.is_permitted() {
            debug!("event=reminder_schedule module=notify status=skipped reason=no_permission");
            return;
        }

        let reminder = Reminder::for_item(item_name);
        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.deliver(reminder);
        });
        debug!(
            "event=reminder_schedule module=notify status=ok delay_ms={}",
            delay.as_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{DelayedReminderScheduler, ReminderScheduler, StaticPermission};
    use crate::notify::sink::{ChannelReminderSink, REMINDER_TITLE};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn reminder_fires_after_delay_with_item_name() {
        let (sink, mut rx) = ChannelReminderSink::new();
        let scheduler =
            DelayedReminderScheduler::new(Duration::from_secs(10), StaticPermission(true), sink);
        assert!(scheduler.request_permission().await);

        scheduler.schedule("Bread");
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let reminder = rx.recv().await.unwrap();
        assert_eq!(reminder.title, REMINDER_TITLE);
        assert_eq!(reminder.body, "Item: Bread");
    }

    #[tokio::test(start_paused = true)]
    async fn denied_permission_suppresses_reminders() {
        let (sink, mut rx) = ChannelReminderSink::new();
        let scheduler =
            DelayedReminderScheduler::new(Duration::from_secs(10), StaticPermission(false), sink);
        assert!(!scheduler.request_permission().await);
        assert!(!scheduler.is_permitted());

        scheduler.schedule("Milk");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_before_permission_request_is_ignored() {
        let (sink, mut rx) = ChannelReminderSink::new();
        let scheduler =
            DelayedReminderScheduler::new(Duration::from_secs(1), StaticPermission(true), sink);
        assert!(!scheduler.is_permitted());

        scheduler.schedule("Eggs");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
