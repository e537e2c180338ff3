//! Delayed local reminders.
//!
//! # Responsibility
//! - Schedule one fire-and-forget reminder per added item.
//! - Gate delivery on a notification permission requested once at startup.
//!
//! # Invariants
//! - Scheduling returns no handle; reminders cannot be cancelled or deduped.
//! - Permission denial silently suppresses reminders; it is not an error.

pub mod reminder;
pub mod sink;

pub use reminder::{
    DelayedReminderScheduler, NoopReminderScheduler, PermissionPrompt, ReminderScheduler,
    StaticPermission, DEFAULT_REMINDER_DELAY,
};
pub use sink::{ChannelReminderSink, LogReminderSink, Reminder, ReminderSink, REMINDER_TITLE};
