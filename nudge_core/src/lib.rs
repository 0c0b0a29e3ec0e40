#![forbid(unsafe_code)]

//! Core domain model and notification logic for the nudge reminder system.
//!
//! This crate provides:
//! - Domain types (goals, metric snapshots, reminders, permission)
//! - Message selection and notification dispatch with toast fallback
//! - The smart reminder evaluator and progress crossing notifier
//! - Persistence (JSON file store, in-memory store)
//! - Metric recording, smart-reminder presets and history export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod random;
pub mod messages;
pub mod host;
pub mod permission;
pub mod dispatch;
pub mod service;
pub mod evaluator;
pub mod progress;
pub mod store;
pub mod file_store;
pub mod tracker;
pub mod presets;
pub mod history;
pub mod testing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use messages::select_message;
pub use host::{NotificationHandle, NotificationHost, ToastKind, ToastOptions, ToastProvider};
pub use permission::PermissionGate;
pub use dispatch::{DispatchChannel, DispatchOptions, DispatchOutcome};
pub use service::NotificationService;
pub use evaluator::{
    CycleOutcome, CycleReport, ReminderSchedule, SkipReason, SmartReminderEvaluator,
};
pub use progress::ProgressNotifier;
pub use store::{GoalStore, InMemoryStore, MetricFilter, MetricStore, ReminderStore};
pub use file_store::FileStore;
pub use tracker::{record_metric, MetricChange, MetricRecord};
pub use presets::{apply_smart_setup, recommended_selection, SmartSelection};
pub use history::{export_csv, load_history, summarize};
