//! Host environment seams: native notifications and in-app toasts.

use crate::{NotificationEvent, Permission, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A shown native notification
pub trait NotificationHandle: Send + Sync {
    fn close(&self);
}

/// The environment's native notification facility
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Whether native notifications exist at all
    fn is_supported(&self) -> bool;

    fn current_permission(&self) -> Permission;

    /// Ask the user; may wait on user interaction
    async fn request_permission(&self) -> Result<Permission>;

    fn show_notification(&self, event: &NotificationEvent) -> Result<Arc<dyn NotificationHandle>>;

    /// Bring the hosting window to the foreground
    fn focus_window(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastOptions {
    pub description: Option<String>,
    pub icon: Option<String>,
    pub duration: Option<Duration>,
}

impl ToastOptions {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Transient in-app message surface
pub trait ToastProvider: Send + Sync {
    fn show(&self, kind: ToastKind, title: &str, options: ToastOptions);

    fn info(&self, title: &str, options: ToastOptions) {
        self.show(ToastKind::Info, title, options)
    }

    fn success(&self, title: &str, options: ToastOptions) {
        self.show(ToastKind::Success, title, options)
    }

    fn error(&self, title: &str, options: ToastOptions) {
        self.show(ToastKind::Error, title, options)
    }
}
