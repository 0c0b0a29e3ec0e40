//! Notification dispatch channel.
//!
//! Sends through a native notification when permission is granted and
//! falls back to an in-app toast otherwise, or when the native path fails.
//! Dispatch never returns an error to the caller.

use crate::host::{NotificationHandle, NotificationHost, ToastOptions, ToastProvider};
use crate::permission::PermissionGate;
use crate::NotificationEvent;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type ClickCallback = Arc<dyn Fn() + Send + Sync>;

/// Caller-supplied knobs for one dispatch
#[derive(Clone, Default)]
pub struct DispatchOptions {
    /// Coalescing key; notifications sharing a tag replace each other
    pub tag: Option<String>,
    pub requires_interaction: bool,
    pub icon: Option<String>,
    pub on_click: Option<ClickCallback>,
}

impl DispatchOptions {
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn on_click(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for DispatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchOptions")
            .field("tag", &self.tag)
            .field("requires_interaction", &self.requires_interaction)
            .field("icon", &self.icon)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Which path a dispatch took
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Native,
    Toast,
    /// Native construction failed and the toast path was used instead
    FellBack,
}

struct ActiveNotification {
    id: u64,
    handle: Arc<dyn NotificationHandle>,
    on_click: Option<ClickCallback>,
}

type ActiveMap = Arc<Mutex<HashMap<String, ActiveNotification>>>;

pub struct DispatchChannel {
    host: Arc<dyn NotificationHost>,
    toasts: Arc<dyn ToastProvider>,
    gate: Arc<PermissionGate>,
    default_tag: String,
    auto_dismiss: Duration,
    active: ActiveMap,
    next_id: AtomicU64,
}

impl DispatchChannel {
    pub fn new(
        host: Arc<dyn NotificationHost>,
        toasts: Arc<dyn ToastProvider>,
        gate: Arc<PermissionGate>,
        default_tag: impl Into<String>,
        auto_dismiss: Duration,
    ) -> Self {
        Self {
            host,
            toasts,
            gate,
            default_tag: default_tag.into(),
            auto_dismiss,
            active: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Deliver a notification through the best available path
    pub fn dispatch(&self, title: &str, body: &str, options: DispatchOptions) -> DispatchOutcome {
        if !self.gate.is_granted() {
            self.toast(title, body, options.icon);
            return DispatchOutcome::Toast;
        }

        let event = NotificationEvent {
            title: title.to_string(),
            body: body.to_string(),
            tag: options.tag.unwrap_or_else(|| self.default_tag.clone()),
            requires_interaction: options.requires_interaction,
        };

        match self.host.show_notification(&event) {
            Ok(handle) => {
                tracing::debug!("Showed native notification '{}' [{}]", title, event.tag);
                self.track(event.tag, handle, options.on_click);
                DispatchOutcome::Native
            }
            Err(e) => {
                tracing::warn!("Error sending notification '{}': {}", title, e);
                self.toast(title, body, options.icon);
                DispatchOutcome::FellBack
            }
        }
    }

    /// Handle a click on the native notification carrying `tag`
    ///
    /// Focuses the host window, runs the caller's callback and closes the
    /// notification. Returns false if no such notification is showing.
    pub fn notification_clicked(&self, tag: &str) -> bool {
        let Some(active) = lock(&self.active).remove(tag) else {
            return false;
        };

        self.host.focus_window();
        if let Some(callback) = &active.on_click {
            callback();
        }
        active.handle.close();
        true
    }

    /// Close the native notification carrying `tag`, if still showing
    pub fn dismiss(&self, tag: &str) -> bool {
        match lock(&self.active).remove(tag) {
            Some(active) => {
                active.handle.close();
                true
            }
            None => false,
        }
    }

    /// Tags of native notifications currently showing
    pub fn active_tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = lock(&self.active).keys().cloned().collect();
        tags.sort();
        tags
    }

    fn toast(&self, title: &str, body: &str, icon: Option<String>) {
        let mut options = ToastOptions::described(body);
        options.icon = icon;
        self.toasts.info(title, options);
    }

    fn track(
        &self,
        tag: String,
        handle: Arc<dyn NotificationHandle>,
        on_click: Option<ClickCallback>,
    ) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let replaced = lock(&self.active).insert(
            tag.clone(),
            ActiveNotification {
                id,
                handle,
                on_click,
            },
        );
        if let Some(previous) = replaced {
            previous.handle.close();
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime, notification [{}] will not auto-dismiss", tag);
            return;
        };

        let active = Arc::clone(&self.active);
        let delay = self.auto_dismiss;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let expired = {
                let mut map = lock(&active);
                match map.get(&tag) {
                    Some(current) if current.id == id => map.remove(&tag),
                    _ => None,
                }
            };
            if let Some(expired) = expired {
                tracing::debug!("Auto-dismissing notification [{}]", tag);
                expired.handle.close();
            }
        });
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
