//! Recording fakes for the host seams.
//!
//! They capture every call so dispatch behaviour can be asserted from the
//! outside, which is the only observable contract the notifiers have.

use crate::host::{NotificationHandle, NotificationHost, ToastKind, ToastOptions, ToastProvider};
use crate::{Error, NotificationEvent, Permission, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn locked<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Notification host that records what it was asked to show
pub struct RecordingHost {
    supported: bool,
    permission: Mutex<Permission>,
    answer: Mutex<Permission>,
    requests: AtomicUsize,
    focus_calls: AtomicUsize,
    fail_show: AtomicBool,
    shown: Mutex<Vec<NotificationEvent>>,
    closed: Arc<Mutex<Vec<String>>>,
}

impl RecordingHost {
    pub fn new(permission: Permission) -> Self {
        Self {
            supported: true,
            permission: Mutex::new(permission),
            answer: Mutex::new(Permission::Denied),
            requests: AtomicUsize::new(0),
            focus_calls: AtomicUsize::new(0),
            fail_show: AtomicBool::new(false),
            shown: Mutex::new(Vec::new()),
            closed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted)
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Permission::NotDetermined)
        }
    }

    /// Permission the next prompt resolves to
    pub fn answer_requests_with(&self, permission: Permission) {
        *locked(&self.answer) = permission;
    }

    /// Make `show_notification` fail from now on
    pub fn fail_notifications(&self, fail: bool) {
        self.fail_show.store(fail, Ordering::SeqCst);
    }

    pub fn shown(&self) -> Vec<NotificationEvent> {
        locked(&self.shown).clone()
    }

    /// Tags of closed notifications, in close order
    pub fn closed(&self) -> Vec<String> {
        locked(&self.closed).clone()
    }

    pub fn permission_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn focus_calls(&self) -> usize {
        self.focus_calls.load(Ordering::SeqCst)
    }
}

struct RecordingHandle {
    tag: String,
    closed: Arc<Mutex<Vec<String>>>,
}

impl NotificationHandle for RecordingHandle {
    fn close(&self) {
        locked(&self.closed).push(self.tag.clone());
    }
}

#[async_trait]
impl NotificationHost for RecordingHost {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn current_permission(&self) -> Permission {
        *locked(&self.permission)
    }

    async fn request_permission(&self) -> Result<Permission> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let answer = *locked(&self.answer);
        *locked(&self.permission) = answer;
        Ok(answer)
    }

    fn show_notification(&self, event: &NotificationEvent) -> Result<Arc<dyn NotificationHandle>> {
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(Error::Dispatch("notification constructor failed".into()));
        }
        locked(&self.shown).push(event.clone());
        Ok(Arc::new(RecordingHandle {
            tag: event.tag.clone(),
            closed: self.closed.clone(),
        }))
    }

    fn focus_window(&self) {
        self.focus_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedToast {
    pub kind: ToastKind,
    pub title: String,
    pub options: ToastOptions,
}

/// Toast provider that keeps every toast it was given
#[derive(Default)]
pub struct RecordingToasts {
    shown: Mutex<Vec<RecordedToast>>,
}

impl RecordingToasts {
    pub fn shown(&self) -> Vec<RecordedToast> {
        locked(&self.shown).clone()
    }
}

impl ToastProvider for RecordingToasts {
    fn show(&self, kind: ToastKind, title: &str, options: ToastOptions) {
        locked(&self.shown).push(RecordedToast {
            kind,
            title: title.to_string(),
            options,
        });
    }
}
