//! Terminal stand-ins for the desktop notification surfaces.

use async_trait::async_trait;
use nudge_core::{
    NotificationEvent, NotificationHandle, NotificationHost, Permission, Result, ToastKind,
    ToastOptions, ToastProvider,
};
use std::sync::{Arc, Mutex};

/// Prints native notifications as banners on stdout
///
/// Support and permission come from the `[notifications]` config section;
/// a permission request is granted unless the config says `denied`.
pub struct ConsoleHost {
    supported: bool,
    permission: Mutex<Permission>,
}

impl ConsoleHost {
    pub fn new(supported: bool, permission: Permission) -> Self {
        Self {
            supported,
            permission: Mutex::new(permission),
        }
    }

    fn permission_guard(&self) -> std::sync::MutexGuard<'_, Permission> {
        self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct ConsoleHandle {
    tag: String,
}

impl NotificationHandle for ConsoleHandle {
    fn close(&self) {
        tracing::debug!("Notification [{}] closed", self.tag);
    }
}

#[async_trait]
impl NotificationHost for ConsoleHost {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn current_permission(&self) -> Permission {
        *self.permission_guard()
    }

    async fn request_permission(&self) -> Result<Permission> {
        let mut permission = self.permission_guard();
        if *permission != Permission::Denied {
            *permission = Permission::Granted;
        }
        Ok(*permission)
    }

    fn show_notification(&self, event: &NotificationEvent) -> Result<Arc<dyn NotificationHandle>> {
        println!("┌ {}  [{}]", event.title, event.tag);
        println!("└ {}", event.body);
        Ok(Arc::new(ConsoleHandle {
            tag: event.tag.clone(),
        }))
    }

    fn focus_window(&self) {
        tracing::debug!("Nothing to focus in a terminal");
    }
}

/// Prints toasts as single lines on stdout
pub struct TerminalToasts;

impl ToastProvider for TerminalToasts {
    fn show(&self, kind: ToastKind, title: &str, options: ToastOptions) {
        let marker = match kind {
            ToastKind::Info => "•",
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
        };
        match options.description {
            Some(description) => println!("{} {}: {}", marker, title, description),
            None => println!("{} {}", marker, title),
        }
    }
}
