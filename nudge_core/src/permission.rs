//! Notification permission gate.
//!
//! Tracks whether the host supports native notifications and whether the
//! user has allowed them. Everything else asks the gate before going native.

use crate::host::{NotificationHost, ToastOptions, ToastProvider};
use crate::{Error, Permission, Result};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, Default)]
struct GateState {
    permission: Permission,
    supported: bool,
}

pub struct PermissionGate {
    host: Arc<dyn NotificationHost>,
    toasts: Arc<dyn ToastProvider>,
    state: Mutex<GateState>,
}

impl PermissionGate {
    /// Build a gate and read the host's current state
    pub fn new(host: Arc<dyn NotificationHost>, toasts: Arc<dyn ToastProvider>) -> Self {
        let gate = Self {
            host,
            toasts,
            state: Mutex::new(GateState::default()),
        };
        gate.initialize();
        gate
    }

    /// Detect host support and any previously granted permission
    pub fn initialize(&self) {
        let supported = self.host.is_supported();
        let permission = if supported {
            self.host.current_permission()
        } else {
            Permission::NotDetermined
        };

        tracing::debug!(
            "Notification support: {}, permission: {}",
            supported,
            permission
        );

        let mut state = self.lock();
        state.supported = supported;
        state.permission = permission;
    }

    pub fn permission(&self) -> Permission {
        self.lock().permission
    }

    pub fn is_supported(&self) -> bool {
        self.lock().supported
    }

    pub fn is_granted(&self) -> bool {
        self.permission() == Permission::Granted
    }

    /// Ask the user for permission, surfacing the result as a toast
    ///
    /// Returns true only when permission ends up granted. Calling this while
    /// already granted returns immediately without prompting.
    pub async fn request_permission(&self) -> bool {
        match self.try_request().await {
            Ok(Permission::Granted) => true,
            Ok(other) => {
                tracing::info!("Notification permission not granted: {}", other);
                self.toasts
                    .error("Notification permission denied", ToastOptions::default());
                false
            }
            Err(Error::Capability(reason)) => {
                tracing::warn!("Cannot request notification permission: {}", reason);
                self.toasts
                    .error("Notifications unsupported", ToastOptions::described(reason));
                false
            }
            Err(e) => {
                tracing::error!("Error requesting notification permission: {}", e);
                false
            }
        }
    }

    async fn try_request(&self) -> Result<Permission> {
        let GateState {
            permission,
            supported,
        } = *self.lock();

        if !supported {
            return Err(Error::Capability(
                "this environment cannot show notifications".into(),
            ));
        }
        if permission == Permission::Granted {
            return Ok(Permission::Granted);
        }

        let result = self.host.request_permission().await?;
        self.lock().permission = result;

        if result == Permission::Granted {
            tracing::info!("Notification permission granted");
            self.toasts
                .success("Notifications enabled!", ToastOptions::default());
        }
        Ok(result)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ToastKind;
    use crate::testing::{RecordingHost, RecordingToasts};

    #[tokio::test]
    async fn test_unsupported_reports_and_returns_false() {
        let host = Arc::new(RecordingHost::unsupported());
        let toasts = Arc::new(RecordingToasts::default());
        let gate = PermissionGate::new(host.clone(), toasts.clone());

        assert!(!gate.is_supported());
        assert!(!gate.request_permission().await);
        assert_eq!(host.permission_requests(), 0);

        let shown = toasts.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, ToastKind::Error);
        assert_eq!(shown[0].title, "Notifications unsupported");
    }

    #[tokio::test]
    async fn test_grant_flow() {
        let host = Arc::new(RecordingHost::new(Permission::NotDetermined));
        host.answer_requests_with(Permission::Granted);
        let toasts = Arc::new(RecordingToasts::default());
        let gate = PermissionGate::new(host.clone(), toasts.clone());

        assert_eq!(gate.permission(), Permission::NotDetermined);
        assert!(gate.request_permission().await);
        assert!(gate.is_granted());

        // Already granted: no second prompt
        assert!(gate.request_permission().await);
        assert_eq!(host.permission_requests(), 1);
        assert_eq!(toasts.shown().len(), 1);
        assert_eq!(toasts.shown()[0].kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn test_refusal_sets_denied() {
        let host = Arc::new(RecordingHost::new(Permission::NotDetermined));
        host.answer_requests_with(Permission::Denied);
        let toasts = Arc::new(RecordingToasts::default());
        let gate = PermissionGate::new(host, toasts.clone());

        assert!(!gate.request_permission().await);
        assert_eq!(gate.permission(), Permission::Denied);
        assert_eq!(toasts.shown()[0].title, "Notification permission denied");
    }

    #[test]
    fn test_initialize_reads_prior_grant() {
        let host = Arc::new(RecordingHost::new(Permission::Granted));
        let gate = PermissionGate::new(host, Arc::new(RecordingToasts::default()));
        assert!(gate.is_granted());
    }
}
