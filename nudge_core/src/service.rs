//! The notification service shared by both notifiers.
//!
//! Owns the permission gate and dispatch channel and carries the injected
//! clock, random source and toast surface. Construct one per application
//! and hand it out behind an `Arc`.

use crate::clock::Clock;
use crate::config::NotificationConfig;
use crate::dispatch::{DispatchChannel, DispatchOptions, DispatchOutcome};
use crate::host::{NotificationHost, ToastProvider};
use crate::messages;
use crate::permission::PermissionGate;
use crate::random::RandomSource;
use crate::{Permission, ReminderType};
use std::sync::Arc;

pub struct NotificationService {
    gate: Arc<PermissionGate>,
    dispatch: DispatchChannel,
    toasts: Arc<dyn ToastProvider>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    settings: NotificationConfig,
}

impl NotificationService {
    pub fn new(
        host: Arc<dyn NotificationHost>,
        toasts: Arc<dyn ToastProvider>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        settings: NotificationConfig,
    ) -> Self {
        let gate = Arc::new(PermissionGate::new(host.clone(), toasts.clone()));
        let dispatch = DispatchChannel::new(
            host,
            toasts.clone(),
            gate.clone(),
            settings.default_tag.clone(),
            settings.auto_dismiss(),
        );

        Self {
            gate,
            dispatch,
            toasts,
            clock,
            random,
            settings,
        }
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn permission(&self) -> Permission {
        self.gate.permission()
    }

    pub fn is_supported(&self) -> bool {
        self.gate.is_supported()
    }

    pub async fn request_permission(&self) -> bool {
        self.gate.request_permission().await
    }

    pub fn send_notification(
        &self,
        title: &str,
        body: &str,
        options: DispatchOptions,
    ) -> DispatchOutcome {
        self.dispatch.dispatch(title, body, options)
    }

    pub fn notification_clicked(&self, tag: &str) -> bool {
        self.dispatch.notification_clicked(tag)
    }

    pub fn toasts(&self) -> &dyn ToastProvider {
        self.toasts.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    pub fn settings(&self) -> &NotificationConfig {
        &self.settings
    }

    /// Nudge about `category` outside the smart-reminder schedule
    ///
    /// Returns `None` when there is no target or no message for the band.
    pub fn send_motivational(
        &self,
        category: ReminderType,
        current: f64,
        target: f64,
    ) -> Option<DispatchOutcome> {
        if target <= 0.0 {
            return None;
        }
        let progress = current / target * 100.0;
        let message =
            messages::select_message(category, progress, current, target, self.random.as_ref())?;

        Some(self.send_notification(
            messages::motivational_title(category),
            &message,
            DispatchOptions::tagged(format!("motivation-{}", category)),
        ))
    }

    pub fn send_test_notification(&self) -> DispatchOutcome {
        self.send_notification(
            "🔔 Test notification",
            "Notifications are working correctly!",
            DispatchOptions::tagged("test"),
        )
    }
}
