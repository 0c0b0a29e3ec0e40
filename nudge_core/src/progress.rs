//! Progress crossing notifier.
//!
//! Fed `(previous, current)` observations of one metric against its target,
//! celebrates goal completion and congratulates milestone crossings. Each
//! event fires at most once per goal type per calendar day for the lifetime
//! of the notifier; the record is kept in memory only.

use crate::dispatch::DispatchOptions;
use crate::host::ToastOptions;
use crate::messages;
use crate::service::NotificationService;
use crate::GoalType;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const COMPLETE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Crossing {
    Completion,
    Milestone(u32),
}

pub struct ProgressNotifier {
    service: Arc<NotificationService>,
    notified: HashSet<(GoalType, NaiveDate, Crossing)>,
}

impl ProgressNotifier {
    pub fn new(service: Arc<NotificationService>) -> Self {
        Self {
            service,
            notified: HashSet::new(),
        }
    }

    /// Report a change in the tracked value of `goal_type`
    ///
    /// `previous` of `None` counts as zero. Nothing is evaluated without a
    /// positive target.
    pub fn on_metric_updated(
        &mut self,
        goal_type: GoalType,
        current: f64,
        target: Option<f64>,
        previous: Option<f64>,
    ) {
        let Some(target) = target.filter(|t| *t > 0.0) else {
            return;
        };

        let today = self.service.clock().today();
        self.notified.retain(|(_, date, _)| *date == today);

        let progress = current / target * 100.0;
        let previous_progress = previous.unwrap_or(0.0) / target * 100.0;
        let crossed = |threshold: f64| previous_progress < threshold && threshold <= progress;

        if crossed(COMPLETE) && self.mark(goal_type, today, Crossing::Completion) {
            self.celebrate(goal_type);
        }

        let milestones = self.service.settings().milestones.clone();
        for threshold in milestones {
            if crossed(threshold as f64)
                && self.mark(goal_type, today, Crossing::Milestone(threshold))
            {
                self.congratulate(goal_type, threshold);
            }
        }
    }

    /// Whether `goal_type` has already hit 100% today
    pub fn completed_today(&self, goal_type: GoalType) -> bool {
        let today = self.service.clock().today();
        self.notified
            .contains(&(goal_type, today, Crossing::Completion))
    }

    /// Record the crossing; false if it was already recorded
    fn mark(&mut self, goal_type: GoalType, today: NaiveDate, crossing: Crossing) -> bool {
        self.notified.insert((goal_type, today, crossing))
    }

    fn celebrate(&self, goal_type: GoalType) {
        let Some(message) = messages::celebration_message(goal_type, self.service.random()) else {
            tracing::debug!("No celebration messages for {}", goal_type);
            return;
        };
        tracing::info!("{} goal complete", goal_type);

        let settings = self.service.settings();
        self.service.toasts().success(
            &message,
            ToastOptions::default()
                .with_icon("trophy")
                .with_duration(Duration::from_secs(settings.completion_toast_secs)),
        );

        if self.service.gate().is_granted() {
            self.service.send_notification(
                "🎉 Goal complete!",
                &message,
                DispatchOptions::tagged(format!("goal-complete-{}", goal_type)),
            );
        }
    }

    fn congratulate(&self, goal_type: GoalType, threshold: u32) {
        tracing::info!("{} reached {}% of goal", goal_type, threshold);
        let settings = self.service.settings();
        self.service.toasts().info(
            &format!("{}% of your {} goal!", threshold, goal_type.label()),
            ToastOptions::described("You're on track, keep it up!")
                .with_icon("target")
                .with_duration(Duration::from_secs(settings.milestone_toast_secs)),
        );
    }
}
