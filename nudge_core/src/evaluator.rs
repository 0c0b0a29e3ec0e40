//! Smart reminder evaluator.
//!
//! One evaluation cycle:
//! 1. **Throttle**: skip if the previous cycle started less than the
//!    throttle window ago (process-local, best effort)
//! 2. **Fetch**: today's metrics, active goals and active smart reminders,
//!    requested together; any failure aborts the cycle with no side effects
//! 3. **Match**: progress against the reminder's goal must fall in its
//!    configured trigger band
//! 4. **Dedup**: a reminder already triggered today is skipped
//! 5. **Fire**: dispatch, then write `last_triggered` back to the store

use crate::dispatch::DispatchOptions;
use crate::messages;
use crate::service::NotificationService;
use crate::store::{GoalStore, MetricFilter, MetricStore, ReminderPatch, ReminderStore};
use crate::{Error, Goal, MetricSnapshot, Reminder, ReminderType, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Why a reminder did not fire this cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Smart reminder without a trigger band
    NoTrigger,
    /// No active goal matches the reminder type
    NoGoal,
    /// Goal target is zero or negative
    NoTarget,
    BandMismatch,
    AlreadyToday,
    NoMessage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FiredReminder {
    pub reminder_id: String,
    pub reminder_type: ReminderType,
    pub tag: String,
    pub message: String,
    pub progress: f64,
    /// Whether `last_triggered` was saved
    pub persisted: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleReport {
    pub fired: Vec<FiredReminder>,
    pub skipped: Vec<(String, SkipReason)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// The previous cycle was too recent
    Throttled,
    /// A fetch failed; nothing was dispatched or written
    Aborted { reason: String },
    Completed(CycleReport),
}

enum Decision {
    Skip(SkipReason),
    Fire { message: String, progress: f64 },
}

pub struct SmartReminderEvaluator {
    service: Arc<NotificationService>,
    metrics: Arc<dyn MetricStore>,
    goals: Arc<dyn GoalStore>,
    reminders: Arc<dyn ReminderStore>,
    throttle: Duration,
    last_check: Mutex<Option<DateTime<Utc>>>,
}

impl SmartReminderEvaluator {
    pub fn new(
        service: Arc<NotificationService>,
        metrics: Arc<dyn MetricStore>,
        goals: Arc<dyn GoalStore>,
        reminders: Arc<dyn ReminderStore>,
        throttle: Duration,
    ) -> Self {
        Self {
            service,
            metrics,
            goals,
            reminders,
            throttle,
            last_check: Mutex::new(None),
        }
    }

    /// Run one cycle unless the previous one is inside the throttle window
    pub async fn run_cycle_once(&self) -> CycleOutcome {
        let now = self.service.clock().now();
        {
            let mut last = self.last_check.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = *last {
                if now >= previous && now - previous < self.throttle {
                    tracing::debug!(
                        "Smart reminders checked {}s ago, skipping",
                        (now - previous).num_seconds()
                    );
                    return CycleOutcome::Throttled;
                }
            }
            *last = Some(now);
        }

        self.evaluate(now).await
    }

    /// Run one cycle regardless of the throttle window
    pub async fn force_cycle(&self) -> CycleOutcome {
        let now = self.service.clock().now();
        *self.last_check.lock().unwrap_or_else(|e| e.into_inner()) = Some(now);
        self.evaluate(now).await
    }

    /// Run a cycle now, then keep running one every `interval`
    ///
    /// The first cycle honours the throttle. Timer-driven cycles skip it and
    /// only run while notification permission is granted.
    /// The returned handle stops the timer when stopped or dropped. Requires a
    /// running tokio runtime.
    pub fn start(self: &Arc<Self>, interval: std::time::Duration) -> Result<ReminderSchedule> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Other(format!("No async runtime to schedule reminders: {}", e)))?;

        let evaluator = Arc::clone(self);
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            ticker.tick().await;
            evaluator.run_cycle_once().await;

            loop {
                ticker.tick().await;
                if !evaluator.service.gate().is_granted() {
                    tracing::debug!("Notification permission not granted, timer cycle skipped");
                    continue;
                }
                // The ticker sets the cadence; the wall-clock throttle would
                // reject ticks that land a little early
                evaluator.force_cycle().await;
            }
        });

        tracing::info!(
            "Smart reminders scheduled every {} minutes",
            interval.as_secs() / 60
        );
        Ok(ReminderSchedule { task })
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> CycleOutcome {
        let today = self.service.clock().date_of(now);

        let fetched = tokio::try_join!(
            self.metrics.filter(MetricFilter::Date(today)),
            self.goals.filter_active(),
            self.reminders.filter_smart_active(),
        );
        let (metrics, goals, reminders) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!("Error checking smart reminders: {}", e);
                return CycleOutcome::Aborted {
                    reason: e.to_string(),
                };
            }
        };

        let snapshot = metrics.first();
        let mut report = CycleReport::default();

        for reminder in &reminders {
            match self.decide(reminder, snapshot, &goals, today) {
                Decision::Skip(reason) => {
                    tracing::debug!("Reminder {} skipped: {:?}", reminder.id, reason);
                    report.skipped.push((reminder.id.clone(), reason));
                }
                Decision::Fire { message, progress } => {
                    let fired = self.fire(reminder, message, progress, now, today).await;
                    report.fired.push(fired);
                }
            }
        }

        tracing::info!(
            "Smart reminder cycle: {} fired, {} skipped",
            report.fired.len(),
            report.skipped.len()
        );
        CycleOutcome::Completed(report)
    }

    fn decide(
        &self,
        reminder: &Reminder,
        snapshot: Option<&MetricSnapshot>,
        goals: &[Goal],
        today: NaiveDate,
    ) -> Decision {
        let Some(trigger) = reminder.smart_trigger else {
            return Decision::Skip(SkipReason::NoTrigger);
        };
        let Some(goal) = reminder
            .reminder_type
            .goal_type()
            .and_then(|goal_type| goals.iter().find(|g| g.goal_type == goal_type))
        else {
            return Decision::Skip(SkipReason::NoGoal);
        };
        if goal.target_value <= 0.0 {
            return Decision::Skip(SkipReason::NoTarget);
        }

        let current = snapshot
            .map(|s| s.value_for(goal.goal_type))
            .unwrap_or(0.0);
        let progress = current / goal.target_value * 100.0;

        if !trigger.matches(progress) {
            return Decision::Skip(SkipReason::BandMismatch);
        }

        let clock = self.service.clock();
        if reminder
            .last_triggered
            .is_some_and(|at| clock.date_of(at) == today)
        {
            return Decision::Skip(SkipReason::AlreadyToday);
        }

        match messages::select_message(
            reminder.reminder_type,
            progress,
            current,
            goal.target_value,
            self.service.random(),
        ) {
            Some(message) => Decision::Fire { message, progress },
            None => Decision::Skip(SkipReason::NoMessage),
        }
    }

    async fn fire(
        &self,
        reminder: &Reminder,
        message: String,
        progress: f64,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> FiredReminder {
        let tag = format!(
            "smart-{}-{}",
            reminder.reminder_type,
            today.format("%Y-%m-%d")
        );

        self.service
            .send_notification(&reminder.title, &message, DispatchOptions::tagged(tag.clone()));
        tracing::info!(
            "Smart reminder {} fired at {:.0}% progress",
            reminder.id,
            progress
        );

        let persisted = match self
            .reminders
            .update(&reminder.id, ReminderPatch::triggered_at(now))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to record last_triggered for reminder {}: {}",
                    reminder.id,
                    e
                );
                false
            }
        };

        FiredReminder {
            reminder_id: reminder.id.clone(),
            reminder_type: reminder.reminder_type,
            tag,
            message,
            progress,
            persisted,
        }
    }
}

/// Handle on the periodic evaluation task
pub struct ReminderSchedule {
    task: JoinHandle<()>,
}

impl ReminderSchedule {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ReminderSchedule {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::config::NotificationConfig;
    use crate::random::FixedRandom;
    use crate::store::{InMemoryStore, NewMetric, NewReminder};
    use crate::testing::{RecordingHost, RecordingToasts};
    use crate::{GoalPeriod, GoalType, Permission, SmartTrigger};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct Fixture {
        store: Arc<InMemoryStore>,
        host: Arc<RecordingHost>,
        toasts: Arc<RecordingToasts>,
        clock: Arc<ManualClock>,
        service: Arc<NotificationService>,
    }

    fn fixture(permission: Permission) -> Fixture {
        fixture_at(permission, Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap())
    }

    fn fixture_at(permission: Permission, now: DateTime<Utc>) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let host = Arc::new(RecordingHost::new(permission));
        let toasts = Arc::new(RecordingToasts::default());
        let clock = Arc::new(ManualClock::new(now));
        let service = Arc::new(NotificationService::new(
            host.clone(),
            toasts.clone(),
            clock.clone(),
            Arc::new(FixedRandom(0)),
            NotificationConfig::default(),
        ));
        Fixture {
            store,
            host,
            toasts,
            clock,
            service,
        }
    }

    impl Fixture {
        fn evaluator(&self) -> SmartReminderEvaluator {
            SmartReminderEvaluator::new(
                self.service.clone(),
                self.store.clone(),
                self.store.clone(),
                self.store.clone(),
                Duration::minutes(30),
            )
        }

        fn goal(&self, goal_type: GoalType, target: f64) {
            self.store.insert_goal(Goal {
                id: format!("goal-{}", goal_type),
                goal_type,
                target_value: target,
                unit: goal_type.unit().into(),
                period: GoalPeriod::Daily,
                is_active: true,
            });
        }

        async fn metric(&self, goal_type: GoalType, value: f64) {
            MetricStore::create(
                self.store.as_ref(),
                NewMetric {
                    date: self.clock.today(),
                    fields: crate::store::MetricPatch::default().set(goal_type, value),
                },
            )
            .await
            .unwrap();
        }

        async fn smart(&self, reminder_type: ReminderType, trigger: SmartTrigger) -> Reminder {
            ReminderStore::create(
                self.store.as_ref(),
                NewReminder::smart(reminder_type, trigger, "Smart reminder"),
            )
            .await
            .unwrap()
        }
    }

    fn report(outcome: CycleOutcome) -> CycleReport {
        match outcome {
            CycleOutcome::Completed(report) => report,
            other => panic!("expected completed cycle, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_below_50_fires_once_per_day() {
        crate::logging::init_test();
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Steps, 10000.0);
        fx.metric(GoalType::Steps, 2000.0).await;
        let reminder = fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;
        let evaluator = fx.evaluator();

        let first = report(evaluator.run_cycle_once().await);
        assert_eq!(first.fired.len(), 1);
        assert_eq!(first.fired[0].tag, "smart-steps-2024-06-12");
        assert!(first.fired[0].persisted);
        assert_eq!(fx.host.shown().len(), 1);
        assert_eq!(fx.host.shown()[0].title, "Smart reminder");
        assert_eq!(
            fx.store.reminder(&reminder.id).unwrap().last_triggered,
            Some(fx.clock.now())
        );

        // Same day, outside the throttle window: dedup kicks in
        fx.clock.advance(Duration::hours(1));
        let second = report(evaluator.run_cycle_once().await);
        assert!(second.fired.is_empty());
        assert_eq!(
            second.skipped,
            vec![(reminder.id.clone(), SkipReason::AlreadyToday)]
        );
        assert_eq!(fx.host.shown().len(), 1);
    }

    #[tokio::test]
    async fn test_fires_again_next_day() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Water, 2000.0);
        fx.smart(ReminderType::Water, SmartTrigger::Below50).await;
        let evaluator = fx.evaluator();

        assert_eq!(report(evaluator.run_cycle_once().await).fired.len(), 1);
        fx.clock.advance(Duration::days(1));
        let next = report(evaluator.run_cycle_once().await);
        assert_eq!(next.fired.len(), 1);
        assert_eq!(next.fired[0].tag, "smart-water-2024-06-13");
    }

    #[tokio::test]
    async fn test_throttle_allows_one_pass() {
        let fx = fixture(Permission::Granted);
        let evaluator = fx.evaluator();

        assert!(matches!(
            evaluator.run_cycle_once().await,
            CycleOutcome::Completed(_)
        ));
        fx.clock.advance(Duration::minutes(29));
        assert_eq!(evaluator.run_cycle_once().await, CycleOutcome::Throttled);
        fx.clock.advance(Duration::minutes(1));
        assert!(matches!(
            evaluator.run_cycle_once().await,
            CycleOutcome::Completed(_)
        ));
    }

    #[tokio::test]
    async fn test_band_mismatch_and_missing_goal_skip() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Water, 2000.0);
        fx.metric(GoalType::Water, 1200.0).await; // 60%
        let below_50 = fx.smart(ReminderType::Water, SmartTrigger::Below50).await;
        let sleep = fx.smart(ReminderType::Sleep, SmartTrigger::Below75).await;
        let meal = fx.smart(ReminderType::Meal, SmartTrigger::Below50).await;

        let report = report(fx.evaluator().run_cycle_once().await);

        assert!(report.fired.is_empty());
        assert!(report
            .skipped
            .contains(&(below_50.id, SkipReason::BandMismatch)));
        assert!(report.skipped.contains(&(sleep.id, SkipReason::NoGoal)));
        assert!(report.skipped.contains(&(meal.id, SkipReason::NoGoal)));
        assert!(fx.host.shown().is_empty());
        assert!(fx.toasts.shown().is_empty());
    }

    #[tokio::test]
    async fn test_near_goal_band_is_inclusive_at_75() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Water, 2000.0);
        fx.metric(GoalType::Water, 1500.0).await;
        let below_75 = fx.smart(ReminderType::Water, SmartTrigger::Below75).await;
        let near = fx.smart(ReminderType::Water, SmartTrigger::NearGoal).await;

        let report = report(fx.evaluator().run_cycle_once().await);

        assert_eq!(report.fired.len(), 1);
        assert_eq!(report.fired[0].reminder_id, near.id);
        assert_eq!(
            report.fired[0].message,
            "💧 Almost there! Just 500ml more to reach your goal"
        );
        assert_eq!(report.skipped, vec![(below_75.id, SkipReason::BandMismatch)]);
    }

    #[tokio::test]
    async fn test_zero_target_is_skipped() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Steps, 0.0);
        let reminder = fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;

        let report = report(fx.evaluator().run_cycle_once().await);
        assert_eq!(report.skipped, vec![(reminder.id, SkipReason::NoTarget)]);
    }

    #[tokio::test]
    async fn test_denied_permission_dispatches_toast() {
        let fx = fixture(Permission::Denied);
        fx.goal(GoalType::Steps, 10000.0);
        fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;

        let report = report(fx.evaluator().run_cycle_once().await);

        assert_eq!(report.fired.len(), 1);
        assert!(fx.host.shown().is_empty());
        assert_eq!(fx.toasts.shown().len(), 1);
    }

    struct FailingGoals;

    #[async_trait]
    impl GoalStore for FailingGoals {
        async fn filter_active(&self) -> Result<Vec<Goal>> {
            Err(Error::Store("backend unreachable".into()))
        }
        async fn list(&self) -> Result<Vec<Goal>> {
            Err(Error::Store("backend unreachable".into()))
        }
        async fn create(&self, _goal: crate::store::NewGoal) -> Result<Goal> {
            Err(Error::Store("backend unreachable".into()))
        }
        async fn update(&self, _id: &str, _patch: crate::store::GoalPatch) -> Result<Goal> {
            Err(Error::Store("backend unreachable".into()))
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            Err(Error::Store("backend unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_without_side_effects() {
        let fx = fixture(Permission::Granted);
        let reminder = fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;
        let evaluator = SmartReminderEvaluator::new(
            fx.service.clone(),
            fx.store.clone(),
            Arc::new(FailingGoals),
            fx.store.clone(),
            Duration::minutes(30),
        );

        let outcome = evaluator.run_cycle_once().await;

        assert!(matches!(outcome, CycleOutcome::Aborted { .. }));
        assert!(fx.host.shown().is_empty());
        assert!(fx.toasts.shown().is_empty());
        assert!(fx.store.reminder(&reminder.id).unwrap().last_triggered.is_none());
    }

    struct ReadOnlyReminders(Arc<InMemoryStore>);

    #[async_trait]
    impl ReminderStore for ReadOnlyReminders {
        async fn filter_smart_active(&self) -> Result<Vec<Reminder>> {
            self.0.filter_smart_active().await
        }
        async fn list(&self) -> Result<Vec<Reminder>> {
            ReminderStore::list(self.0.as_ref()).await
        }
        async fn create(&self, _reminder: NewReminder) -> Result<Reminder> {
            Err(Error::Store("read only".into()))
        }
        async fn update(&self, _id: &str, _patch: ReminderPatch) -> Result<Reminder> {
            Err(Error::Store("read only".into()))
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            Err(Error::Store("read only".into()))
        }
    }

    #[tokio::test]
    async fn test_persist_failure_still_notifies() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Steps, 10000.0);
        fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;
        let evaluator = SmartReminderEvaluator::new(
            fx.service.clone(),
            fx.store.clone(),
            fx.store.clone(),
            Arc::new(ReadOnlyReminders(fx.store.clone())),
            Duration::minutes(30),
        );

        let report = report(evaluator.run_cycle_once().await);

        assert_eq!(report.fired.len(), 1);
        assert!(!report.fired[0].persisted);
        assert_eq!(fx.host.shown().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_runs_and_stops() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Water, 2000.0);
        fx.smart(ReminderType::Water, SmartTrigger::Below50).await;
        let evaluator = Arc::new(fx.evaluator());

        let schedule = evaluator.start(std::time::Duration::from_secs(1800)).unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert_eq!(fx.host.shown().len(), 1);

        // Next day, next tick fires again
        fx.clock.advance(Duration::days(1));
        tokio::time::sleep(std::time::Duration::from_secs(1800)).await;
        assert_eq!(fx.host.shown().len(), 2);

        schedule.stop();
        fx.clock.advance(Duration::days(1));
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        assert_eq!(fx.host.shown().len(), 2);
        assert!(!schedule.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_tick_not_throttled_by_wall_clock() {
        // Ten minutes before midnight; the wall clock lags the timer below
        let fx = fixture_at(
            Permission::Granted,
            Utc.with_ymd_and_hms(2024, 6, 12, 23, 50, 0).unwrap(),
        );
        fx.goal(GoalType::Steps, 10000.0);
        fx.smart(ReminderType::Steps, SmartTrigger::Below50).await;
        let evaluator = Arc::new(fx.evaluator());

        let _schedule = evaluator.start(std::time::Duration::from_secs(1800)).unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert_eq!(fx.host.shown().len(), 1);

        // Only 20 wall-clock minutes pass before the next tick, but it is a new day
        fx.clock.advance(Duration::minutes(20));
        tokio::time::sleep(std::time::Duration::from_secs(1800)).await;
        let shown = fx.host.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].tag, "smart-steps-2024-06-13");

        // An ad-hoc call right after the tick is still throttled
        assert_eq!(evaluator.run_cycle_once().await, CycleOutcome::Throttled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_pause_without_permission() {
        let fx = fixture(Permission::Denied);
        fx.goal(GoalType::Water, 2000.0);
        fx.smart(ReminderType::Water, SmartTrigger::Below50).await;
        let evaluator = Arc::new(fx.evaluator());

        let _schedule = evaluator.start(std::time::Duration::from_secs(1800)).unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert_eq!(fx.toasts.shown().len(), 1);

        fx.clock.advance(Duration::days(1));
        tokio::time::sleep(std::time::Duration::from_secs(1800)).await;
        assert_eq!(fx.toasts.shown().len(), 1);
    }

    #[tokio::test]
    async fn test_smart_reminder_without_trigger_is_skipped() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Water, 2000.0);
        let bare = Reminder {
            id: "imported".into(),
            reminder_type: ReminderType::Water,
            title: "Imported".into(),
            message: String::new(),
            time: None,
            days: crate::types::all_days(),
            is_active: true,
            is_smart: true,
            smart_trigger: None,
            last_triggered: None,
            created_at: None,
        };
        fx.store.insert_reminder(bare.clone());
        fx.store.insert_reminder(Reminder {
            id: "paused".into(),
            is_active: false,
            smart_trigger: Some(SmartTrigger::Below50),
            ..bare
        });

        let report = report(fx.evaluator().run_cycle_once().await);

        assert!(report.fired.is_empty());
        assert_eq!(report.skipped, vec![("imported".to_string(), SkipReason::NoTrigger)]);
        assert!(fx.host.shown().is_empty());
    }

    #[tokio::test]
    async fn test_band_without_pool_skips_without_writing() {
        let fx = fixture(Permission::Granted);
        fx.goal(GoalType::Sleep, 8.0);
        fx.metric(GoalType::Sleep, 2.0).await; // 25%
        let reminder = fx.smart(ReminderType::Sleep, SmartTrigger::Below50).await;

        let report = report(fx.evaluator().run_cycle_once().await);

        assert!(report.fired.is_empty());
        assert_eq!(report.skipped, vec![(reminder.id.clone(), SkipReason::NoMessage)]);
        assert!(fx.host.shown().is_empty());
        assert!(fx.toasts.shown().is_empty());
        assert!(fx.store.reminder(&reminder.id).unwrap().last_triggered.is_none());
    }

    #[test]
    fn test_start_without_runtime_errors() {
        let fx = fixture(Permission::Granted);
        let evaluator = Arc::new(fx.evaluator());
        assert!(evaluator.start(std::time::Duration::from_secs(60)).is_err());
    }
}
