//! Store seams for metrics, goals and reminders.
//!
//! The reminder core only reads metrics and goals and only writes
//! `last_triggered` back to reminders; the wider create/update/delete
//! surface serves metric recording and smart-reminder setup.

use crate::{
    Error, Goal, GoalPeriod, GoalType, MetricSnapshot, Reminder, ReminderType, Result,
    SmartTrigger,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Filters and patches
// ============================================================================

/// Metric query: one exact date or an inclusive date range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricFilter {
    Date(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl MetricFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            MetricFilter::Date(d) => d == date,
            MetricFilter::Range { start, end } => start <= date && date <= end,
        }
    }
}

/// Field values to write on a metric snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricPatch {
    pub values: BTreeMap<GoalType, f64>,
}

impl MetricPatch {
    pub fn set(mut self, goal_type: GoalType, value: f64) -> Self {
        self.values.insert(goal_type, value);
        self
    }

    pub fn apply(&self, snapshot: &mut MetricSnapshot) {
        for (goal_type, value) in &self.values {
            snapshot.set_value(*goal_type, *value);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMetric {
    pub date: NaiveDate,
    pub fields: MetricPatch,
}

impl NewMetric {
    pub fn into_snapshot(self) -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::empty(new_id(), self.date);
        self.fields.apply(&mut snapshot);
        snapshot
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewGoal {
    pub goal_type: GoalType,
    pub target_value: f64,
    pub period: GoalPeriod,
}

impl NewGoal {
    pub fn into_goal(self) -> Result<Goal> {
        if !(self.target_value > 0.0) {
            return Err(Error::Validation(format!(
                "Goal target must be positive, got {}",
                self.target_value
            )));
        }
        Ok(Goal {
            id: new_id(),
            goal_type: self.goal_type,
            target_value: self.target_value,
            unit: self.goal_type.unit().to_string(),
            period: self.period,
            is_active: true,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalPatch {
    pub target_value: Option<f64>,
    pub period: Option<GoalPeriod>,
    pub is_active: Option<bool>,
}

impl GoalPatch {
    pub fn apply(&self, goal: &mut Goal) {
        if let Some(target) = self.target_value {
            goal.target_value = target;
        }
        if let Some(period) = self.period {
            goal.period = period;
        }
        if let Some(active) = self.is_active {
            goal.is_active = active;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewReminder {
    pub reminder_type: ReminderType,
    pub title: String,
    pub message: String,
    pub time: Option<String>,
    pub days: Vec<String>,
    pub is_active: bool,
    pub is_smart: bool,
    pub smart_trigger: Option<SmartTrigger>,
}

impl NewReminder {
    /// Active smart reminder firing in `trigger`'s band, every day
    pub fn smart(
        reminder_type: ReminderType,
        trigger: SmartTrigger,
        title: impl Into<String>,
    ) -> Self {
        Self {
            reminder_type,
            title: title.into(),
            message: format!("Reminder based on your {} progress", reminder_type),
            time: None,
            days: crate::types::all_days(),
            is_active: true,
            is_smart: true,
            smart_trigger: Some(trigger),
        }
    }

    pub fn into_reminder(self, created_at: DateTime<Utc>) -> Result<Reminder> {
        if self.is_smart && self.smart_trigger.is_none() {
            return Err(Error::Validation(
                "Smart reminders need a smart_trigger".into(),
            ));
        }
        Ok(Reminder {
            id: new_id(),
            reminder_type: self.reminder_type,
            title: self.title,
            message: self.message,
            time: self.time,
            days: self.days,
            is_active: self.is_active,
            is_smart: self.is_smart,
            smart_trigger: self.smart_trigger,
            last_triggered: None,
            created_at: Some(created_at),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReminderPatch {
    pub last_triggered: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub smart_trigger: Option<SmartTrigger>,
}

impl ReminderPatch {
    pub fn triggered_at(at: DateTime<Utc>) -> Self {
        Self {
            last_triggered: Some(at),
            ..Default::default()
        }
    }

    pub fn apply(&self, reminder: &mut Reminder) {
        if let Some(at) = self.last_triggered {
            reminder.last_triggered = Some(at);
        }
        if let Some(active) = self.is_active {
            reminder.is_active = active;
        }
        if let Some(title) = &self.title {
            reminder.title = title.clone();
        }
        if let Some(message) = &self.message {
            reminder.message = message.clone();
        }
        if let Some(trigger) = self.smart_trigger {
            reminder.smart_trigger = Some(trigger);
        }
    }
}

// ============================================================================
// Store traits
// ============================================================================

#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn filter(&self, filter: MetricFilter) -> Result<Vec<MetricSnapshot>>;
    async fn create(&self, metric: NewMetric) -> Result<MetricSnapshot>;
    async fn update(&self, id: &str, patch: MetricPatch) -> Result<MetricSnapshot>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn filter_active(&self) -> Result<Vec<Goal>>;
    async fn list(&self) -> Result<Vec<Goal>>;
    async fn create(&self, goal: NewGoal) -> Result<Goal>;
    async fn update(&self, id: &str, patch: GoalPatch) -> Result<Goal>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Reminders with `is_smart` and `is_active` both set
    async fn filter_smart_active(&self) -> Result<Vec<Reminder>>;
    async fn list(&self) -> Result<Vec<Reminder>>;
    async fn create(&self, reminder: NewReminder) -> Result<Reminder>;
    async fn update(&self, id: &str, patch: ReminderPatch) -> Result<Reminder>;
    async fn delete(&self, id: &str) -> Result<()>;
}

// ============================================================================
// Collection operations shared by the concrete stores
// ============================================================================

pub(crate) fn filter_metrics(
    metrics: &[MetricSnapshot],
    filter: MetricFilter,
) -> Vec<MetricSnapshot> {
    metrics
        .iter()
        .filter(|m| filter.matches(m.date))
        .cloned()
        .collect()
}

pub(crate) fn update_metric(
    metrics: &mut [MetricSnapshot],
    id: &str,
    patch: &MetricPatch,
) -> Result<MetricSnapshot> {
    let snapshot = metrics
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| Error::Store(format!("No metric snapshot with id {}", id)))?;
    patch.apply(snapshot);
    Ok(snapshot.clone())
}

pub(crate) fn update_goal(goals: &mut [Goal], id: &str, patch: &GoalPatch) -> Result<Goal> {
    let goal = goals
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| Error::Store(format!("No goal with id {}", id)))?;
    patch.apply(goal);
    Ok(goal.clone())
}

pub(crate) fn update_reminder(
    reminders: &mut [Reminder],
    id: &str,
    patch: &ReminderPatch,
) -> Result<Reminder> {
    let reminder = reminders
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::Store(format!("No reminder with id {}", id)))?;
    patch.apply(reminder);
    Ok(reminder.clone())
}

pub(crate) fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &str,
    id_of: impl Fn(&T) -> &str,
    what: &str,
) -> Result<()> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return Err(Error::Store(format!("No {} with id {}", what, id)));
    }
    Ok(())
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct Tables {
    metrics: Vec<MetricSnapshot>,
    goals: Vec<Goal>,
    reminders: Vec<Reminder>,
}

/// Process-local store backing all three collections
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_metric(&self, snapshot: MetricSnapshot) {
        self.lock().metrics.push(snapshot);
    }

    pub fn insert_goal(&self, goal: Goal) {
        self.lock().goals.push(goal);
    }

    pub fn insert_reminder(&self, reminder: Reminder) {
        self.lock().reminders.push(reminder);
    }

    pub fn reminder(&self, id: &str) -> Option<Reminder> {
        self.lock().reminders.iter().find(|r| r.id == id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MetricStore for InMemoryStore {
    async fn filter(&self, filter: MetricFilter) -> Result<Vec<MetricSnapshot>> {
        Ok(filter_metrics(&self.lock().metrics, filter))
    }

    async fn create(&self, metric: NewMetric) -> Result<MetricSnapshot> {
        let snapshot = metric.into_snapshot();
        self.lock().metrics.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn update(&self, id: &str, patch: MetricPatch) -> Result<MetricSnapshot> {
        update_metric(&mut self.lock().metrics, id, &patch)
    }
}

#[async_trait]
impl GoalStore for InMemoryStore {
    async fn filter_active(&self) -> Result<Vec<Goal>> {
        Ok(self.lock().goals.iter().filter(|g| g.is_active).cloned().collect())
    }

    async fn list(&self) -> Result<Vec<Goal>> {
        Ok(self.lock().goals.clone())
    }

    async fn create(&self, goal: NewGoal) -> Result<Goal> {
        let goal = goal.into_goal()?;
        self.lock().goals.push(goal.clone());
        Ok(goal)
    }

    async fn update(&self, id: &str, patch: GoalPatch) -> Result<Goal> {
        update_goal(&mut self.lock().goals, id, &patch)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        remove_by_id(&mut self.lock().goals, id, |g| g.id.as_str(), "goal")
    }
}

#[async_trait]
impl ReminderStore for InMemoryStore {
    async fn filter_smart_active(&self) -> Result<Vec<Reminder>> {
        Ok(self
            .lock()
            .reminders
            .iter()
            .filter(|r| r.is_smart && r.is_active)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Reminder>> {
        Ok(self.lock().reminders.clone())
    }

    async fn create(&self, reminder: NewReminder) -> Result<Reminder> {
        let reminder = reminder.into_reminder(Utc::now())?;
        self.lock().reminders.push(reminder.clone());
        Ok(reminder)
    }

    async fn update(&self, id: &str, patch: ReminderPatch) -> Result<Reminder> {
        update_reminder(&mut self.lock().reminders, id, &patch)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        remove_by_id(&mut self.lock().reminders, id, |r| r.id.as_str(), "reminder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_filter_matches() {
        assert!(MetricFilter::Date(date(3)).matches(date(3)));
        assert!(!MetricFilter::Date(date(3)).matches(date(4)));
        let range = MetricFilter::Range {
            start: date(1),
            end: date(7),
        };
        assert!(range.matches(date(1)));
        assert!(range.matches(date(7)));
        assert!(!range.matches(date(8)));
    }

    #[tokio::test]
    async fn test_metric_create_and_update() {
        let store = InMemoryStore::new();
        let created = MetricStore::create(
            &store,
            NewMetric {
                date: date(2),
                fields: MetricPatch::default().set(GoalType::Water, 250.0),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.water_ml, 250);

        let updated = MetricStore::update(
            &store,
            &created.id,
            MetricPatch::default().set(GoalType::Steps, 1200.0),
        )
        .await
        .unwrap();
        assert_eq!(updated.water_ml, 250);
        assert_eq!(updated.steps, 1200);

        let found = store.filter(MetricFilter::Date(date(2))).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.filter(MetricFilter::Date(date(3))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_smart_active_filter() {
        let store = InMemoryStore::new();
        let smart = ReminderStore::create(
            &store,
            NewReminder::smart(ReminderType::Water, SmartTrigger::Below50, "Drink"),
        )
        .await
        .unwrap();
        let mut plain = NewReminder::smart(ReminderType::Meal, SmartTrigger::Below50, "Eat");
        plain.is_smart = false;
        plain.smart_trigger = None;
        ReminderStore::create(&store, plain).await.unwrap();
        let paused = ReminderStore::create(
            &store,
            NewReminder::smart(ReminderType::Steps, SmartTrigger::NearGoal, "Walk"),
        )
        .await
        .unwrap();
        ReminderStore::update(
            &store,
            &paused.id,
            ReminderPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = store.filter_smart_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, smart.id);
    }

    #[tokio::test]
    async fn test_goal_validation_and_delete() {
        let store = InMemoryStore::new();
        let bad = GoalStore::create(
            &store,
            NewGoal {
                goal_type: GoalType::Steps,
                target_value: 0.0,
                period: GoalPeriod::Daily,
            },
        )
        .await;
        assert!(matches!(bad, Err(Error::Validation(_))));

        let goal = GoalStore::create(
            &store,
            NewGoal {
                goal_type: GoalType::Steps,
                target_value: 8000.0,
                period: GoalPeriod::Daily,
            },
        )
        .await
        .unwrap();
        assert_eq!(goal.unit, "steps");
        GoalStore::delete(&store, &goal.id).await.unwrap();
        assert!(GoalStore::delete(&store, &goal.id).await.is_err());
    }
}
