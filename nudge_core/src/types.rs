//! Core domain types for the nudge reminder system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Goals and the metric types they track
//! - Daily metric snapshots
//! - Reminders and their smart trigger bands
//! - Notification permission and ephemeral notification events

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Goal Types
// ============================================================================

/// Metric a goal targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Water,
    Steps,
    Sleep,
    CaloriesBurn,
    CaloriesIntake,
    Weight,
    ExerciseMinutes,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Water => "water",
            GoalType::Steps => "steps",
            GoalType::Sleep => "sleep",
            GoalType::CaloriesBurn => "calories_burn",
            GoalType::CaloriesIntake => "calories_intake",
            GoalType::Weight => "weight",
            GoalType::ExerciseMinutes => "exercise_minutes",
        }
    }

    /// Short noun used in milestone messages ("50% of your water goal")
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::Water => "hydration",
            GoalType::Steps => "steps",
            GoalType::Sleep => "sleep",
            GoalType::CaloriesBurn => "calories",
            GoalType::CaloriesIntake => "calorie intake",
            GoalType::Weight => "weight",
            GoalType::ExerciseMinutes => "exercise",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            GoalType::Water => "ml",
            GoalType::Steps => "steps",
            GoalType::Sleep => "hours",
            GoalType::CaloriesBurn | GoalType::CaloriesIntake => "kcal",
            GoalType::Weight => "kg",
            GoalType::ExerciseMinutes => "min",
        }
    }

    /// Target suggested when a goal of this type is created without one
    pub fn default_target(&self) -> f64 {
        match self {
            GoalType::Steps => 10_000.0,
            GoalType::CaloriesBurn => 500.0,
            GoalType::CaloriesIntake => 2_000.0,
            GoalType::Water => 2_000.0,
            GoalType::Sleep => 8.0,
            GoalType::Weight => 70.0,
            GoalType::ExerciseMinutes => 30.0,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(GoalType::Water),
            "steps" => Ok(GoalType::Steps),
            "sleep" => Ok(GoalType::Sleep),
            "calories_burn" | "calories" => Ok(GoalType::CaloriesBurn),
            "calories_intake" => Ok(GoalType::CaloriesIntake),
            "weight" => Ok(GoalType::Weight),
            "exercise_minutes" | "exercise" => Ok(GoalType::ExerciseMinutes),
            other => Err(Error::Validation(format!("Unknown goal type: {}", other))),
        }
    }
}

/// How often a goal resets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for GoalPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(GoalPeriod::Daily),
            "weekly" => Ok(GoalPeriod::Weekly),
            "monthly" => Ok(GoalPeriod::Monthly),
            other => Err(Error::Validation(format!("Unknown goal period: {}", other))),
        }
    }
}

/// A user goal; only `is_active` goals are considered current
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub period: GoalPeriod,
    pub is_active: bool,
}

// ============================================================================
// Metric Snapshots
// ============================================================================

/// One day of tracked metrics for the user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub steps: u64,
    #[serde(default)]
    pub water_ml: u64,
    #[serde(default)]
    pub sleep_hours: f64,
    #[serde(default)]
    pub calories_burned: u64,
    #[serde(default)]
    pub calories_consumed: u64,
    #[serde(default)]
    pub exercise_minutes: u64,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl MetricSnapshot {
    /// An all-zero snapshot for `date`
    pub fn empty(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            steps: 0,
            water_ml: 0,
            sleep_hours: 0.0,
            calories_burned: 0,
            calories_consumed: 0,
            exercise_minutes: 0,
            weight_kg: None,
        }
    }

    /// Current value of the field a goal of `goal_type` tracks
    pub fn value_for(&self, goal_type: GoalType) -> f64 {
        match goal_type {
            GoalType::Water => self.water_ml as f64,
            GoalType::Steps => self.steps as f64,
            GoalType::Sleep => self.sleep_hours,
            GoalType::CaloriesBurn => self.calories_burned as f64,
            GoalType::CaloriesIntake => self.calories_consumed as f64,
            GoalType::Weight => self.weight_kg.unwrap_or(0.0),
            GoalType::ExerciseMinutes => self.exercise_minutes as f64,
        }
    }

    /// Overwrite the field for `goal_type`; negative values clamp to zero
    pub fn set_value(&mut self, goal_type: GoalType, value: f64) {
        let value = value.max(0.0);
        let whole = value.round() as u64;
        match goal_type {
            GoalType::Water => self.water_ml = whole,
            GoalType::Steps => self.steps = whole,
            GoalType::Sleep => self.sleep_hours = value,
            GoalType::CaloriesBurn => self.calories_burned = whole,
            GoalType::CaloriesIntake => self.calories_consumed = whole,
            GoalType::Weight => self.weight_kg = Some(value),
            GoalType::ExerciseMinutes => self.exercise_minutes = whole,
        }
    }
}

// ============================================================================
// Reminders
// ============================================================================

/// Category of reminder
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Water,
    Steps,
    Meal,
    Sleep,
    Exercise,
    Custom,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::Water => "water",
            ReminderType::Steps => "steps",
            ReminderType::Meal => "meal",
            ReminderType::Sleep => "sleep",
            ReminderType::Exercise => "exercise",
            ReminderType::Custom => "custom",
        }
    }

    /// Goal whose progress drives a smart reminder of this type
    pub fn goal_type(&self) -> Option<GoalType> {
        match self {
            ReminderType::Water => Some(GoalType::Water),
            ReminderType::Steps => Some(GoalType::Steps),
            ReminderType::Sleep => Some(GoalType::Sleep),
            ReminderType::Meal | ReminderType::Exercise | ReminderType::Custom => None,
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(ReminderType::Water),
            "steps" => Ok(ReminderType::Steps),
            "meal" => Ok(ReminderType::Meal),
            "sleep" => Ok(ReminderType::Sleep),
            "exercise" => Ok(ReminderType::Exercise),
            "custom" => Ok(ReminderType::Custom),
            other => Err(Error::Validation(format!("Unknown reminder type: {}", other))),
        }
    }
}

/// Coarse progress bucket a smart reminder fires in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SmartTrigger {
    #[serde(rename = "below_50")]
    Below50,
    #[serde(rename = "below_75")]
    Below75,
    #[serde(rename = "near_goal")]
    NearGoal,
}

impl SmartTrigger {
    /// Band a progress percentage falls into: `< 50`, `[50, 75)`, `>= 75`
    pub fn for_progress(progress: f64) -> Self {
        if progress < 50.0 {
            SmartTrigger::Below50
        } else if progress < 75.0 {
            SmartTrigger::Below75
        } else {
            SmartTrigger::NearGoal
        }
    }

    pub fn matches(&self, progress: f64) -> bool {
        Self::for_progress(progress) == *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SmartTrigger::Below50 => "below_50",
            SmartTrigger::Below75 => "below_75",
            SmartTrigger::NearGoal => "near_goal",
        }
    }
}

impl fmt::Display for SmartTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmartTrigger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "below_50" => Ok(SmartTrigger::Below50),
            "below_75" => Ok(SmartTrigger::Below75),
            "near_goal" => Ok(SmartTrigger::NearGoal),
            other => Err(Error::Validation(format!("Unknown smart trigger: {}", other))),
        }
    }
}

pub const ALL_DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

pub(crate) fn all_days() -> Vec<String> {
    ALL_DAYS.iter().map(|d| d.to_string()).collect()
}

/// A scheduled or progress-triggered reminder
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default = "all_days")]
    pub days: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub is_smart: bool,
    #[serde(default)]
    pub smart_trigger: Option<SmartTrigger>,
    #[serde(default)]
    pub last_triggered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Notification Types
// ============================================================================

/// Whether the host currently lets us show native notifications
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    #[serde(rename = "default")]
    NotDetermined,
    #[serde(rename = "granted")]
    Granted,
    #[serde(rename = "denied")]
    Denied,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::NotDetermined => "default",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "not-determined" | "not_determined" => Ok(Permission::NotDetermined),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            other => Err(Error::Validation(format!("Unknown permission: {}", other))),
        }
    }
}

/// Ephemeral notification handed to the host; never persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationEvent {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub requires_interaction: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_bands() {
        assert_eq!(SmartTrigger::for_progress(0.0), SmartTrigger::Below50);
        assert_eq!(SmartTrigger::for_progress(49.99), SmartTrigger::Below50);
        assert_eq!(SmartTrigger::for_progress(50.0), SmartTrigger::Below75);
        assert_eq!(SmartTrigger::for_progress(74.9), SmartTrigger::Below75);
        assert_eq!(SmartTrigger::for_progress(75.0), SmartTrigger::NearGoal);
        assert_eq!(SmartTrigger::for_progress(140.0), SmartTrigger::NearGoal);
    }

    #[test]
    fn test_smart_trigger_serde_names() {
        let json = serde_json::to_string(&SmartTrigger::Below50).unwrap();
        assert_eq!(json, "\"below_50\"");
        let parsed: SmartTrigger = serde_json::from_str("\"near_goal\"").unwrap();
        assert_eq!(parsed, SmartTrigger::NearGoal);
    }

    #[test]
    fn test_reminder_goal_mapping() {
        assert_eq!(ReminderType::Water.goal_type(), Some(GoalType::Water));
        assert_eq!(ReminderType::Steps.goal_type(), Some(GoalType::Steps));
        assert_eq!(ReminderType::Sleep.goal_type(), Some(GoalType::Sleep));
        assert_eq!(ReminderType::Meal.goal_type(), None);
        assert_eq!(ReminderType::Custom.goal_type(), None);
    }

    #[test]
    fn test_reminder_defaults_when_fields_missing() {
        let json = r#"{"id":"r1","type":"water","title":"Drink","is_active":true}"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();
        assert!(!reminder.is_smart);
        assert_eq!(reminder.smart_trigger, None);
        assert_eq!(reminder.days.len(), 7);
        assert!(reminder.last_triggered.is_none());
    }

    #[test]
    fn test_snapshot_value_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut snapshot = MetricSnapshot::empty("m1", date);
        snapshot.set_value(GoalType::Sleep, 7.5);
        snapshot.set_value(GoalType::Water, -20.0);
        snapshot.set_value(GoalType::Steps, 4200.4);

        assert_eq!(snapshot.value_for(GoalType::Sleep), 7.5);
        assert_eq!(snapshot.value_for(GoalType::Water), 0.0);
        assert_eq!(snapshot.value_for(GoalType::Steps), 4200.0);
        assert_eq!(snapshot.value_for(GoalType::Weight), 0.0);
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!("granted".parse::<Permission>().unwrap(), Permission::Granted);
        assert_eq!(
            "default".parse::<Permission>().unwrap(),
            Permission::NotDetermined
        );
        assert!("maybe".parse::<Permission>().is_err());
    }
}
