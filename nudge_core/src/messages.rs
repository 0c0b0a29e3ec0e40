//! Message selection for reminders and celebrations.
//!
//! Water, steps and sleep messages are banded by progress (`below_50`,
//! `below_75`, `near_goal`); meal and exercise messages ignore progress and
//! always come from the `no_activity` pool. Templates may reference
//! `{current}`, `{goal}`, `{remaining}` and `{progress}`.

use crate::random::RandomSource;
use crate::{GoalType, ReminderType, SmartTrigger};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Pool a message is drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageBand {
    Below50,
    Below75,
    NearGoal,
    NoActivity,
}

impl From<SmartTrigger> for MessageBand {
    fn from(trigger: SmartTrigger) -> Self {
        match trigger {
            SmartTrigger::Below50 => MessageBand::Below50,
            SmartTrigger::Below75 => MessageBand::Below75,
            SmartTrigger::NearGoal => MessageBand::NearGoal,
        }
    }
}

type Pool = &'static [&'static str];

static SMART_MESSAGES: Lazy<HashMap<(ReminderType, MessageBand), Pool>> = Lazy::new(|| {
    let mut pools: HashMap<(ReminderType, MessageBand), Pool> = HashMap::new();

    pools.insert(
        (ReminderType::Water, MessageBand::Below50),
        &[
            "💧 Your body needs water! You're at {current}ml of {goal}ml",
            "💧 Time to hydrate! You're at {progress}% of your goal",
            "💧 Remember to drink some water, your brain will thank you",
        ],
    );
    pools.insert(
        (ReminderType::Water, MessageBand::Below75),
        &[
            "💧 Good progress! {current}ml so far, only {remaining}ml to go",
            "💧 Your hydration is on track, keep it up!",
        ],
    );
    pools.insert(
        (ReminderType::Water, MessageBand::NearGoal),
        &[
            "💧 Almost there! Just {remaining}ml more to reach your goal",
            "💧 Amazing! One more glass and your water goal is done",
        ],
    );

    pools.insert(
        (ReminderType::Steps, MessageBand::Below50),
        &[
            "👟 Let's move! Only {current} of {goal} steps so far",
            "👟 Your body needs movement, go for a short walk",
            "👟 Every step counts, get up and walk!",
        ],
    );
    pools.insert(
        (ReminderType::Steps, MessageBand::Below75),
        &[
            "👟 Going great! {current} steps so far",
            "👟 Nice pace, {remaining} steps left to reach your goal",
        ],
    );
    pools.insert(
        (ReminderType::Steps, MessageBand::NearGoal),
        &[
            "👟 Nearly there! Just {remaining} more steps, you can do it!",
            "👟 Incredible progress! One short walk and you're done",
            "🎯 You're about to complete your steps goal!",
        ],
    );

    pools.insert(
        (ReminderType::Sleep, MessageBand::Below75),
        &[
            "😴 You slept {current}h last night, try to rest more today",
            "🌙 Your body needs {goal}h of sleep to perform at its best",
        ],
    );
    pools.insert(
        (ReminderType::Sleep, MessageBand::NearGoal),
        &["😊 Good rest last night! {current}h of sleep"],
    );

    pools.insert(
        (ReminderType::Meal, MessageBand::NoActivity),
        &[
            "🍽️ Had breakfast yet? Log your meal",
            "🍽️ Don't forget to log your lunch",
            "🍽️ What did you have for dinner? Log your meals",
        ],
    );
    pools.insert(
        (ReminderType::Exercise, MessageBand::NoActivity),
        &[
            "🏃 Have you exercised today?",
            "💪 Your body is asking for movement, get active!",
            "🧘 30 minutes of exercise makes your day better",
        ],
    );

    pools
});

static CELEBRATIONS: Lazy<HashMap<GoalType, Pool>> = Lazy::new(|| {
    let mut pools: HashMap<GoalType, Pool> = HashMap::new();
    pools.insert(
        GoalType::Water,
        &[
            "🎉 Hydration goal complete!",
            "💧 Excellent! You've had enough water today",
            "🌊 Your body thanks you!",
        ],
    );
    pools.insert(
        GoalType::Steps,
        &[
            "🎉 Steps goal complete!",
            "👟 Incredible! You've reached your steps goal",
            "🏆 You're a champion!",
        ],
    );
    pools.insert(
        GoalType::Sleep,
        &[
            "😊 Well rested! You slept enough",
            "🌙 Excellent night of sleep!",
        ],
    );
    pools.insert(
        GoalType::CaloriesBurn,
        &[
            "🔥 Calorie goal reached!",
            "💪 You've burned all the calories you planned!",
        ],
    );
    pools
});

/// Whether `category` picks its pool by progress
pub fn is_threshold_banded(category: ReminderType) -> bool {
    matches!(
        category,
        ReminderType::Water | ReminderType::Steps | ReminderType::Sleep
    )
}

/// Band a message for `category` at `progress` is drawn from
pub fn band_for(category: ReminderType, progress: f64) -> MessageBand {
    if is_threshold_banded(category) {
        SmartTrigger::for_progress(progress).into()
    } else {
        MessageBand::NoActivity
    }
}

/// Templates for a category and band, if any exist
pub fn pool(category: ReminderType, band: MessageBand) -> Option<Pool> {
    SMART_MESSAGES.get(&(category, band)).copied()
}

/// Pick a reminder message for the current progress
///
/// Returns `None` when the category has no pool for the selected band.
pub fn select_message(
    category: ReminderType,
    progress: f64,
    current: f64,
    target: f64,
    rng: &dyn RandomSource,
) -> Option<String> {
    let band = band_for(category, progress);
    let templates = pool(category, band).filter(|p| !p.is_empty())?;
    let template = templates[rng.pick(templates.len())];
    Some(fill_template(template, current, target, progress))
}

/// Same as [`select_message`] for a category given by name
///
/// Unknown names select nothing.
pub fn select_message_named(
    category: &str,
    progress: f64,
    current: f64,
    target: f64,
    rng: &dyn RandomSource,
) -> Option<String> {
    let category = category.parse::<ReminderType>().ok()?;
    select_message(category, progress, current, target, rng)
}

/// Substitute every placeholder present in `template`
pub fn fill_template(template: &str, current: f64, target: f64, progress: f64) -> String {
    let remaining = (target - current).max(0.0);
    template
        .replace("{current}", &format_value(current))
        .replace("{goal}", &format_value(target))
        .replace("{remaining}", &format_value(remaining))
        .replace("{progress}", &format!("{}", progress.round() as i64))
}

/// Whole numbers print without decimals, fractions with at most two
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Celebration pool for a completed goal, if the type has one
pub fn celebrations(goal_type: GoalType) -> Option<Pool> {
    CELEBRATIONS.get(&goal_type).copied()
}

pub fn celebration_message(goal_type: GoalType, rng: &dyn RandomSource) -> Option<String> {
    let pool = celebrations(goal_type).filter(|p| !p.is_empty())?;
    Some(pool[rng.pick(pool.len())].to_string())
}

/// Title used for motivational notifications of `category`
pub fn motivational_title(category: ReminderType) -> &'static str {
    match category {
        ReminderType::Water => "💧 Hydration reminder",
        ReminderType::Steps => "👟 Activity reminder",
        ReminderType::Meal => "🍽️ Meal reminder",
        ReminderType::Exercise => "💪 Time to exercise",
        ReminderType::Sleep => "😴 Rest reminder",
        ReminderType::Custom => "Nudge",
    }
}
