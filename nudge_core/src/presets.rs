//! Smart reminder presets and guided setup.

use crate::store::{NewReminder, ReminderStore};
use crate::{Error, Reminder, ReminderType, Result, SmartTrigger};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerOption {
    pub trigger: SmartTrigger,
    pub label: &'static str,
    pub recommended: bool,
}

/// A reminder type offered in guided setup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmartPreset {
    pub reminder_type: ReminderType,
    pub title: &'static str,
    pub description: &'static str,
    pub triggers: &'static [TriggerOption],
}

impl SmartPreset {
    pub fn offers(&self, trigger: SmartTrigger) -> bool {
        self.triggers.iter().any(|t| t.trigger == trigger)
    }

    pub fn recommended(&self) -> Option<SmartTrigger> {
        self.triggers.iter().find(|t| t.recommended).map(|t| t.trigger)
    }
}

pub const SMART_PRESETS: &[SmartPreset] = &[
    SmartPreset {
        reminder_type: ReminderType::Water,
        title: "Hydration reminders",
        description: "We'll let you know when you need to drink more water",
        triggers: &[
            TriggerOption {
                trigger: SmartTrigger::Below50,
                label: "When you're below 50%",
                recommended: true,
            },
            TriggerOption {
                trigger: SmartTrigger::Below75,
                label: "When you're between 50-75%",
                recommended: false,
            },
            TriggerOption {
                trigger: SmartTrigger::NearGoal,
                label: "When you're close to your goal (encouragement)",
                recommended: false,
            },
        ],
    },
    SmartPreset {
        reminder_type: ReminderType::Steps,
        title: "Activity reminders",
        description: "We'll motivate you to reach your daily steps",
        triggers: &[
            TriggerOption {
                trigger: SmartTrigger::Below50,
                label: "When you're below 50%",
                recommended: true,
            },
            TriggerOption {
                trigger: SmartTrigger::NearGoal,
                label: "When you're close to your goal (encouragement)",
                recommended: false,
            },
        ],
    },
    SmartPreset {
        reminder_type: ReminderType::Sleep,
        title: "Sleep reminders",
        description: "We'll help you keep healthy sleep habits",
        triggers: &[TriggerOption {
            trigger: SmartTrigger::Below75,
            label: "If you slept too little last night",
            recommended: true,
        }],
    },
];

pub fn preset_for(reminder_type: ReminderType) -> Option<&'static SmartPreset> {
    SMART_PRESETS.iter().find(|p| p.reminder_type == reminder_type)
}

/// At most one trigger per reminder type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmartSelection {
    picks: Vec<(ReminderType, SmartTrigger)>,
}

impl SmartSelection {
    /// Current smart reminders as a selection
    pub fn from_existing(reminders: &[Reminder]) -> Self {
        let mut selection = Self::default();
        for reminder in reminders.iter().filter(|r| r.is_smart) {
            if let Some(trigger) = reminder.smart_trigger {
                selection.select(reminder.reminder_type, trigger);
            }
        }
        selection
    }

    /// Pick `trigger` for `reminder_type`, replacing any earlier pick
    pub fn select(&mut self, reminder_type: ReminderType, trigger: SmartTrigger) {
        self.picks.retain(|(t, _)| *t != reminder_type);
        self.picks.push((reminder_type, trigger));
    }

    /// Deselect if `trigger` is the current pick, otherwise select it
    pub fn toggle(&mut self, reminder_type: ReminderType, trigger: SmartTrigger) {
        if self.get(reminder_type) == Some(trigger) {
            self.picks.retain(|(t, _)| *t != reminder_type);
        } else {
            self.select(reminder_type, trigger);
        }
    }

    pub fn get(&self, reminder_type: ReminderType) -> Option<SmartTrigger> {
        self.picks
            .iter()
            .find(|(t, _)| *t == reminder_type)
            .map(|(_, trigger)| *trigger)
    }

    pub fn picks(&self) -> &[(ReminderType, SmartTrigger)] {
        &self.picks
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Picks that `current` does not already hold
    pub fn changes_from(&self, current: &SmartSelection) -> SmartSelection {
        let picks = self
            .picks
            .iter()
            .filter(|&&(reminder_type, trigger)| current.get(reminder_type) != Some(trigger))
            .copied()
            .collect();
        SmartSelection { picks }
    }
}

/// The recommended trigger of every preset
pub fn recommended_selection() -> SmartSelection {
    let mut selection = SmartSelection::default();
    for preset in SMART_PRESETS {
        if let Some(trigger) = preset.recommended() {
            selection.select(preset.reminder_type, trigger);
        }
    }
    selection
}

/// Replace the smart reminders of every selected type
///
/// The whole selection is validated before the store is touched.
pub async fn apply_smart_setup(
    store: &dyn ReminderStore,
    selection: &SmartSelection,
) -> Result<Vec<Reminder>> {
    let mut planned = Vec::with_capacity(selection.picks().len());
    for &(reminder_type, trigger) in selection.picks() {
        let preset = preset_for(reminder_type).ok_or_else(|| {
            Error::Validation(format!("No smart reminders for {}", reminder_type))
        })?;
        if !preset.offers(trigger) {
            return Err(Error::Validation(format!(
                "{} reminders do not offer the {} trigger",
                reminder_type, trigger
            )));
        }
        planned.push(NewReminder::smart(reminder_type, trigger, preset.title));
    }

    let existing = store.list().await?;
    for reminder in existing
        .iter()
        .filter(|r| r.is_smart && selection.get(r.reminder_type).is_some())
    {
        store.delete(&reminder.id).await?;
    }

    let mut created = Vec::with_capacity(planned.len());
    for reminder in planned {
        created.push(store.create(reminder).await?);
    }

    tracing::info!("Configured {} smart reminders", created.len());
    Ok(created)
}
