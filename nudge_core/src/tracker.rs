//! Recording metric values into today's snapshot.

use crate::store::{MetricFilter, MetricPatch, MetricStore, NewMetric};
use crate::{Error, GoalType, Result};
use chrono::NaiveDate;

/// How a new reading combines with the stored value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricChange {
    /// Add to the stored value; the result never drops below zero
    Add(f64),
    /// Replace the stored value
    Set(f64),
}

impl MetricChange {
    fn apply(self, stored: f64) -> f64 {
        match self {
            MetricChange::Add(delta) => (stored + delta).max(0.0),
            MetricChange::Set(value) => value.max(0.0),
        }
    }

    fn value(self) -> f64 {
        match self {
            MetricChange::Add(v) | MetricChange::Set(v) => v,
        }
    }
}

/// Value of a metric before and after a recording
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricRecord {
    pub previous: f64,
    pub current: f64,
}

/// Apply `change` to the `kind` field of the snapshot for `today`
///
/// Creates the snapshot when the day has none yet.
pub async fn record_metric(
    store: &dyn MetricStore,
    today: NaiveDate,
    kind: GoalType,
    change: MetricChange,
) -> Result<MetricRecord> {
    if !change.value().is_finite() {
        return Err(Error::Validation(format!(
            "Metric value must be a finite number, got {}",
            change.value()
        )));
    }

    let existing = store.filter(MetricFilter::Date(today)).await?;
    let (previous, snapshot) = match existing.into_iter().next() {
        Some(snapshot) => {
            let previous = snapshot.value_for(kind);
            let patch = MetricPatch::default().set(kind, change.apply(previous));
            (previous, store.update(&snapshot.id, patch).await?)
        }
        None => {
            let fields = MetricPatch::default().set(kind, change.apply(0.0));
            (0.0, store.create(NewMetric { date: today, fields }).await?)
        }
    };

    let current = snapshot.value_for(kind);
    tracing::info!("Recorded {} for {}: {} -> {}", kind, today, previous, current);
    Ok(MetricRecord { previous, current })
}
