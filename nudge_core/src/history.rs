//! Recent metric history: loading, weekly summaries and CSV export.

use crate::store::{MetricFilter, MetricStore};
use crate::{Error, Goal, GoalPeriod, GoalType, MetricSnapshot, Result};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

/// Metrics covered by history summaries
pub const SUMMARY_METRICS: [GoalType; 4] = [
    GoalType::Steps,
    GoalType::CaloriesBurn,
    GoalType::Water,
    GoalType::Sleep,
];

/// Snapshots for the `days` days ending at `today`, oldest first
///
/// When a date has more than one snapshot the last stored one is used.
pub async fn load_history(
    store: &dyn MetricStore,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<MetricSnapshot>> {
    if days == 0 {
        return Err(Error::Validation("History window must cover at least one day".into()));
    }

    let start = today - Duration::days(i64::from(days) - 1);
    let snapshots = store
        .filter(MetricFilter::Range { start, end: today })
        .await?;

    let by_date: BTreeMap<NaiveDate, MetricSnapshot> =
        snapshots.into_iter().map(|s| (s.date, s)).collect();

    tracing::debug!("Loaded {} days of history since {}", by_date.len(), start);
    Ok(by_date.into_values().collect())
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricSummary {
    pub metric: GoalType,
    pub total: f64,
    /// Mean over days with a non-zero value
    pub average: f64,
    pub days_with_data: usize,
    pub best_day: Option<(NaiveDate, f64)>,
    /// Days reaching the active daily goal; `None` without such a goal
    pub days_goal_met: Option<usize>,
}

/// Per-metric totals over a history window
pub fn summarize(history: &[MetricSnapshot], goals: &[Goal]) -> Vec<MetricSummary> {
    SUMMARY_METRICS
        .iter()
        .map(|&metric| {
            let values: Vec<(NaiveDate, f64)> = history
                .iter()
                .map(|s| (s.date, s.value_for(metric)))
                .filter(|(_, v)| *v > 0.0)
                .collect();

            let total: f64 = values.iter().map(|(_, v)| v).sum();
            let average = if values.is_empty() {
                0.0
            } else {
                total / values.len() as f64
            };
            let best_day = values
                .iter()
                .copied()
                .fold(None, |best: Option<(NaiveDate, f64)>, day| match best {
                    Some(b) if b.1 >= day.1 => Some(b),
                    _ => Some(day),
                });

            let target = goals
                .iter()
                .find(|g| {
                    g.is_active
                        && g.goal_type == metric
                        && g.period == GoalPeriod::Daily
                        && g.target_value > 0.0
                })
                .map(|g| g.target_value);
            let days_goal_met =
                target.map(|t| values.iter().filter(|(_, v)| *v >= t).count());

            MetricSummary {
                metric,
                total,
                average,
                days_with_data: values.len(),
                best_day,
                days_goal_met,
            }
        })
        .collect()
}

#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    id: &'a str,
    steps: u64,
    water_ml: u64,
    sleep_hours: f64,
    calories_burned: u64,
    calories_consumed: u64,
    exercise_minutes: u64,
    weight_kg: Option<f64>,
}

impl<'a> From<&'a MetricSnapshot> for CsvRow<'a> {
    fn from(snapshot: &'a MetricSnapshot) -> Self {
        CsvRow {
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            id: &snapshot.id,
            steps: snapshot.steps,
            water_ml: snapshot.water_ml,
            sleep_hours: snapshot.sleep_hours,
            calories_burned: snapshot.calories_burned,
            calories_consumed: snapshot.calories_consumed,
            exercise_minutes: snapshot.exercise_minutes,
            weight_kg: snapshot.weight_kg,
        }
    }
}

/// Write `history` to `path` as CSV, replacing any existing file
///
/// Returns the number of data rows written.
pub fn export_csv(history: &[MetricSnapshot], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    if history.is_empty() {
        writer.write_record([
            "date",
            "id",
            "steps",
            "water_ml",
            "sleep_hours",
            "calories_burned",
            "calories_consumed",
            "exercise_minutes",
            "weight_kg",
        ])?;
    }
    for snapshot in history {
        writer.serialize(CsvRow::from(snapshot))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} days of history to {:?}", history.len(), path);
    Ok(history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn snapshot(id: &str, day: u32, steps: u64, water_ml: u64) -> MetricSnapshot {
        let mut s = MetricSnapshot::empty(id, date(day));
        s.steps = steps;
        s.water_ml = water_ml;
        s
    }

    fn goal(goal_type: GoalType, target: f64) -> Goal {
        Goal {
            id: format!("g-{}", goal_type),
            goal_type,
            target_value: target,
            unit: goal_type.unit().into(),
            period: GoalPeriod::Daily,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_window_bounds_and_order() {
        let store = InMemoryStore::new();
        store.insert_metric(snapshot("c", 12, 300, 0));
        store.insert_metric(snapshot("old", 5, 999, 0));
        store.insert_metric(snapshot("a", 6, 100, 0));
        store.insert_metric(snapshot("b", 9, 200, 0));

        let history = load_history(&store, date(12), 7).await.unwrap();

        let ids: Vec<_> = history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_duplicate_dates_keep_last() {
        let store = InMemoryStore::new();
        store.insert_metric(snapshot("first", 10, 100, 0));
        store.insert_metric(snapshot("second", 10, 200, 0));

        let history = load_history(&store, date(10), 1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "second");
    }

    #[tokio::test]
    async fn test_zero_day_window_rejected() {
        let store = InMemoryStore::new();
        assert!(load_history(&store, date(10), 0).await.is_err());
    }

    #[test]
    fn test_summary() {
        let history = vec![
            snapshot("a", 10, 12000, 1500),
            snapshot("b", 11, 4000, 0),
            snapshot("c", 12, 10000, 2500),
        ];
        let goals = vec![goal(GoalType::Steps, 10000.0)];

        let summary = summarize(&history, &goals);

        let steps = &summary[0];
        assert_eq!(steps.metric, GoalType::Steps);
        assert_eq!(steps.total, 26000.0);
        assert!((steps.average - 26000.0 / 3.0).abs() < 1e-9);
        assert_eq!(steps.best_day, Some((date(10), 12000.0)));
        assert_eq!(steps.days_goal_met, Some(2));

        let water = summary.iter().find(|s| s.metric == GoalType::Water).unwrap();
        assert_eq!(water.days_with_data, 2);
        assert_eq!(water.average, 2000.0);
        assert_eq!(water.days_goal_met, None);

        let sleep = summary.iter().find(|s| s.metric == GoalType::Sleep).unwrap();
        assert_eq!(sleep.best_day, None);
        assert_eq!(sleep.average, 0.0);
    }

    #[test]
    fn test_export_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/history.csv");
        let history = vec![snapshot("a", 10, 12000, 1500), snapshot("b", 11, 4000, 0)];

        assert_eq!(export_csv(&history, &path).unwrap(), 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[2], "steps");
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "2024-06-10");
        assert_eq!(&rows[0][2], "12000");
    }

    #[test]
    fn test_export_empty_writes_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.csv");

        assert_eq!(export_csv(&[], &path).unwrap(), 0);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("date,id,steps"));
    }
}
