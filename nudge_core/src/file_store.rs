//! JSON-file store with file locking.
//!
//! Each collection lives in its own JSON document under the data directory
//! (`metrics.json`, `goals.json`, `reminders.json`). Reads take a shared
//! lock; modifications hold an exclusive lock on a sidecar `.lock` file and
//! replace the document atomically through a temp file.

use crate::store::{
    filter_metrics, remove_by_id, update_goal, update_metric, update_reminder, GoalPatch,
    GoalStore, MetricFilter, MetricPatch, MetricStore, NewGoal, NewMetric, NewReminder,
    ReminderPatch, ReminderStore,
};
use crate::{Error, Goal, MetricSnapshot, Reminder, Result};
use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const METRICS_FILE: &str = "metrics.json";
const GOALS_FILE: &str = "goals.json";
const REMINDERS_FILE: &str = "reminders.json";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Read a collection under a shared lock
///
/// A missing document is an empty collection. A corrupt one is an error:
/// silently resetting it would drop `last_triggered` bookkeeping.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!("No document at {:?}, treating as empty", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&contents)
        .map_err(|e| Error::Store(format!("Corrupt document {:?}: {}", path, e)))
}

/// Atomically replace a collection document
fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(items)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} records to {:?}", items.len(), path);
    Ok(())
}

/// Load, modify and save a collection while holding its writer lock
fn modify_collection<T, R, F>(path: &Path, f: F) -> Result<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<R>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_path = path.with_extension("lock");
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    lock.lock_exclusive()?;

    let result = read_collection::<T>(path).and_then(|mut items| {
        let out = f(&mut items)?;
        write_collection(path, &items)?;
        Ok(out)
    });

    lock.unlock()?;
    result
}

#[async_trait]
impl MetricStore for FileStore {
    async fn filter(&self, filter: MetricFilter) -> Result<Vec<MetricSnapshot>> {
        let metrics = read_collection::<MetricSnapshot>(&self.path(METRICS_FILE))?;
        Ok(filter_metrics(&metrics, filter))
    }

    async fn create(&self, metric: NewMetric) -> Result<MetricSnapshot> {
        let snapshot = metric.into_snapshot();
        modify_collection(&self.path(METRICS_FILE), |metrics: &mut Vec<MetricSnapshot>| {
            metrics.push(snapshot.clone());
            Ok(())
        })?;
        Ok(snapshot)
    }

    async fn update(&self, id: &str, patch: MetricPatch) -> Result<MetricSnapshot> {
        modify_collection(&self.path(METRICS_FILE), |metrics: &mut Vec<MetricSnapshot>| {
            update_metric(metrics, id, &patch)
        })
    }
}

#[async_trait]
impl GoalStore for FileStore {
    async fn filter_active(&self) -> Result<Vec<Goal>> {
        let goals = read_collection::<Goal>(&self.path(GOALS_FILE))?;
        Ok(goals.into_iter().filter(|g| g.is_active).collect())
    }

    async fn list(&self) -> Result<Vec<Goal>> {
        read_collection(&self.path(GOALS_FILE))
    }

    async fn create(&self, goal: NewGoal) -> Result<Goal> {
        let goal = goal.into_goal()?;
        modify_collection(&self.path(GOALS_FILE), |goals: &mut Vec<Goal>| {
            goals.push(goal.clone());
            Ok(())
        })?;
        Ok(goal)
    }

    async fn update(&self, id: &str, patch: GoalPatch) -> Result<Goal> {
        modify_collection(&self.path(GOALS_FILE), |goals: &mut Vec<Goal>| {
            update_goal(goals, id, &patch)
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        modify_collection(&self.path(GOALS_FILE), |goals: &mut Vec<Goal>| {
            remove_by_id(goals, id, |g| g.id.as_str(), "goal")
        })
    }
}

#[async_trait]
impl ReminderStore for FileStore {
    async fn filter_smart_active(&self) -> Result<Vec<Reminder>> {
        let reminders = read_collection::<Reminder>(&self.path(REMINDERS_FILE))?;
        Ok(reminders
            .into_iter()
            .filter(|r| r.is_smart && r.is_active)
            .collect())
    }

    async fn list(&self) -> Result<Vec<Reminder>> {
        read_collection(&self.path(REMINDERS_FILE))
    }

    async fn create(&self, reminder: NewReminder) -> Result<Reminder> {
        let reminder = reminder.into_reminder(Utc::now())?;
        modify_collection(&self.path(REMINDERS_FILE), |reminders: &mut Vec<Reminder>| {
            reminders.push(reminder.clone());
            Ok(())
        })?;
        Ok(reminder)
    }

    async fn update(&self, id: &str, patch: ReminderPatch) -> Result<Reminder> {
        modify_collection(&self.path(REMINDERS_FILE), |reminders: &mut Vec<Reminder>| {
            update_reminder(reminders, id, &patch)
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        modify_collection(&self.path(REMINDERS_FILE), |reminders: &mut Vec<Reminder>| {
            remove_by_id(reminders, id, |r| r.id.as_str(), "reminder")
        })
    }
}
