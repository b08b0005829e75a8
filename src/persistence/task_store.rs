use super::store::{KeyValueStore, StoreError, Update};
use crate::domain::{compute_summary, MonthlySummary, Task, YearMonth};

/// Per-day task lists on top of a key-value store.
///
/// Each day is one entry: the date key maps to a JSON array of tasks.
/// Mutations go through `KeyValueStore::update`, so a store shared between
/// processes edits the day under its lock.
#[derive(Debug)]
pub struct TaskStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Tasks stored under `date_key`. Missing, unreadable or unparsable
    /// entries all read as an empty day.
    pub fn get_tasks(&self, date_key: &str) -> Vec<Task> {
        match self.backend.get(date_key) {
            Ok(raw) => parse_tasks(date_key, raw.as_deref()),
            Err(e) => {
                log::warn!("Could not read tasks for {}: {}", date_key, e);
                Vec::new()
            }
        }
    }

    /// Append `task` to the day's list
    pub fn save_task(&mut self, date_key: &str, task: Task) -> Result<(), StoreError> {
        log::info!("Adding task '{}' at {} on {}", task.text, task.time, date_key);
        let mut task = Some(task);
        self.modify(date_key, |tasks| {
            let added = task.iter().count();
            tasks.extend(task.take());
            added
        })?;
        Ok(())
    }

    /// Flip `done` on every task whose text equals `text`.
    /// Returns how many tasks changed.
    pub fn toggle_done(&mut self, date_key: &str, text: &str) -> Result<usize, StoreError> {
        let changed = self.modify(date_key, |tasks| {
            let mut changed = 0;
            for task in tasks.iter_mut().filter(|t| t.text == text) {
                task.toggle_done();
                changed += 1;
            }
            changed
        })?;

        if changed == 0 {
            log::debug!("Toggle on {}: no task named '{}'", date_key, text);
        } else {
            log::info!("Toggled {} task(s) '{}' on {}", changed, text, date_key);
        }
        Ok(changed)
    }

    /// Remove every task whose text equals `text`.
    /// Returns how many tasks were removed.
    pub fn delete_task(&mut self, date_key: &str, text: &str) -> Result<usize, StoreError> {
        let removed = self.modify(date_key, |tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.text != text);
            before - tasks.len()
        })?;

        if removed == 0 {
            log::debug!("Delete on {}: no task named '{}'", date_key, text);
        } else {
            log::info!("Deleted {} task(s) '{}' on {}", removed, text, date_key);
        }
        Ok(removed)
    }

    /// Total and completed counts over every day of `month`
    pub fn summary(&self, month: YearMonth) -> MonthlySummary {
        compute_summary(month, |key| self.get_tasks(key))
    }

    /// Apply `edit` to the day's current list and store the result.
    /// `edit` returns how many tasks it touched; nothing is written when
    /// that is zero, and an emptied list removes the key.
    fn modify<F>(&mut self, date_key: &str, mut edit: F) -> Result<usize, StoreError>
    where
        F: FnMut(&mut Vec<Task>) -> usize,
    {
        let mut changed = 0;
        self.backend
            .update(date_key, &mut |current| {
                let mut tasks = parse_tasks(date_key, current.as_deref());
                changed = edit(&mut tasks);
                if changed == 0 {
                    return Ok(Update::Keep);
                }
                encode_tasks(date_key, &tasks)
            })
            .map_err(|e| {
                log::error!("Failed to store tasks for {}: {}", date_key, e);
                e
            })?;
        Ok(changed)
    }
}

fn parse_tasks(date_key: &str, raw: Option<&str>) -> Vec<Task> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<Task>>>(raw) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unparsable tasks for {}: {}", date_key, e);
            Vec::new()
        }
    }
}

fn encode_tasks(date_key: &str, tasks: &[Task]) -> Result<Update, StoreError> {
    if tasks.is_empty() {
        return Ok(Update::Remove);
    }
    serde_json::to_string(tasks)
        .map(Update::Set)
        .map_err(|source| StoreError::Encode {
            key: date_key.to_string(),
            source,
        })
}
