use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of the storage key for a day, e.g. "Mon Jan 01 2024".
/// Weekday and month names are always English, whatever the locale.
pub const DATE_KEY_FORMAT: &str = "%a %b %d %Y";

/// Storage key addressing one calendar day's task list
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Why a new task was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both time and task! (task text is empty)")]
    EmptyText,
    #[error("Please enter both time and task! (time is empty)")]
    EmptyTime,
    #[error("Time must be HH:MM, got '{0}'")]
    InvalidTime(String),
}

/// A task scheduled on one day.
///
/// Tasks carry no id: within a day's list a task is addressed by its text,
/// so tasks sharing a text are toggled and deleted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    /// Local wall-clock time, "HH:MM"
    pub time: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Validate user input and build a not-yet-done task.
    /// Text is trimmed; time is normalized to zero-padded "HH:MM".
    pub fn new(text: &str, time: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        let time = time.trim();

        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if time.is_empty() {
            return Err(ValidationError::EmptyTime);
        }

        let parsed = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| ValidationError::InvalidTime(time.to_string()))?;

        Ok(Self {
            text: text.to_string(),
            time: parsed.format("%H:%M").to_string(),
            done: false,
        })
    }

    /// "HH:MM - text", as shown in the task list
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.time, self.text)
    }

    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }
}
