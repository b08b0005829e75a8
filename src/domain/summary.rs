use super::calendar::YearMonth;
use super::task::{date_key, Task};

/// Task counts across one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlySummary {
    pub total: usize,
    pub completed: usize,
}

impl MonthlySummary {
    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// Completed share in percent, 0.0 for an empty month
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    fn add_day(&mut self, tasks: &[Task]) {
        self.total += tasks.len();
        self.completed += tasks.iter().filter(|t| t.done).count();
    }
}

/// Count tasks on every day of `month`. `tasks_for` is given each day's
/// storage key and returns that day's list.
pub fn compute_summary<F>(month: YearMonth, mut tasks_for: F) -> MonthlySummary
where
    F: FnMut(&str) -> Vec<Task>,
{
    let mut summary = MonthlySummary::default();
    for day in month.days() {
        summary.add_day(&tasks_for(&date_key(day)));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn task(text: &str, done: bool) -> Task {
        Task {
            text: text.to_string(),
            time: "09:00".to_string(),
            done,
        }
    }

    #[test]
    fn test_compute_summary_counts() {
        let month = YearMonth::new(2024, 3).unwrap();
        let mut days: HashMap<String, Vec<Task>> = HashMap::new();
        days.insert(
            date_key(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            vec![task("A", false), task("B", true)],
        );
        days.insert(
            date_key(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            vec![task("C", true)],
        );
        // Outside the month, must not be counted
        days.insert(
            date_key(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            vec![task("D", true)],
        );

        let summary = compute_summary(month, |key| days.get(key).cloned().unwrap_or_default());
        assert_eq!(summary, MonthlySummary { total: 3, completed: 2 });
        assert_eq!(summary.pending(), 1);
    }

    #[test]
    fn test_compute_summary_reads_every_day() {
        let month = YearMonth::new(2024, 2).unwrap();
        let mut reads = Vec::new();
        compute_summary(month, |key| {
            reads.push(key.to_string());
            Vec::new()
        });
        assert_eq!(reads.len(), 29);
        assert_eq!(reads[0], "Thu Feb 01 2024");
        assert_eq!(reads[28], "Thu Feb 29 2024");
    }

    #[test]
    fn test_completion_percent() {
        assert_eq!(MonthlySummary::default().completion_percent(), 0.0);
        let summary = MonthlySummary { total: 4, completed: 1 };
        assert_eq!(summary.completion_percent(), 25.0);
    }
}
