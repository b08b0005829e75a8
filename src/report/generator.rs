use crate::domain::{date_key, Task, YearMonth};
use crate::persistence::{atomic_write, report_file, KeyValueStore, TaskStore};
use anyhow::Result;
use std::path::PathBuf;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Markdown checklist line for one task
fn task_line(task: &Task) -> String {
    let check = if task.done { "x" } else { " " };
    format!("- [{}] {} {}\n", check, task.time, task.text)
}

/// Build the Markdown report for `month`: summary counts, then every day
/// that has tasks, in calendar order
pub fn build_month_report<S: KeyValueStore>(store: &TaskStore<S>, month: YearMonth) -> String {
    let summary = store.summary(month);
    let mut report = String::new();

    report.push_str(&format!("# Monthly Report - {}\n\n", month.label()));

    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Total Tasks:** {}\n", summary.total));
    report.push_str(&format!("- **Completed:** {}\n", summary.completed));
    report.push_str(&format!("- **Pending:** {}\n", summary.pending()));
    report.push_str(&format!(
        "- **Completion:** {}\n\n",
        format_percent(summary.completion_percent())
    ));

    report.push_str("## Days\n\n");
    let mut any_day = false;
    for day in month.days() {
        let key = date_key(day);
        let tasks = store.get_tasks(&key);
        if tasks.is_empty() {
            continue;
        }
        any_day = true;

        let done = tasks.iter().filter(|t| t.done).count();
        report.push_str(&format!("### {} ({}/{})\n\n", key, done, tasks.len()));
        for task in &tasks {
            report.push_str(&task_line(task));
        }
        report.push('\n');
    }

    if !any_day {
        report.push_str("_No tasks this month._\n");
    }

    report
}

/// Write the report for `month` to `output_path` (defaults to
/// <planner dir>/report-YYYY-MM.md) and return the path
pub fn generate_report<S: KeyValueStore>(
    store: &TaskStore<S>,
    month: YearMonth,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = match output_path {
        Some(path) => path,
        None => report_file(&month.to_string())?,
    };

    let report = build_month_report(store, month);
    atomic_write(&path, &report)?;
    log::info!("Wrote report for {} to {}", month, path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn key(y: i32, m: u32, d: u32) -> String {
        date_key(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn sample_store() -> TaskStore<MemoryStore> {
        let mut store = TaskStore::new(MemoryStore::new());
        store.save_task(&key(2024, 3, 5), Task::new("C", "10:00").unwrap()).unwrap();
        store.toggle_done(&key(2024, 3, 5), "C").unwrap();
        store.save_task(&key(2024, 3, 1), Task::new("A", "08:00").unwrap()).unwrap();
        store.save_task(&key(2024, 3, 1), Task::new("B", "09:00").unwrap()).unwrap();
        store.toggle_done(&key(2024, 3, 1), "B").unwrap();
        store
    }

    #[test]
    fn test_build_month_report() {
        let report = build_month_report(&sample_store(), YearMonth::new(2024, 3).unwrap());

        let expected = "\
# Monthly Report - March 2024

## Summary

- **Total Tasks:** 3
- **Completed:** 2
- **Pending:** 1
- **Completion:** 66.7%

## Days

### Fri Mar 01 2024 (1/2)

- [ ] 08:00 A
- [x] 09:00 B

### Tue Mar 05 2024 (1/1)

- [x] 10:00 C

";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_empty_month_report() {
        let report = build_month_report(&sample_store(), YearMonth::new(2024, 4).unwrap());
        assert!(report.contains("- **Total Tasks:** 0"));
        assert!(report.contains("- **Completion:** 0.0%"));
        assert!(report.ends_with("_No tasks this month._\n"));
    }

    #[test]
    fn test_generate_report_to_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("march.md");

        let path = generate_report(
            &sample_store(),
            YearMonth::new(2024, 3).unwrap(),
            Some(output.clone()),
        )
        .unwrap();

        assert_eq!(path, output);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Monthly Report - March 2024"));
    }
}
