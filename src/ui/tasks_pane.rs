use crate::app::AppState;
use crate::domain::{Focus, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, focused_border_style, hint_style, selected_style,
    time_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Create a single task line: "[x] 09:30 - Write report"
fn create_task_line(task: &Task) -> Line<'static> {
    let check = if task.done { "[x] " } else { "[ ] " };
    let text_style = if task.done { done_style() } else { default_style() };

    Line::from(vec![
        Span::raw(check),
        Span::styled(task.time.clone(), time_style()),
        Span::raw(" - "),
        Span::styled(task.text.clone(), text_style),
    ])
}

/// First visible row that keeps `selected` inside a window of `visible` rows
fn scroll_offset(selected: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    selected.saturating_sub(visible - 1).min(total - visible)
}

/// Render the selected day's task list
pub fn render_tasks_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let visible_rows = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(app.selected_task, app.tasks.len(), visible_rows);

    let done = app.tasks.iter().filter(|t| t.done).count();
    let mut title = format!(
        " {} ({}/{} done) ",
        app.calendar.selected_label(),
        done,
        app.tasks.len()
    );
    if offset > 0 {
        title.push_str(&format!("[scrolled +{}] ", offset));
    }

    let border = if app.focus == Focus::Tasks {
        focused_border_style()
    } else {
        border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, title_style()));

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Line::styled(
            " No tasks for this day. Press 'a' to add one.",
            hint_style(),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .skip(offset)
        .map(|(idx, task)| {
            let item = ListItem::new(create_task_line(task));
            if app.focus == Focus::Tasks && idx == app.selected_task {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalendarState;
    use crate::persistence::MemoryStore;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn pane_text(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render_tasks_pane(f, app, f.size()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_tasks(count: usize) -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut app = AppState::new(Box::new(MemoryStore::new()), CalendarState::new(today));
        for i in 0..count {
            assert!(app.add_task(&format!("Task {:02}", i), "09:00"));
        }
        app.focus = Focus::Tasks;
        app
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(0, 5, 10), 0);
        assert_eq!(scroll_offset(4, 5, 10), 0);
        assert_eq!(scroll_offset(9, 40, 10), 0);
        assert_eq!(scroll_offset(10, 40, 10), 1);
        assert_eq!(scroll_offset(39, 40, 10), 30);
        assert_eq!(scroll_offset(3, 40, 0), 0);
    }

    #[test]
    fn test_selected_task_stays_visible() {
        let mut app = app_with_tasks(40);
        while app.selected_task + 1 < app.tasks.len() {
            app.move_task_selection_down();
        }
        assert_eq!(app.get_selected_task().map(|t| t.text.as_str()), Some("Task 39"));

        let text = pane_text(&app, 60, 12);
        assert!(text.contains("Task 39"));
        assert!(!text.contains("Task 00"));
        assert!(text.contains("[scrolled +30]"));

        for _ in 0..39 {
            app.move_task_selection_up();
        }
        let text = pane_text(&app, 60, 12);
        assert!(text.contains("Task 00"));
        assert!(!text.contains("scrolled"));
    }

    #[test]
    fn test_create_task_line() {
        let mut task = Task::new("Write report", "9:30").unwrap();
        let text: String = create_task_line(&task)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "[ ] 09:30 - Write report");

        task.toggle_done();
        let line = create_task_line(&task);
        assert_eq!(line.spans[0].content, "[x] ");
        assert_eq!(line.spans[3].style, done_style());
    }
}
