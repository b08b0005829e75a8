use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the calendar pane: 7 cells of 4 columns plus borders
pub const CALENDAR_WIDTH: u16 = 7 * 4 + 2;

/// Height of the calendar pane: title border, headers, up to 6 weeks,
/// blank line, selected-date label, bottom border
pub const CALENDAR_HEIGHT: u16 = 1 + 1 + 6 + 1 + 1 + 1;

/// Main layout structure
pub struct MainLayout {
    pub calendar_area: Rect,
    pub summary_area: Rect,
    pub tasks_area: Rect,
    pub keybindings_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Left column: calendar above the monthly summary
/// - Right: the selected day's task list
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let keybindings_area = main_chunks[0];
    let content_area = main_chunks[1];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CALENDAR_WIDTH), // Calendar + summary
            Constraint::Min(0),                 // Task list
        ])
        .split(content_area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CALENDAR_HEIGHT),
            Constraint::Length(5), // Summary
            Constraint::Min(0),
        ])
        .split(horizontal[0]);

    MainLayout {
        calendar_area: left[0],
        summary_area: left[1],
        tasks_area: horizontal[1],
        keybindings_area,
    }
}

/// Create centered modal area (input form, notifications)
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.calendar_area.width, CALENDAR_WIDTH);
        assert_eq!(layout.calendar_area.height, CALENDAR_HEIGHT);
        assert_eq!(layout.summary_area.height, 5);
        assert_eq!(layout.tasks_area.width, 100 - CALENDAR_WIDTH);
        assert!(layout.tasks_area.height > 0);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
