use crate::app::AppState;
use crate::domain::{DayCell, Focus, GridCell, MonthGrid};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, selected_style, title_style, today_style,
    weekday_style,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Columns per grid cell
const CELL_WIDTH: usize = 4;

/// Style of a day cell. Selected and today combine when both apply.
fn day_style(cell: &DayCell) -> Style {
    match (cell.is_selected, cell.is_today) {
        (true, true) => selected_style().add_modifier(Modifier::UNDERLINED),
        (true, false) => selected_style(),
        (false, true) => today_style(),
        (false, false) => default_style(),
    }
}

/// Lines of the month grid: weekday headers, then one line per week
pub fn grid_lines(grid: &MonthGrid) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(7);

    let headers: Vec<Span> = grid
        .headers
        .iter()
        .map(|name| Span::styled(format!("{:>width$}", name, width = CELL_WIDTH), weekday_style()))
        .collect();
    lines.push(Line::from(headers));

    for week in grid.weeks() {
        let spans: Vec<Span> = week
            .iter()
            .flat_map(|cell| match cell {
                GridCell::Blank => vec![Span::raw(" ".repeat(CELL_WIDTH))],
                GridCell::Day(day) => vec![
                    Span::raw(" "),
                    Span::styled(format!("{:>width$}", day.day(), width = CELL_WIDTH - 1), day_style(day)),
                ],
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Render the month calendar with the selected-date label below it
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let grid = app.calendar.month_grid();
    let mut lines = grid_lines(&grid);

    // Keep the label at a fixed row whatever the number of weeks
    while lines.len() < 8 {
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.calendar.selected_label(), title_style()),
    ]));

    let border = if app.focus == Focus::Calendar {
        focused_border_style()
    } else {
        border_style()
    };
    let title = format!(" ◀ {} ▶ ", grid.month.label());

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(paragraph, area);
}
