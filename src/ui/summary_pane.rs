use crate::app::AppState;
use crate::domain::MonthlySummary;
use crate::ui::styles::{border_style, done_style, gauge_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// "Total: 3  Done: 2  Left: 1"
fn counts_line(summary: &MonthlySummary) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(" Total: {}  ", summary.total)),
        Span::styled(
            format!("Done: {}", summary.completed),
            done_style().remove_modifier(Modifier::CROSSED_OUT),
        ),
        Span::raw(format!("  Left: {}", summary.pending())),
    ])
}

/// Render the total/completed counters for the viewed month
pub fn render_summary_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" {} summary ", app.calendar.viewed().label()),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    f.render_widget(Paragraph::new(counts_line(&app.summary)), rows[0]);

    let percent = app.summary.completion_percent();
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", percent));
    f.render_widget(gauge, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_line() {
        let summary = MonthlySummary { total: 3, completed: 2 };
        let text: String = counts_line(&summary)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, " Total: 3  Done: 2  Left: 1");
    }
}
