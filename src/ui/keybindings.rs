use crate::app::AppState;
use crate::domain::{Focus, UiMode};
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar for the current mode and focus
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let hints: Vec<Span> = match (app.ui_mode, app.focus) {
        (UiMode::AddingTask, _) => vec![
            Span::raw(" Tab text/time   "),
            Span::raw("Enter add   "),
            Span::raw("Esc cancel"),
        ],
        (UiMode::Notification, _) => vec![Span::raw(" Enter/Esc dismiss")],
        (UiMode::Normal, Focus::Calendar) => vec![
            Span::raw(" ←/→/↑/↓ day   "),
            Span::raw("Home/End first/last   "),
            Span::raw("[ / ] month   "),
            Span::raw("t today   "),
            Span::raw("Enter/Tab tasks   "),
            Span::raw("a add   "),
            Span::raw("q quit"),
        ],
        (UiMode::Normal, Focus::Tasks) => vec![
            Span::raw(" ↑/↓ select   "),
            Span::raw("d/Enter done   "),
            Span::raw("x delete   "),
            Span::raw("a add   "),
            Span::raw("[ / ] month   "),
            Span::raw("Esc/Tab calendar   "),
            Span::raw("q quit"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() + 1);
    if app.ui_mode == UiMode::Normal {
        spans.push(Span::raw(format!(" [{}]", app.focus.name())));
    }
    spans.extend(hints);

    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}
