use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One labelled input field with a cursor when active
fn field_lines<'a>(label: &'a str, value: &'a str, editing: bool) -> [Line<'a>; 2] {
    let label_line = if editing {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label)
    };

    let value_line = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);

    [label_line, value_line]
}

/// Render the input form for adding a task to the selected date
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        f.render_widget(Clear, modal_area);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        lines.extend(field_lines("Task:", &form.text, form.editing_field == 0));
        lines.push(Line::raw(""));
        lines.extend(field_lines("Time (HH:MM):", &form.time, form.editing_field == 1));
        lines.push(Line::raw(""));
        lines.push(Line::raw("Tab to switch fields  ·  Enter to add  ·  Esc to cancel"));

        let title = format!(" Add Task · {} ", app.calendar.selected_label());
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
