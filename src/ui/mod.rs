pub mod calendar_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod styles;
pub mod summary_pane;
pub mod tasks_pane;

use crate::app::AppState;
use calendar_pane::render_calendar_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::render_notification;
use ratatui::Frame;
use summary_pane::render_summary_pane;
use tasks_pane::render_tasks_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);

    render_calendar_pane(f, app, layout.calendar_area);
    render_summary_pane(f, app, layout.summary_area);
    render_tasks_pane(f, app, layout.tasks_area);

    // Form first so a notification about it is drawn on top
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
    render_notification(f, app, size);
}
