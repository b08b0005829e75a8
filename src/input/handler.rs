use crate::app::AppState;
use crate::domain::{Focus, NavDirection, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(app, key),
        UiMode::Notification => handle_notification_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Keys that work regardless of focus
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),

        KeyCode::Tab => {
            app.toggle_focus();
            return Ok(false);
        }

        // Month navigation
        KeyCode::Char('[') | KeyCode::PageUp => {
            app.navigate_month(NavDirection::Prev);
            return Ok(false);
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            app.navigate_month(NavDirection::Next);
            return Ok(false);
        }

        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.jump_to_today();
            return Ok(false);
        }

        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            return Ok(false);
        }

        _ => {}
    }

    match app.focus {
        Focus::Calendar => handle_calendar_keys(app, key),
        Focus::Tasks => handle_task_keys(app, key),
    }
    Ok(false)
}

/// Arrow keys move the selected day; Enter switches to the day's tasks
fn handle_calendar_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.move_day(-1),
        KeyCode::Right => app.move_day(1),
        KeyCode::Up => app.move_day(-7),
        KeyCode::Down => app.move_day(7),
        KeyCode::Home => app.select_day_of_month(1),
        KeyCode::End => app.select_last_day_of_month(),
        KeyCode::Enter => app.focus = Focus::Tasks,
        _ => {}
    }
}

fn handle_task_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.move_task_selection_up(),
        KeyCode::Down => app.move_task_selection_down(),

        // Toggle done
        KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char(' ') => {
            app.toggle_selected_done()
        }

        // Delete
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),

        KeyCode::Esc => app.focus = Focus::Calendar,
        _ => {}
    }
}

/// Handle keys in input form mode
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Tab | KeyCode::BackTab => app.input_form_toggle_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_form_add_char(c)
        }
        _ => {}
    }
    Ok(false)
}

/// Notifications block everything until dismissed
fn handle_notification_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_notification();
    }
    Ok(false)
}
