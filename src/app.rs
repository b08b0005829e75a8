use crate::domain::{CalendarState, Focus, MonthlySummary, NavDirection, Task, UiMode};
use crate::persistence::{AppMetadata, KeyValueStore, TaskStore};
use anyhow::Result;
use chrono::NaiveDate;

/// Input form state for adding a task
#[derive(Debug, Clone, Default)]
pub struct InputFormState {
    pub text: String,
    pub time: String,
    pub editing_field: usize, // 0 = text, 1 = time
}

impl InputFormState {
    fn active_field_mut(&mut self) -> &mut String {
        if self.editing_field == 0 {
            &mut self.text
        } else {
            &mut self.time
        }
    }
}

/// Blocking message shown over the UI until dismissed
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Mode restored on dismissal
    pub return_mode: UiMode,
}

/// Main application state
pub struct AppState {
    pub calendar: CalendarState,
    pub store: TaskStore<Box<dyn KeyValueStore>>,
    /// Tasks of the selected date, as last read from the store
    pub tasks: Vec<Task>,
    pub selected_task: usize,
    /// Counts over the viewed month, refreshed after every change
    pub summary: MonthlySummary,
    pub focus: Focus,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub notification: Option<Notification>,
    pub needs_save: bool,
}

impl AppState {
    pub fn new(store: Box<dyn KeyValueStore>, calendar: CalendarState) -> Self {
        let mut app = Self {
            calendar,
            store: TaskStore::new(store),
            tasks: Vec::new(),
            selected_task: 0,
            summary: MonthlySummary::default(),
            focus: Focus::Calendar,
            ui_mode: UiMode::Normal,
            input_form: None,
            notification: None,
            needs_save: false,
        };
        app.reload_tasks();
        app.refresh_summary();
        app
    }

    /// Re-read the selected date's tasks
    pub fn reload_tasks(&mut self) {
        self.tasks = self.store.get_tasks(&self.calendar.selected_key());
        if self.selected_task >= self.tasks.len() {
            self.selected_task = self.tasks.len().saturating_sub(1);
        }
    }

    /// Recount tasks over the viewed month
    pub fn refresh_summary(&mut self) {
        self.summary = self.store.summary(self.calendar.viewed());
    }

    /// Called after the selected date or viewed month changed
    fn on_selection_changed(&mut self) {
        self.selected_task = 0;
        self.reload_tasks();
        self.refresh_summary();
        self.needs_save = true;
    }

    /// Go to the previous or next month
    pub fn navigate_month(&mut self, direction: NavDirection) {
        self.calendar.navigate(direction);
        log::debug!("Viewing {}", self.calendar.viewed());
        self.on_selection_changed();
    }

    /// Select a date, as a click on its day cell
    pub fn select_date(&mut self, date: NaiveDate) {
        self.calendar.select_date(date);
        self.on_selection_changed();
    }

    /// Move the selected day (arrow keys in the calendar)
    pub fn move_day(&mut self, days: i64) {
        self.calendar.move_selection(days);
        self.on_selection_changed();
    }

    /// Select day `day` of the viewed month (Home/End for its first and last)
    pub fn select_day_of_month(&mut self, day: u32) {
        if self.calendar.select_day(day) {
            self.on_selection_changed();
        }
    }

    pub fn select_last_day_of_month(&mut self) {
        let last = self.calendar.viewed().days_in_month();
        self.select_day_of_month(last);
    }

    pub fn jump_to_today(&mut self) {
        log::debug!("Jumping to today, {}", self.calendar.today());
        self.calendar.jump_to_today();
        self.on_selection_changed();
    }

    /// Update the today marker from the wall clock
    pub fn tick(&mut self, today: NaiveDate) {
        if self.calendar.refresh_today(today) {
            log::info!("Date changed, today is now {}", today);
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn move_task_selection_up(&mut self) {
        if self.selected_task > 0 {
            self.selected_task -= 1;
        }
    }

    pub fn move_task_selection_down(&mut self) {
        if self.selected_task + 1 < self.tasks.len() {
            self.selected_task += 1;
        }
    }

    pub fn get_selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected_task)
    }

    /// Flip done on the selected task (and every task sharing its text)
    pub fn toggle_selected_done(&mut self) {
        let Some(text) = self.get_selected_task().map(|t| t.text.clone()) else {
            return;
        };

        if let Err(e) = self.store.toggle_done(&self.calendar.selected_key(), &text) {
            self.notify_error("Could not update task", &e.to_string());
        }
        self.reload_tasks();
        self.refresh_summary();
    }

    /// Delete the selected task (and every task sharing its text)
    pub fn delete_selected(&mut self) {
        let Some(text) = self.get_selected_task().map(|t| t.text.clone()) else {
            return;
        };

        if let Err(e) = self.store.delete_task(&self.calendar.selected_key(), &text) {
            self.notify_error("Could not delete task", &e.to_string());
        }
        self.reload_tasks();
        self.refresh_summary();
    }

    /// Validate and store a new task on the selected date.
    /// Returns false when nothing was stored; a notification says why.
    pub fn add_task(&mut self, text: &str, time: &str) -> bool {
        let task = match Task::new(text, time) {
            Ok(task) => task,
            Err(e) => {
                self.notify_error("Invalid task", &e.to_string());
                return false;
            }
        };

        if let Err(e) = self.store.save_task(&self.calendar.selected_key(), task) {
            self.notify_error("Could not save task", &e.to_string());
            return false;
        }

        self.reload_tasks();
        self.selected_task = self.tasks.len().saturating_sub(1);
        self.refresh_summary();
        true
    }

    /// Open the form for adding a task
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::default());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Toggle between text and time fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().pop();
        }
    }

    /// Submit the form. On failure the form stays open with its input.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };

        if self.add_task(&form.text, &form.time) {
            self.input_form = None;
            self.ui_mode = UiMode::Normal;
            self.focus = Focus::Tasks;
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Show a blocking notification
    pub fn notify_error(&mut self, title: &str, message: &str) {
        log::warn!("{}: {}", title, message);
        let return_mode = match self.ui_mode {
            UiMode::Notification => self
                .notification
                .as_ref()
                .map(|n| n.return_mode)
                .unwrap_or(UiMode::Normal),
            mode => mode,
        };
        self.notification = Some(Notification {
            title: title.to_string(),
            message: message.to_string(),
            return_mode,
        });
        self.ui_mode = UiMode::Notification;
    }

    pub fn dismiss_notification(&mut self) {
        if let Some(notification) = self.notification.take() {
            self.ui_mode = notification.return_mode;
        } else {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Metadata snapshot to persist
    pub fn metadata(&self) -> AppMetadata {
        AppMetadata::for_selection(self.calendar.selected())
    }

    /// Save metadata to meta.json
    pub fn save(&mut self) -> Result<()> {
        use crate::persistence::{meta_file, save_metadata};

        // Not retried on failure; the next selection change tries again
        self.needs_save = false;
        save_metadata(meta_file()?, &self.metadata())
    }
}
