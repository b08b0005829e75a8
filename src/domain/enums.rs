/// Direction of a month navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

impl NavDirection {
    /// Month offset applied to the viewed month (-1 or +1)
    pub fn delta(&self) -> i32 {
        match self {
            Self::Prev => -1,
            Self::Next => 1,
        }
    }
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Calendar,
    Tasks,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Calendar => Self::Tasks,
            Self::Tasks => Self::Calendar,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Calendar => "Calendar",
            Self::Tasks => "Tasks",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    Notification, // Blocking message, dismissed with Enter/Esc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_direction_delta() {
        assert_eq!(NavDirection::Prev.delta(), -1);
        assert_eq!(NavDirection::Next.delta(), 1);
    }

    #[test]
    fn test_focus_toggle() {
        assert_eq!(Focus::Calendar.toggle(), Focus::Tasks);
        assert_eq!(Focus::Tasks.toggle(), Focus::Calendar);
        assert_eq!(Focus::Tasks.toggle().toggle(), Focus::Tasks);
    }
}
