pub mod calendar;
pub mod enums;
pub mod summary;
pub mod task;

pub use calendar::{CalendarState, DayCell, GridCell, MonthGrid, YearMonth};
pub use enums::{Focus, NavDirection, UiMode};
pub use summary::{compute_summary, MonthlySummary};
pub use task::{date_key, Task};
