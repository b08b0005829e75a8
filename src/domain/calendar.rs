use super::enums::NavDirection;
use super::task::date_key;
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Weekday headers, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar month. Internally the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Number of days, taken as the day before the 1st of the next month
    pub fn days_in_month(&self) -> u32 {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31) // Only December of the last representable year lands here
    }

    /// Blank cells before the 1st in a Sunday-first grid (0..=6)
    pub fn first_weekday_offset(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Shift by whole months with year rollover. Stays put at the edge of the
    /// representable range.
    pub fn shift(&self, months: i32) -> Self {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(Self).unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every date of the month, 1st to last
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.0;
        (0..self.days_in_month()).filter_map(move |offset| first.checked_add_signed(Duration::days(offset as i64)))
    }

    /// Human label, e.g. "January 2024"
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for YearMonth {
    type Err = chrono::ParseError;

    /// Parse "YYYY-MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").map(Self)
    }
}

/// A day cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
}

impl DayCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// One slot of the 7-wide grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Day(DayCell),
}

/// Rendered month: weekday headers, leading blanks, then one cell per day
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub headers: [&'static str; 7],
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    /// Cells split into rows of seven (the last row may be shorter)
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    #[cfg(test)]
    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            GridCell::Day(day) => Some(day),
            GridCell::Blank => None,
        })
    }
}

/// Calendar state: the viewed month and the selected date.
///
/// The selected date always lies inside the viewed month.
#[derive(Debug, Clone)]
pub struct CalendarState {
    viewed: YearMonth,
    selected: NaiveDate,
    today: NaiveDate,
}

impl CalendarState {
    /// Start on today's month with today selected
    pub fn new(today: NaiveDate) -> Self {
        Self::with_selection(today, today)
    }

    /// Start with a given selection; the viewed month follows it
    pub fn with_selection(today: NaiveDate, selected: NaiveDate) -> Self {
        Self {
            viewed: YearMonth::of(selected),
            selected,
            today,
        }
    }

    pub fn viewed(&self) -> YearMonth {
        self.viewed
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Storage key of the selected date
    pub fn selected_key(&self) -> String {
        date_key(self.selected)
    }

    /// Text shown in the selected-date label
    pub fn selected_label(&self) -> String {
        date_key(self.selected)
    }

    /// Move the viewed month one step. A selection outside the new month
    /// resets to its 1st.
    pub fn navigate(&mut self, direction: NavDirection) {
        self.viewed = self.viewed.shift(direction.delta());
        if !self.viewed.contains(self.selected) {
            self.selected = self.viewed.first_day();
        }
    }

    /// Select a date (a day-cell click). The viewed month follows.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
        self.viewed = YearMonth::of(date);
    }

    /// Select the day `day` of the viewed month, if it exists
    pub fn select_day(&mut self, day: u32) -> bool {
        match self.viewed.first_day().with_day(day) {
            Some(date) => {
                self.select_date(date);
                true
            }
            None => false,
        }
    }

    /// Move the selection by a number of days (±1 for a column, ±7 for a row)
    pub fn move_selection(&mut self, days: i64) {
        if let Some(date) = self.selected.checked_add_signed(Duration::days(days)) {
            self.select_date(date);
        }
    }

    pub fn jump_to_today(&mut self) {
        self.select_date(self.today);
    }

    /// Update the today marker. Returns true when the date changed.
    pub fn refresh_today(&mut self, today: NaiveDate) -> bool {
        if self.today == today {
            return false;
        }
        self.today = today;
        true
    }

    /// Build the grid for the viewed month
    pub fn month_grid(&self) -> MonthGrid {
        let offset = self.viewed.first_weekday_offset() as usize;
        let mut cells = Vec::with_capacity(offset + self.viewed.days_in_month() as usize);

        cells.extend(std::iter::repeat(GridCell::Blank).take(offset));
        cells.extend(self.viewed.days().map(|date| {
            GridCell::Day(DayCell {
                date,
                is_today: date == self.today,
                is_selected: date == self.selected,
            })
        }));

        MonthGrid {
            month: self.viewed,
            headers: WEEKDAY_NAMES,
            cells,
        }
    }
}
