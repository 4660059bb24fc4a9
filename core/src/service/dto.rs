use serde::Serialize;

use crate::model::streak::DayStatus;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub key: String,
    pub day_of_month: u32,
    pub status: DayStatus,
    pub is_today: bool,
}

impl CalendarDay {
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }
}

/// One month laid out Monday first, ready to render.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub title: String,
    pub weekday_labels: [String; 7],
    /// Empty cells before the 1st.
    pub leading_blanks: usize,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Rows of seven cells; `None` pads the first and last week.
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay>>> {
        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.leading_blanks];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// Headline numbers shown above the calendar.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GoalSummary {
    pub money: String,
    pub score: u64,
    pub current_streak: u64,
    pub start_date: String,
    pub failed_days: usize,
    pub unsaved_changes: bool,
}
