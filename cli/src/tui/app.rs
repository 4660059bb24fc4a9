use std::fs;
use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use goaltracker_core::service::dto::{CalendarMonth, GoalSummary};
use goaltracker_core::time::{format_date, shift_month};
use goaltracker_core::{export_file_name, export_json, CalendarUseCase};

use crate::workspace::{today, Workspace};

pub enum InputMode {
    Normal,
    StartDate,
    ImportPath,
}

pub struct App {
    pub ws: Workspace,
    pub today: NaiveDate,
    /// Selected day; the shown month follows it.
    pub cursor: NaiveDate,
    pub message: String,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    confirm_quit: bool,
}

impl App {
    pub fn new(ws: Workspace) -> App {
        Self::with_today(ws, today())
    }

    pub fn with_today(ws: Workspace, today: NaiveDate) -> App {
        let message = match &ws.load_warning {
            Some(w) => format!("Warning: {}", w),
            None => "Data loaded.".to_string(),
        };
        App {
            ws,
            today,
            cursor: today,
            message,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            confirm_quit: false,
        }
    }

    pub fn month_view(&self) -> CalendarMonth {
        CalendarUseCase::new(&self.ws.session, &self.ws.config.locale).month_view(self.cursor, self.today)
    }

    pub fn summary(&self) -> GoalSummary {
        CalendarUseCase::new(&self.ws.session, &self.ws.config.locale).summary(self.today, &self.ws.config.currency)
    }

    pub fn move_cursor(&mut self, days: i64) {
        let step = Days::new(days.unsigned_abs());
        let moved = if days >= 0 {
            self.cursor.checked_add_days(step)
        } else {
            self.cursor.checked_sub_days(step)
        };
        if let Some(d) = moved {
            self.cursor = d;
        }
        self.confirm_quit = false;
    }

    pub fn change_month(&mut self, delta: i32) {
        self.cursor = shift_month(self.cursor, delta);
        self.confirm_quit = false;
    }

    pub fn jump_to_today(&mut self) {
        self.cursor = self.today;
    }

    pub fn toggle_selected(&mut self) {
        let key = format_date(self.cursor);
        self.message = match self.ws.session.toggle_day(self.cursor, self.today) {
            Ok(true) => format!("{} marked as failed. Remember to save.", key),
            Ok(false) => format!("{} is no longer failed. Remember to save.", key),
            Err(e) => format!("Error: {}", e),
        };
        self.confirm_quit = false;
    }

    pub fn save(&mut self) {
        self.message = self.ws.save_message();
        self.confirm_quit = false;
    }

    pub fn export(&mut self) {
        let path = PathBuf::from(export_file_name(self.today));
        let result = export_json(self.ws.session.failed_days())
            .map_err(anyhow::Error::from)
            .and_then(|body| fs::write(&path, body).map_err(anyhow::Error::from));
        self.message = match result {
            Ok(()) => format!("Failed days exported to {}", path.display()),
            Err(e) => format!("Error: {}", e),
        };
    }

    /// Returns true when the app may close. Unsaved changes need a second press.
    pub fn request_quit(&mut self) -> bool {
        if self.ws.session.has_unsaved_changes() && !self.confirm_quit {
            self.confirm_quit = true;
            self.message = "You have unsaved changes! Press s to save or q again to quit.".to_string();
            false
        } else {
            true
        }
    }

    pub fn enter_start_date_mode(&mut self) {
        self.input_mode = InputMode::StartDate;
        self.input = format_date(self.ws.session.start_date());
        self.cursor_position = self.input.chars().count();
    }

    pub fn enter_import_mode(&mut self) {
        self.input_mode = InputMode::ImportPath;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_input_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_input_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        match self.input_mode {
            InputMode::StartDate => self.submit_start_date(),
            InputMode::ImportPath => self.submit_import(),
            InputMode::Normal => {},
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_start_date(&mut self) {
        self.message = match self.ws.session.set_start_date(&self.input, self.today) {
            Ok(d) => format!("Start date set to {}. Remember to save.", format_date(d)),
            Err(e) => format!("Error: {}", e),
        };
    }

    fn submit_import(&mut self) {
        let path = PathBuf::from(self.input.trim());
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                self.message = format!("Error: could not read {}: {}", path.display(), e);
                return;
            }
        };
        self.message = match self.ws.session.import(&content, self.today) {
            Ok(report) => format!("{} Remember to save.", report.summary()),
            Err(e) => format!("Error: {}", e),
        };
    }
}
