use chrono::{Datelike, NaiveDate};

use crate::model::streak::format_money;
use crate::service::dto::{CalendarDay, CalendarMonth, GoalSummary};
use crate::service::goal_service::GoalSession;
use crate::time::{days_in_month, format_date, month_start_offset, month_title, weekday_labels};

pub struct CalendarUseCase<'a> {
    session: &'a GoalSession,
    locale: &'a str,
}

impl<'a> CalendarUseCase<'a> {
    pub fn new(session: &'a GoalSession, locale: &'a str) -> Self {
        Self { session, locale }
    }

    pub fn month_view(&self, reference: NaiveDate, today: NaiveDate) -> CalendarMonth {
        let days = days_in_month(reference)
            .into_iter()
            .map(|day| CalendarDay {
                key: format_date(day),
                day_of_month: day.day(),
                status: self.session.day_status(day, today),
                is_today: day == today,
            })
            .collect();

        CalendarMonth {
            title: month_title(reference, self.locale),
            weekday_labels: weekday_labels(self.locale),
            leading_blanks: month_start_offset(reference),
            days,
        }
    }

    pub fn summary(&self, today: NaiveDate, currency: &str) -> GoalSummary {
        let result = self.session.score(today);
        GoalSummary {
            money: format_money(result.score, currency),
            score: result.score,
            current_streak: result.current_streak,
            start_date: format_date(self.session.start_date()),
            failed_days: self.session.failed_days().len(),
            unsaved_changes: self.session.has_unsaved_changes(),
        }
    }
}
