#[cfg(test)]
mod tests {
    use crate::model::streak::DayStatus;
    use crate::service::goal_service::GoalSession;
    use crate::usecase::calendar::CalendarUseCase;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session() -> GoalSession {
        let mut session = GoalSession::new(date(2025, 10, 6));
        session.apply_record(None, date(2025, 10, 10));
        session.toggle_day(date(2025, 10, 8), date(2025, 10, 10)).unwrap();
        session
    }

    #[test]
    fn test_month_view_classifies_days() {
        let session = session();
        let usecase = CalendarUseCase::new(&session, "en-US");
        let month = usecase.month_view(date(2025, 10, 20), date(2025, 10, 10));

        assert_eq!(month.title, "October 2025");
        assert_eq!(month.weekday_labels[0], "Mon");
        assert_eq!(month.leading_blanks, 2);
        assert_eq!(month.days.len(), 31);

        let status = |d: usize| month.days[d - 1].status;
        assert_eq!(status(5), DayStatus::BeforeStart);
        assert_eq!(status(6), DayStatus::Success);
        assert_eq!(status(8), DayStatus::Failed);
        assert_eq!(status(11), DayStatus::Future);
        assert!(month.days[9].is_today);
        assert_eq!(month.days.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_weeks_pad_to_full_rows() {
        let session = session();
        let usecase = CalendarUseCase::new(&session, "en-US");
        let month = usecase.month_view(date(2025, 10, 1), date(2025, 10, 10));
        let weeks = month.weeks();

        assert_eq!(weeks.len(), 5);
        assert!(weeks.iter().all(|w| w.len() == 7));
        assert!(weeks[0][0].is_none() && weeks[0][1].is_none());
        assert_eq!(weeks[0][2].unwrap().key, "2025-10-01");
        assert_eq!(weeks[4][4].unwrap().key, "2025-10-31");
        assert!(weeks[4][5].is_none());
    }

    #[test]
    fn test_summary() {
        let session = session();
        let usecase = CalendarUseCase::new(&session, "es-ES");
        let summary = usecase.summary(date(2025, 10, 10), "EUR");

        assert_eq!(summary.money, "0.02 EUR");
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.start_date, "2025-10-06");
        assert_eq!(summary.failed_days, 1);
        assert!(summary.unsaved_changes);
    }
}
