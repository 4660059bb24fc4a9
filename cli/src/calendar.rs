use goaltracker_core::service::dto::{CalendarDay, CalendarMonth, GoalSummary};
use goaltracker_core::DayStatus;
use tabled::builder::Builder;
use tabled::settings::object::{Rows, Segment};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Accumulated")]
    money: String,
    #[tabled(rename = "Streak")]
    streak: u64,
    #[tabled(rename = "Since")]
    start: String,
    #[tabled(rename = "Failed days")]
    failed: usize,
    #[tabled(rename = "Sync")]
    sync: String,
}

pub fn print_summary(summary: &GoalSummary) {
    let row = SummaryRow {
        money: summary.money.clone(),
        streak: summary.current_streak,
        start: summary.start_date.clone(),
        failed: summary.failed_days,
        sync: if summary.unsaved_changes { "unsaved changes".to_string() } else { "in sync".to_string() },
    };

    let mut table = Table::new(vec![row]);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn cell_text(day: &CalendarDay) -> String {
    let marker = match day.status {
        DayStatus::Failed => " x",
        DayStatus::BeforeStart => " -",
        DayStatus::Future | DayStatus::Success => "",
    };
    if day.is_today {
        format!("[{}]{}", day.day_of_month, marker)
    } else {
        format!("{}{}", day.day_of_month, marker)
    }
}

pub fn print_month(month: &CalendarMonth) {
    println!("\n\x1b[1;36m{}\x1b[0m", month.title);

    let mut builder = Builder::default();
    builder.push_record(month.weekday_labels.iter().cloned());
    for week in month.weeks() {
        builder.push_record(
            week.into_iter()
                .map(|cell| cell.map(cell_text).unwrap_or_default()),
        );
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Segment::all()).with(Alignment::center()))
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    println!("x = failed   - = before start   [n] = today");
}
