use chrono::NaiveDate;
use clap::Args;
use focusflow_core::manager::today;
use focusflow_core::{NewStudySession, ValidationError};

use super::{print_json, App, CliResult};

#[derive(Args)]
pub struct LogArgs {
    /// Subject studied
    subject: String,
    /// Minutes studied
    minutes: f64,
    /// Day of the session (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Mark the session as stopped early
    #[arg(long)]
    incomplete: bool,
}

pub fn run(args: LogArgs) -> CliResult {
    if args.minutes.is_nan() || args.minutes <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "minutes".into(),
            message: "must be greater than zero".into(),
        }
        .into());
    }

    let mut app = App::load()?;
    let mut session = NewStudySession::from_minutes(
        app.config.user.id.clone(),
        args.subject,
        args.minutes,
        args.date.unwrap_or_else(today),
    );
    session.completed = !args.incomplete;

    let record = app.manager.log_session(session)?;
    print_json(&record)
}
