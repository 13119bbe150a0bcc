use clap::Subcommand;
use focusflow_core::manager::today;
use focusflow_core::stats::format_hours;

use super::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// Consecutive study days
    Streak,
    /// Hours per day for the last seven days
    Week,
}

pub fn run(action: StatsAction) -> CliResult {
    let app = App::load()?;
    let today = today();
    let overview = app
        .manager
        .overview(today, app.config.history.recent_limit as usize);

    match action {
        StatsAction::Today => {
            let sessions = app
                .manager
                .history()
                .iter()
                .filter(|s| s.date == today)
                .count();
            print_json(&serde_json::json!({
                "date": today,
                "sessions": sessions,
                "hours": format_hours(overview.today_hours),
                "completion_pct": overview.today_completion_pct,
                "focus_score": overview.focus_score,
                "streak": overview.streak,
            }))?;
        }
        StatsAction::All => print_json(&overview)?,
        StatsAction::Streak => print_json(&serde_json::json!({ "streak": overview.streak }))?,
        StatsAction::Week => print_json(&overview.last_seven_days)?,
    }
    Ok(())
}
