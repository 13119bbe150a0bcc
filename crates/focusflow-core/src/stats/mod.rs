//! Statistics derived from the session history.
//!
//! Provides the study streak and the aggregates shown on the tracker and
//! dashboard (totals, today's completion, seven-day series, insight line).

mod dashboard;
mod streak;

pub use dashboard::{format_hours, hours_by_day, DayHours, StudyOverview, WEEK_DAYS};
pub use streak::{compute_streak, study_streak};
