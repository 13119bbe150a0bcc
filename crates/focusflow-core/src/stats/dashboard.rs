//! Dashboard and tracker aggregates over the session history.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::streak::study_streak;
use crate::storage::StudySession;

/// Number of days shown in the weekly chart.
pub const WEEK_DAYS: i64 = 7;

/// Hours studied on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub date: NaiveDate,
    /// Short weekday label ("Mon").
    pub day: String,
    pub hours: f64,
}

/// Everything the tracker and dashboard display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyOverview {
    pub total_hours: f64,
    pub total_sessions: usize,
    pub today_hours: f64,
    /// Share of today's sessions that ran to completion (0..100).
    pub today_completion_pct: f64,
    pub focus_score: u32,
    pub streak: u32,
    /// Oldest day first, today last.
    pub last_seven_days: Vec<DayHours>,
    pub recent: Vec<StudySession>,
    pub insight: String,
}

impl StudyOverview {
    pub fn compute(history: &[StudySession], today: NaiveDate, recent_limit: usize) -> Self {
        let streak = study_streak(history, today);

        let todays: Vec<_> = history.iter().filter(|s| s.date == today).collect();
        let today_hours = todays.iter().map(|s| s.duration).sum();
        let today_completion_pct = if todays.is_empty() {
            0.0
        } else {
            todays.iter().filter(|s| s.completed).count() as f64 / todays.len() as f64 * 100.0
        };

        let mut recent = history.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let insight = insight(recent.first(), streak);
        recent.truncate(recent_limit);

        Self {
            total_hours: history.iter().map(|s| s.duration).sum(),
            total_sessions: history.len(),
            today_hours,
            today_completion_pct,
            focus_score: today_completion_pct.round() as u32,
            streak,
            last_seven_days: hours_by_day(history, today, WEEK_DAYS),
            recent,
            insight,
        }
    }
}

/// Hours per day for the `days` days ending at `today`, oldest first.
pub fn hours_by_day(history: &[StudySession], today: NaiveDate, days: i64) -> Vec<DayHours> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DayHours {
                date,
                day: date.format("%a").to_string(),
                hours: history
                    .iter()
                    .filter(|s| s.date == date)
                    .map(|s| s.duration)
                    .sum(),
            }
        })
        .collect()
}

fn insight(latest: Option<&StudySession>, streak: u32) -> String {
    let Some(latest) = latest else {
        return "Log your first session to get personalized insights from the AI.".to_string();
    };
    let hours = format_hours(latest.duration);
    if streak > 2 {
        format!(
            "You're on a 🔥 {streak}-day streak! Incredible focus. Your last session was {hours} hours of {}. Let's keep it going!",
            latest.subject
        )
    } else {
        format!(
            "Great work on your last session in {}! You studied for {hours} hours. Tackle another session today to keep the momentum going.",
            latest.subject
        )
    }
}

/// Hours rounded to two decimals, without trailing zeros.
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    format!("{rounded}")
}
