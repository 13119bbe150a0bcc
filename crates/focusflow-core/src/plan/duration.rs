use std::sync::OnceLock;

use regex::Regex;

/// Fallback session length when a duration label is not understood (25 minutes).
pub const DEFAULT_SESSION_SECS: u64 = 25 * 60;

static MINUTES_RE: OnceLock<Option<Regex>> = OnceLock::new();
static HOURS_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Interpret a free-text plan duration as seconds.
///
/// A leading integer followed by "min" wins (minutes), otherwise a possibly
/// fractional number followed by "hour" (hours). Anything else falls back to
/// [`DEFAULT_SESSION_SECS`].
pub fn parse_duration_secs(label: &str) -> u64 {
    let minutes = MINUTES_RE
        .get_or_init(|| Regex::new(r"(\d+)\s*min").ok())
        .as_ref()
        .and_then(|re| re.captures(label))
        .and_then(|caps| caps[1].parse::<u64>().ok());
    if let Some(m) = minutes {
        return m.saturating_mul(60);
    }

    let hours = HOURS_RE
        .get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*hour").ok())
        .as_ref()
        .and_then(|re| re.captures(label))
        .and_then(|caps| caps[1].parse::<f64>().ok());
    match hours {
        Some(h) => (h * 3600.0).round() as u64,
        None => DEFAULT_SESSION_SECS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes() {
        assert_eq!(parse_duration_secs("45 min"), 2700);
        assert_eq!(parse_duration_secs("90 minutes"), 5400);
        assert_eq!(parse_duration_secs("20min"), 1200);
    }

    #[test]
    fn hours() {
        assert_eq!(parse_duration_secs("1.5 hour"), 5400);
        assert_eq!(parse_duration_secs("2 hours"), 7200);
    }

    #[test]
    fn minutes_take_precedence_over_hours() {
        assert_eq!(parse_duration_secs("1 hour 30 min"), 1800);
    }

    #[test]
    fn unparseable_defaults_to_pomodoro() {
        assert_eq!(parse_duration_secs("a while"), 1500);
        assert_eq!(parse_duration_secs(""), 1500);
    }
}
