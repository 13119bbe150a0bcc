//! Markdown study-plan extraction.
//!
//! The assistant is instructed to answer plan requests in a fixed layout:
//!
//! ```text
//! 📅 **Daily Study Plan — Monday**
//! 🕒 **Total Study Time:** 3 hours
//!
//! 📚 **Subjects:**
//! 1️⃣ **Physics** — 1 hour — Optics
//! 2️⃣ **Math** — 45 min — Integrals
//!
//! ☕ **Breaks:**
//! - Short break after each session.
//!
//! 💡 **Study Tip:**
//! - Use active recall.
//!
//! 💬 **Motivation:**
//! - Execution is everything.
//! ```
//!
//! Each field is matched on its own, so format drift in one section only
//! degrades that field to [`NOT_AVAILABLE`].

use std::sync::OnceLock;

use regex::Regex;

use super::{StudyPlan, StudyPlanSubject, NOT_AVAILABLE};

/// Header that must be present for a reply to count as a plan.
pub const PLAN_MARKER: &str = "Daily Study Plan";

const SUBJECTS_MARKER: &str = "📚 **Subjects:**";
const BREAKS_MARKER: &str = "☕ **Breaks:**";
const FIELD_SEPARATOR: &str = " — ";

struct Patterns {
    total_time: Regex,
    study_tip: Regex,
    motivation: Regex,
    subject_line: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            total_time: Regex::new(r"🕒 \*\*Total Study Time:\*\*[ \t]*(.*)")?,
            study_tip: Regex::new(r"💡 \*\*Study Tip:\*\*[ \t]*\r?\n[ \t]*- (.*)")?,
            motivation: Regex::new(r"💬 \*\*Motivation:\*\*[ \t]*\r?\n[ \t]*- (.*)")?,
            subject_line: Regex::new(r"(?m)^[ \t]*\d+\x{FE0F}?\x{20E3}(.*)$")?,
        })
    }
}

static PATTERNS: OnceLock<Result<Patterns, regex::Error>> = OnceLock::new();

/// Parse a chat reply into a [`StudyPlan`].
///
/// Returns `None` when the reply has no [`PLAN_MARKER`], in which case the
/// caller keeps whatever plan it already had. Extraction failures are logged
/// and also yield `None`.
pub fn parse_study_plan(text: &str) -> Option<StudyPlan> {
    if !text.contains(PLAN_MARKER) {
        return None;
    }

    let patterns = match PATTERNS.get_or_init(Patterns::compile) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse study plan");
            return None;
        }
    };

    let plan = StudyPlan {
        total_time: capture_line(&patterns.total_time, text),
        subjects: parse_subjects(&patterns.subject_line, text),
        study_tip: capture_line(&patterns.study_tip, text),
        motivation: capture_line(&patterns.motivation, text),
    };
    tracing::debug!(subjects = plan.subjects.len(), "parsed study plan");
    Some(plan)
}

fn capture_line(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn parse_subjects(line_re: &Regex, text: &str) -> Vec<StudyPlanSubject> {
    let Some((_, after)) = text.split_once(SUBJECTS_MARKER) else {
        return Vec::new();
    };
    let section = after
        .split_once(BREAKS_MARKER)
        .map_or(after, |(section, _)| section);

    line_re
        .captures_iter(section)
        .filter_map(|caps| caps.get(1).and_then(|m| parse_subject_line(m.as_str())))
        .collect()
}

/// `**Subject** — Duration — Topic`, topic optional.
fn parse_subject_line(body: &str) -> Option<StudyPlanSubject> {
    let mut fields = body.trim().splitn(3, FIELD_SEPARATOR).map(str::trim);

    let subject = fields.next()?.trim_matches('*').trim();
    let duration = fields.next()?;
    if subject.is_empty() || duration.is_empty() {
        return None;
    }
    let topic = fields.next().filter(|t| !t.is_empty()).unwrap_or(NOT_AVAILABLE);

    Some(StudyPlanSubject::new(subject, duration, topic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        Understood. Physics goes first while focus is highest.

        📅 **Daily Study Plan — Monday**
        ------------------------------------
        🕒 **Total Study Time:** 3 hours
        📈 **Strategy:** Hardest subject first.

        📚 **Subjects:**
        1️⃣ **Physics** — 1.5 hours — Optics
        2️⃣ **Math** — 45 min — Integrals
        3️⃣ **History** — 45 min — Cold War

        ☕ **Breaks:**
        - Short break after each session.
        - Long break after 2-3 sessions.

        💡 **Study Tip:**
        - Close every tab you do not need.

        💬 **Motivation:**
        - Execution is everything.
    "};

    #[test]
    fn parses_full_plan() {
        let plan = parse_study_plan(SAMPLE).unwrap();
        assert_eq!(plan.total_time, "3 hours");
        assert_eq!(plan.study_tip, "Close every tab you do not need.");
        assert_eq!(plan.motivation, "Execution is everything.");
        assert_eq!(plan.subjects.len(), 3);

        let first = &plan.subjects[0];
        assert_eq!(first.subject, "Physics");
        assert_eq!(first.duration, "1.5 hours");
        assert_eq!(first.topic, "Optics");
        assert!(plan.subjects.iter().all(|s| !s.completed));

        let names: Vec<_> = plan.subjects.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(names, ["Physics", "Math", "History"]);
    }

    #[test]
    fn no_marker_means_no_plan() {
        assert!(parse_study_plan("Sure! What subjects do you need to cover?").is_none());
        assert!(parse_study_plan("").is_none());
    }

    #[test]
    fn missing_topic_defaults() {
        let text = indoc! {"
            📅 **Daily Study Plan**
            📚 **Subjects:**
            1️⃣ **Chemistry** — 30 min
            ☕ **Breaks:**
        "};
        let plan = parse_study_plan(text).unwrap();
        assert_eq!(plan.subjects.len(), 1);
        assert_eq!(plan.subjects[0].subject, "Chemistry");
        assert_eq!(plan.subjects[0].duration, "30 min");
        assert_eq!(plan.subjects[0].topic, "N/A");
    }

    #[test]
    fn missing_sections_degrade_per_field() {
        let plan = parse_study_plan("Here is your Daily Study Plan, nothing else.").unwrap();
        assert_eq!(plan.total_time, "N/A");
        assert_eq!(plan.study_tip, "N/A");
        assert_eq!(plan.motivation, "N/A");
        assert!(plan.subjects.is_empty());
    }

    #[test]
    fn subjects_outside_section_are_ignored() {
        let text = indoc! {"
            📅 **Daily Study Plan**
            1️⃣ **Stray** — 10 min — Before section
            📚 **Subjects:**
            1️⃣ **Biology** — 40 min — Cells
            ☕ **Breaks:**
            2️⃣ **Stray** — 10 min — After section
        "};
        let plan = parse_study_plan(text).unwrap();
        assert_eq!(plan.subjects.len(), 1);
        assert_eq!(plan.subjects[0].subject, "Biology");
    }

    #[test]
    fn section_runs_to_end_without_breaks_marker() {
        let text = indoc! {"
            Daily Study Plan
            📚 **Subjects:**
            1️⃣ **Art** — 20 min — Sketching
            2️⃣ **Music** — 20 min — Scales
        "};
        let plan = parse_study_plan(text).unwrap();
        assert_eq!(plan.subjects.len(), 2);
    }

    #[test]
    fn topic_keeps_extra_separators() {
        let line = parse_subject_line(" **Math** — 45 min — Limits — epsilon proofs").unwrap();
        assert_eq!(line.topic, "Limits — epsilon proofs");
    }

    #[test]
    fn line_without_duration_is_skipped() {
        assert!(parse_subject_line(" **Math**").is_none());
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = SAMPLE.replace('\n', "\r\n");
        let plan = parse_study_plan(&text).unwrap();
        assert_eq!(plan.subjects.len(), 3);
        assert_eq!(plan.subjects[2].topic, "Cold War");
        assert_eq!(plan.study_tip, "Close every tab you do not need.");
    }
}
