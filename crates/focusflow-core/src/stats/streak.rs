//! Consecutive-day study streak.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::storage::StudySession;

/// Count consecutive calendar days with at least one session.
///
/// The streak is anchored at `today` or the day before: if the most recent
/// date is older than yesterday the streak is 0. From there it extends
/// backwards while each distinct date is exactly one day before the previous
/// one. Several sessions on the same day count once.
pub fn compute_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let distinct: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let mut newest_first = distinct.into_iter().rev();

    let Some(mut current) = newest_first.next() else {
        return 0;
    };
    if current != today && current != today - Duration::days(1) {
        return 0;
    }

    let mut streak = 1;
    for prev in newest_first {
        if current - prev != Duration::days(1) {
            break;
        }
        streak += 1;
        current = prev;
    }
    streak
}

/// [`compute_streak`] over session records.
pub fn study_streak(history: &[StudySession], today: NaiveDate) -> u32 {
    compute_streak(history.iter().map(|s| s.date), today)
}
