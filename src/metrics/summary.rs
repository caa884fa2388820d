// src/metrics/summary.rs

use crate::model::RefactoringEvent;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `refactorings.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactoringSummary {
    /// Number of events per refactoring type
    pub refactorings: BTreeMap<String, usize>,
    pub average_time_between_refactors: String,
}

pub fn summarize(events: &[RefactoringEvent]) -> RefactoringSummary {
    let mut refactorings = BTreeMap::new();
    for event in events {
        *refactorings.entry(event.kind.clone()).or_insert(0) += 1;
    }

    RefactoringSummary {
        refactorings,
        average_time_between_refactors: format_duration(average_interval(events)),
    }
}

/// Mean time between consecutive refactoring-bearing commits.
///
/// Events arrive newest first, so each step adds `previous - current`. The sum
/// is divided by the number of events, not the number of intervals, rounding
/// to the nearest microsecond with ties to even; with no events the result is zero.
pub fn average_interval(events: &[RefactoringEvent]) -> Duration {
    if events.is_empty() {
        return Duration::zero();
    }

    let mut total_seconds: i64 = 0;
    let mut previous: Option<&RefactoringEvent> = None;
    for event in events {
        if let Some(prev) = previous {
            if prev.commit_hash != event.commit_hash {
                total_seconds += prev.commit_timestamp - event.commit_timestamp;
            }
        }
        previous = Some(event);
    }

    Duration::microseconds(divide_half_even(total_seconds * 1_000_000, events.len() as i64))
}

/// Integer division rounding ties to the even quotient
fn divide_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    let twice_remainder = 2 * numerator.rem_euclid(denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Renders a duration as `[D day[s], ]H:MM:SS[.ffffff]`
pub fn format_duration(duration: Duration) -> String {
    let total_micros = duration.num_microseconds().unwrap_or(i64::MAX);
    let micros_per_day = 86_400 * 1_000_000;

    let days = total_micros.div_euclid(micros_per_day);
    let rest = total_micros.rem_euclid(micros_per_day);
    let seconds = rest / 1_000_000;
    let micros = rest % 1_000_000;

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{} day{}, ", days, plural));
    }
    out.push_str(&format!("{}:{:02}:{:02}", seconds / 3600, (seconds / 60) % 60, seconds % 60));
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event(hash: &str, kind: &str, timestamp: i64) -> RefactoringEvent {
        RefactoringEvent { commit_hash: hash.into(), kind: kind.into(), commit_timestamp: timestamp }
    }

    #[test]
    fn test_histogram_counts_types() {
        let events = vec![
            event("c", "Rename Method", 300),
            event("c", "Extract Method", 300),
            event("b", "Rename Method", 200),
        ];
        let summary = summarize(&events);

        assert_eq!(summary.refactorings["Rename Method"], 2);
        assert_eq!(summary.refactorings["Extract Method"], 1);
    }

    #[test]
    fn test_two_commits_one_hour_apart() {
        let ten = 10 * 3600;
        let nine = 9 * 3600;
        let events = vec![event("b", "Rename Method", ten), event("a", "Move Class", nine)];

        assert_eq!(average_interval(&events), Duration::minutes(30));
        assert_eq!(summarize(&events).average_time_between_refactors, "0:30:00");
    }

    #[test]
    fn test_no_events_is_zero() {
        let summary = summarize(&[]);
        assert!(summary.refactorings.is_empty());
        assert_eq!(summary.average_time_between_refactors, "0:00:00");
    }

    #[test]
    fn test_events_in_same_commit_add_no_interval() {
        let events = vec![event("b", "Rename Method", 100), event("b", "Move Class", 100)];
        assert_eq!(average_interval(&events), Duration::zero());
    }

    #[test]
    fn test_average_rounds_half_to_even() {
        let spread = |seconds: i64| {
            let mut events = vec![event("b", "Rename Method", seconds)];
            events.extend((0..127).map(|_| event("a", "Move Class", 0)));
            events
        };
        // 1s / 128 = 7812.5us, 3s / 128 = 23437.5us
        assert_eq!(average_interval(&spread(1)), Duration::microseconds(7_812));
        assert_eq!(average_interval(&spread(3)), Duration::microseconds(23_438));

        let thirds = vec![event("b", "Rename Method", 10), event("a", "Move Class", 0), event("a", "Move Class", 0)];
        assert_eq!(summarize(&thirds).average_time_between_refactors, "0:00:03.333333");

        let two_thirds = vec![event("b", "Rename Method", 20), event("a", "Move Class", 0), event("a", "Move Class", 0)];
        assert_eq!(summarize(&two_thirds).average_time_between_refactors, "0:00:06.666667");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(3661)), "1:01:01");
        assert_eq!(format_duration(Duration::days(2) + Duration::hours(3)), "2 days, 3:00:00");
        assert_eq!(format_duration(Duration::days(1)), "1 day, 0:00:00");
        assert_eq!(format_duration(Duration::microseconds(3_333_333)), "0:00:03.333333");
    }

    #[test]
    fn test_serialized_shape() {
        let summary = summarize(&[event("a", "Rename Method", 1)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"refactorings": {"Rename Method": 1}, "average_time_between_refactors": "0:00:00"})
        );
    }
}
