//! List-query helpers shared by every filtered listing.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Number of rows shown in "recent" widgets on the dashboard and reports.
pub const RECENT_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Query helpers
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` pattern matching `term` anywhere, escaping the LIKE
/// wildcards so user input is matched literally.
///
/// Returns `None` for blank input so callers can skip the condition.
pub fn like_pattern(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for c in trimmed.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

/// Turn an inclusive calendar-day range into `[start, end)` UTC bounds.
///
/// `from` maps to midnight at the start of that day; `to` maps to midnight
/// at the start of the following day so the whole `to` day is included.
pub fn day_bounds(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> (Option<Timestamp>, Option<Timestamp>) {
    let start = from.map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let end = to
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .map(|d| d.and_time(NaiveTime::MIN).and_utc());
    (start, end)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None, 50, 200), 50);
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
        assert_eq!(clamp_limit(Some(-5), 50, 200), 1);
        assert_eq!(clamp_limit(Some(500), 50, 200), 200);
        assert_eq!(clamp_limit(Some(20), 50, 200), 20);
    }

    #[test]
    fn offset_is_non_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn like_pattern_wraps_and_trims() {
        assert_eq!(like_pattern("  modem ").as_deref(), Some("%modem%"));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_up").as_deref(), Some("%100\\%\\_up%"));
        assert_eq!(like_pattern(r"a\b").as_deref(), Some(r"%a\\b%"));
    }

    #[test]
    fn day_bounds_cover_whole_days() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let (start, end) = day_bounds(Some(from), Some(to));
        assert_eq!(start.unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2024-05-04T00:00:00+00:00");
    }

    #[test]
    fn day_bounds_are_independent() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let (start, end) = day_bounds(None, Some(day));
        assert!(start.is_none());
        assert_eq!(end.unwrap().to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(day_bounds(None, None), (None, None));
    }

    #[test]
    fn blank_search_is_skipped() {
        assert_eq!(like_pattern(""), None);
        assert_eq!(like_pattern("   "), None);
    }
}
