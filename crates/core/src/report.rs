//! Dashboard and admin report assembly.
//!
//! The store returns raw `(key, count)` pairs from `GROUP BY` queries; the
//! helpers here turn them into fixed-shape breakdowns where every known key
//! is present, zero when the store had no rows for it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ticket::{TicketPriority, TicketStatus};

/// Ticket counts keyed by status text, every status present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub total: i64,
    pub by_status: BTreeMap<&'static str, i64>,
}

/// Ticket counts keyed by priority text, every priority present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub by_priority: BTreeMap<&'static str, i64>,
}

/// Zero-fill status counts. Rows with an unknown status are ignored for the
/// per-status map but still counted in `total`.
pub fn status_breakdown(rows: &[(String, i64)]) -> StatusBreakdown {
    let mut by_status: BTreeMap<&'static str, i64> =
        TicketStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut total = 0;
    for (status, count) in rows {
        total += count;
        if let Ok(known) = status.parse::<TicketStatus>() {
            *by_status.entry(known.as_str()).or_default() += count;
        }
    }
    StatusBreakdown { total, by_status }
}

/// Zero-fill priority counts. Unknown priorities are ignored.
pub fn priority_breakdown(rows: &[(String, i64)]) -> PriorityBreakdown {
    let mut by_priority: BTreeMap<&'static str, i64> =
        TicketPriority::ALL.iter().map(|p| (p.as_str(), 0)).collect();
    for (priority, count) in rows {
        if let Ok(known) = priority.parse::<TicketPriority>() {
            *by_priority.entry(known.as_str()).or_default() += count;
        }
    }
    PriorityBreakdown { by_priority }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_store_gives_all_zero() {
        let breakdown = status_breakdown(&[]);
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.by_status.len(), TicketStatus::ALL.len());
        assert!(breakdown.by_status.values().all(|c| *c == 0));
    }

    #[test]
    fn counts_are_placed_and_missing_filled() {
        let breakdown = status_breakdown(&rows(&[("open", 4), ("closed", 2)]));
        assert_eq!(breakdown.total, 6);
        assert_eq!(breakdown.by_status["open"], 4);
        assert_eq!(breakdown.by_status["closed"], 2);
        assert_eq!(breakdown.by_status["in_progress"], 0);
        assert_eq!(breakdown.by_status["cancelled"], 0);
    }

    #[test]
    fn unknown_status_counts_toward_total_only() {
        let breakdown = status_breakdown(&rows(&[("open", 1), ("legacy", 3)]));
        assert_eq!(breakdown.total, 4);
        assert!(!breakdown.by_status.contains_key("legacy"));
    }

    #[test]
    fn priority_breakdown_zero_fills() {
        let breakdown = priority_breakdown(&rows(&[("critical", 2)]));
        assert_eq!(breakdown.by_priority["critical"], 2);
        assert_eq!(breakdown.by_priority["low"], 0);
        assert_eq!(breakdown.by_priority.len(), TicketPriority::ALL.len());
    }
}
