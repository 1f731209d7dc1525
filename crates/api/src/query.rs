//! Query parameter types shared by more than one handler module.

use helpdesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to the list defaults, returning `(limit, offset)`.
    pub fn clamped(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// Treat an absent, empty or `all` filter value as "no filter".
pub fn non_empty_filter(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let params = PaginationParams::default();
        assert_eq!(params.clamped(), (DEFAULT_LIST_LIMIT, 0));

        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-4),
        };
        assert_eq!(params.clamped(), (MAX_LIST_LIMIT, 0));
    }

    #[test]
    fn blank_and_all_filters_are_ignored() {
        assert_eq!(non_empty_filter(None), None);
        assert_eq!(non_empty_filter(Some("  ")), None);
        assert_eq!(non_empty_filter(Some("all")), None);
        assert_eq!(non_empty_filter(Some("open")), Some("open"));
    }
}
