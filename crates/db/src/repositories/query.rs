//! PostgREST query strings.

use chrono::{DateTime, SecondsFormat, Utc};
use finbot_core::ledger::{SortOrder, TransactionFilter};
use finbot_shared::types::UserId;

use crate::client::Query;

/// `eq.` filter value.
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// Timestamp literal. Microsecond precision, which is what the backend stores,
/// so an end-of-day bound never rounds into the next day.
pub fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rows of one user.
pub fn by_user(user_id: UserId) -> Query {
    vec![("user_id", eq(user_id))]
}

/// One row of one user by id.
pub fn by_id(id: impl std::fmt::Display, user_id: UserId) -> Query {
    vec![("id", eq(id)), ("user_id", eq(user_id))]
}

/// Select of transactions matching `filter`.
pub fn transactions(user_id: UserId, filter: &TransactionFilter) -> Query {
    let mut query = vec![("select", "*".to_string()), ("user_id", eq(user_id))];
    if let Some(start) = filter.start_date {
        query.push(("date", format!("gte.{}", timestamp(start))));
    }
    if let Some(end) = filter.end_date {
        query.push(("date", format!("lte.{}", timestamp(end))));
    }
    let order = match filter.order {
        SortOrder::OldestFirst => "date.asc",
        SortOrder::NewestFirst => "date.desc",
    };
    query.push(("order", order.to_string()));
    if let Some(limit) = filter.limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    #[test]
    fn test_range_query() {
        let start = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 10, 31, 23, 59, 59).unwrap()
            + chrono::TimeDelta::nanoseconds(999_999_999);
        let query = transactions(UserId(12), &TransactionFilter::between(start, end));

        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("user_id", "eq.12"),
                ("date", "gte.2026-10-01T00:00:00.000000Z"),
                ("date", "lte.2026-10-31T23:59:59.999999Z"),
                ("order", "date.asc"),
            ]
        );
    }

    #[test]
    fn test_recent_query() {
        let query = transactions(UserId(3), &TransactionFilter::recent(10));
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("user_id", "eq.3"),
                ("order", "date.desc"),
                ("limit", "10"),
            ]
        );
    }

    #[test]
    fn test_by_id() {
        assert_eq!(pairs(&by_id("abc", UserId(1))), vec![("id", "eq.abc"), ("user_id", "eq.1")]);
    }
}
