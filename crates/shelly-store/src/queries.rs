//! Query builder for stored readings.
//!
//! [`RangeQuery`] generalizes [`Store::data_in_range`](crate::Store::data_in_range)
//! with optional bounds, a row limit, and ordering.
//!
//! # Example
//!
//! ```
//! use shelly_store::RangeQuery;
//!
//! // Everything on New Year's Day, oldest first
//! let day = RangeQuery::new()
//!     .since("2024-01-01 00:00:00")
//!     .until("2024-01-01 23:59:59");
//!
//! // The 10 most recent rows
//! let recent = RangeQuery::new().newest_first().limit(10);
//! ```

/// Fluent query builder for stored readings.
///
/// Bounds are inclusive and compared as strings in the stored
/// `YYYY-MM-DD HH:MM:SS` format; they are validated when the query runs.
/// Results are ordered by row id, which is insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// Include only rows with `timestamp >= since`.
    pub since: Option<String>,
    /// Include only rows with `timestamp <= until`.
    pub until: Option<String>,
    /// Maximum number of rows.
    pub limit: Option<u32>,
    /// Order by id descending instead of ascending.
    pub newest_first: bool,
}

impl RangeQuery {
    /// Create an unbounded query in insertion order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound (inclusive).
    pub fn since(mut self, timestamp: &str) -> Self {
        self.since = Some(timestamp.to_string());
        self
    }

    /// Upper bound (inclusive).
    pub fn until(mut self, timestamp: &str) -> Self {
        self.until = Some(timestamp.to_string());
        self
    }

    /// Limit the number of rows returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Return the most recently inserted rows first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<&str>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(ref since) = self.since {
            conditions.push("timestamp >= ?");
            params.push(since.as_str());
        }

        if let Some(ref until) = self.until {
            conditions.push("timestamp <= ?");
            params.push(until.as_str());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, power, total, total_returned, timestamp \
             FROM readings {} ORDER BY id {}",
            where_clause, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let query = RangeQuery::new();
        assert!(query.since.is_none());
        assert!(query.until.is_none());
        assert!(query.limit.is_none());
        assert!(!query.newest_first);
    }

    #[test]
    fn test_unbounded_sql() {
        let sql = RangeQuery::new().build_sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY id ASC"));
    }

    #[test]
    fn test_bounded_sql_and_params() {
        let query = RangeQuery::new()
            .since("2024-01-01 00:00:00")
            .until("2024-01-31 23:59:59")
            .newest_first()
            .limit(5);

        let (where_clause, params) = query.build_where();
        assert_eq!(where_clause, "WHERE timestamp >= ? AND timestamp <= ?");
        assert_eq!(params, vec!["2024-01-01 00:00:00", "2024-01-31 23:59:59"]);

        let sql = query.build_sql();
        assert!(sql.contains("ORDER BY id DESC"));
        assert!(sql.ends_with("LIMIT 5"));
    }

    #[test]
    fn test_until_only() {
        let query = RangeQuery::new().until("2024-06-01 00:00:00");
        let (where_clause, params) = query.build_where();
        assert_eq!(where_clause, "WHERE timestamp <= ?");
        assert_eq!(params.len(), 1);
    }
}
