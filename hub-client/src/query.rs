//! Table query builder
//!
//! Builds the filter, order and limit parameter set sent to the REST API,
//! and mirrors the same semantics in-process for the memory store.

use std::cmp::Ordering;

use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Declarative query over a single table
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    filters: Vec<(String, Value)>,
    order: Option<(String, SortDir)>,
    limit: Option<usize>,
}

impl Query {
    /// Create a query selecting all rows of a table
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Table this query reads from
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Add an equality filter on a column
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Order ascending by a column
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), SortDir::Asc));
        self
    }

    /// Order descending by a column
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), SortDir::Desc));
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Render as REST query parameters (`col=eq.value`, `order=col.asc`)
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", literal_text(value))));
        }

        if let Some((column, dir)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, dir.as_str())));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    /// Whether a row passes every equality filter
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(actual) => values_equal(actual, expected),
                None => false,
            }
        })
    }

    /// Apply the order and limit clauses to an in-memory row set
    pub fn sort_and_clip(&self, rows: &mut Vec<Value>) {
        if let Some((column, dir)) = &self.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
    }
}

/// Text form of a filter literal, without JSON string quoting
fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality that tolerates the wire's string form of non-string values
fn values_equal(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    literal_text(actual) == literal_text(expected)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_follow_rest_grammar() {
        let query = Query::table("restaurants")
            .eq("cuisine_type", "Indian")
            .order_desc("rating")
            .limit(10);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("cuisine_type".to_string(), "eq.Indian".to_string()),
                ("order".to_string(), "rating.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn filters_match_rows() {
        let query = Query::table("orders").eq("user_id", "u1").eq("status", "pending");

        assert!(query.matches(&json!({"user_id": "u1", "status": "pending"})));
        assert!(!query.matches(&json!({"user_id": "u2", "status": "pending"})));
        assert!(!query.matches(&json!({"user_id": "u1"})));
    }

    #[test]
    fn numeric_filter_matches_string_form() {
        let query = Query::table("menu_items").eq("is_available", true);
        assert!(query.matches(&json!({"is_available": true})));
        assert!(!query.matches(&json!({"is_available": false})));
    }

    #[test]
    fn sort_and_clip_orders_then_truncates() {
        let query = Query::table("restaurants").order_desc("rating").limit(2);
        let mut rows = vec![
            json!({"name": "a", "rating": 4.1}),
            json!({"name": "b", "rating": 4.8}),
            json!({"name": "c", "rating": 4.5}),
        ];

        query.sort_and_clip(&mut rows);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "b");
        assert_eq!(rows[1]["name"], "c");
    }

    #[test]
    fn missing_sort_column_sorts_last_ascending() {
        let query = Query::table("menu_items").order_asc("display_order");
        let mut rows = vec![json!({"name": "x"}), json!({"name": "y", "display_order": 1})];

        query.sort_and_clip(&mut rows);

        assert_eq!(rows[0]["name"], "y");
    }
}
