//! In-memory evaluation of query specs over JSON-shaped records.
//!
//! Records look like the API's serialized output: camelCase keys, related
//! records nested under the relation name (an object for one-relations, an
//! array for many-relations). This gives the reference meaning of a
//! `Condition` independently of any SQL rendering.
//!
//! Substring matches see timestamps as RFC 3339 UTC text truncated to the
//! second (`2025-04-01T09:00:00Z`), which is also how the SQL renderer
//! presents timestamp columns to `ILIKE`.

use serde_json::Value;

use super::{
    condition::{Cardinality, Condition, FieldCondition, FieldValue, Operator},
    mapper::{QuerySpec, SortDirection},
};

impl Condition {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Condition::Always => true,
            Condition::Field(leaf) => leaf.matches(record),
            Condition::And(parts) => parts.iter().all(|c| c.matches(record)),
            Condition::Or(parts) => parts.iter().any(|c| c.matches(record)),
            Condition::Relation {
                name,
                cardinality,
                condition,
            } => match (cardinality, record.get(name)) {
                (Cardinality::One, Some(related)) if related.is_object() => condition.matches(related),
                (Cardinality::Many, Some(Value::Array(elements))) => {
                    elements.iter().any(|e| condition.matches(e))
                }
                _ => false,
            },
        }
    }
}

impl FieldCondition {
    pub fn matches(&self, record: &Value) -> bool {
        let actual = record.get(&self.field).unwrap_or(&Value::Null);
        match &self.operator {
            Operator::Equals(expected) => value_equals(actual, expected),
            Operator::Contains {
                value,
                case_insensitive,
            } => match searchable_text(actual) {
                Some(text) if *case_insensitive => text.to_lowercase().contains(&value.to_lowercase()),
                Some(text) => text.contains(value.as_str()),
                None => false,
            },
        }
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text a substring match runs against; timestamps are normalised to UTC seconds
fn searchable_text(v: &Value) -> Option<String> {
    let text = scalar_text(v)?;
    match chrono::DateTime::parse_from_rfc3339(&text) {
        Ok(ts) => Some(ts.with_timezone(&chrono::Utc).format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        Err(_) => Some(text),
    }
}

fn value_equals(actual: &Value, expected: &FieldValue) -> bool {
    match expected {
        FieldValue::Null => actual.is_null(),
        FieldValue::Text(s) => scalar_text(actual).as_deref() == Some(s.as_str()),
        FieldValue::Integer(i) => actual.as_i64() == Some(*i),
        FieldValue::Boolean(b) => actual.as_bool() == Some(*b),
        // Stored timestamps compare by calendar day
        FieldValue::Date(d) => actual
            .as_str()
            .is_some_and(|s| s.get(..10) == Some(d.format("%Y-%m-%d").to_string().as_str())),
        FieldValue::Timestamp(t) => actual
            .as_str()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|parsed| parsed == *t),
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> std::cmp::Ordering {
    let (x, y) = (a.get(field), b.get(field));
    match (x.and_then(Value::as_f64), y.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => {
            let x = x.and_then(scalar_text);
            let y = y.and_then(scalar_text);
            x.cmp(&y)
        }
    }
}

impl QuerySpec {
    /// Number of records satisfying the WHERE condition
    pub fn count_in(&self, records: &[Value]) -> usize {
        let condition = self.where_condition();
        records.iter().filter(|r| condition.matches(r)).count()
    }

    /// Matching records, ordered and paginated as requested
    pub fn fetch_from<'a>(&self, records: &'a [Value]) -> Vec<&'a Value> {
        let condition = self.where_condition();
        let mut matched: Vec<&Value> = records.iter().filter(|r| condition.matches(r)).collect();

        for order in self.order_by.iter().rev() {
            matched.sort_by(|a, b| {
                let ord = compare_field(a, b, &order.field);
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        match self.pagination {
            Some(page) => matched
                .into_iter()
                .skip(page.skip().max(0) as usize)
                .take(page.take().max(0) as usize)
                .collect(),
            None => matched,
        }
    }
}
