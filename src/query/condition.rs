//! Typed condition tree shared by filters and keyword searches.
//!
//! Every predicate the engine can express is a `FieldCondition` (a field
//! name, an operator and its operand) combined through `Condition`. There is
//! no free-form operator string, so an unsupported operator cannot reach the
//! persistence layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Scalar operand of an equality condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

/// Comparison applied to a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals(FieldValue),
    Contains { value: String, case_insensitive: bool },
}

/// Leaf predicate: `field <operator>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCondition {
    pub field: String,
    pub operator: Operator,
}

impl FieldCondition {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Equals(value.into()),
        }
    }

    /// Case-insensitive substring match, the only match keyword search uses
    pub fn contains_insensitive(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Contains {
                value: value.into(),
                case_insensitive: true,
            },
        }
    }
}

/// Whether a relation hop yields one related record or a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// Boolean condition tree evaluated against one root record.
///
/// `Relation` moves evaluation to the related record(s): with
/// `Cardinality::One` the nested condition must hold for the single related
/// record (a missing record never matches), with `Cardinality::Many` it must
/// hold for at least one element of the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Always,
    Field(FieldCondition),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Relation {
        name: String,
        cardinality: Cardinality,
        condition: Box<Condition>,
    },
}

impl Condition {
    /// Conjunction that drops `Always` operands and flattens nested ANDs.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
        let mut parts = Vec::new();
        for condition in conditions {
            match condition {
                Condition::Always => {}
                Condition::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Condition::Always,
            1 => parts.remove(0),
            _ => Condition::And(parts),
        }
    }

    /// Disjunction that flattens nested ORs and collapses to `Always` as soon
    /// as one operand is `Always`.
    ///
    /// Returns `None` for an empty input. An empty disjunction matches
    /// nothing, so `Or(vec![])` is never built.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Option<Condition> {
        let mut parts = Vec::new();
        for condition in conditions {
            match condition {
                Condition::Always => return Some(Condition::Always),
                Condition::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => None,
            1 => Some(parts.remove(0)),
            _ => Some(Condition::Or(parts)),
        }
    }

    pub fn relation(name: impl Into<String>, cardinality: Cardinality, condition: Condition) -> Self {
        Condition::Relation {
            name: name.into(),
            cardinality,
            condition: Box::new(condition),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Condition::Always)
    }
}

impl From<FieldCondition> for Condition {
    fn from(c: FieldCondition) -> Self {
        Condition::Field(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(field: &str) -> Condition {
        FieldCondition::equals(field, "x").into()
    }

    #[test]
    fn test_and_drops_always() {
        assert_eq!(Condition::and(vec![Condition::Always, Condition::Always]), Condition::Always);
        assert_eq!(Condition::and(vec![Condition::Always, leaf("a")]), leaf("a"));
    }

    #[test]
    fn test_and_flattens() {
        let nested = Condition::and(vec![leaf("a"), leaf("b")]);
        let combined = Condition::and(vec![nested, leaf("c")]);
        assert_eq!(combined, Condition::And(vec![leaf("a"), leaf("b"), leaf("c")]));
    }

    #[test]
    fn test_or_never_empty() {
        assert_eq!(Condition::or(Vec::new()), None);
        assert_eq!(Condition::or(vec![leaf("a")]), Some(leaf("a")));
        assert_eq!(Condition::or(vec![leaf("a"), Condition::Always]), Some(Condition::Always));
    }
}
