//! Equality filters built from a request's parameter bag

use indexmap::IndexMap;
use serde::Serialize;

use super::condition::{Condition, FieldCondition, FieldValue};

/// Parameters that steer pagination and search, never data filters
pub const CONTROL_KEYS: [&str; 3] = ["page", "limit", "keyword"];

/// Ordered field -> value mapping parsed from a query string.
///
/// Values from the query string are `FieldValue::Text`; handlers may insert
/// typed values (e.g. `Null` for "not returned yet"). Inserting a key twice
/// keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBag {
    values: IndexMap<String, FieldValue>,
}

impl QueryBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut bag = Self::new();
        for (k, v) in pairs {
            bag.values.insert(k.into(), FieldValue::Text(v.into()));
        }
        bag
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Raw text of a parameter, `None` when absent or not textual
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<&str> {
        self.text("page")
    }

    pub fn limit(&self) -> Option<&str> {
        self.text("limit")
    }

    /// The keyword parameter; absent is reported as the empty string
    pub fn keyword(&self) -> &str {
        self.text("keyword").unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// AND-combination of equality conditions with unique field names
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    conditions: Vec<FieldCondition>,
}

impl FilterSpec {
    pub fn conditions(&self) -> &[FieldCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.field.as_str())
    }

    pub fn to_condition(&self) -> Condition {
        Condition::and(self.conditions.iter().cloned().map(Condition::Field))
    }
}

/// Turns a parameter bag into a `FilterSpec`.
///
/// Control keys are stripped; every other key is forwarded as an equality
/// condition without coercion or allow-listing. Unknown names are only
/// rejected later, when the `QuerySpec` is rendered against a table schema.
pub struct FieldFilterBuilder;

impl FieldFilterBuilder {
    pub fn build(bag: &QueryBag) -> FilterSpec {
        let conditions = bag
            .iter()
            .filter(|(field, _)| !CONTROL_KEYS.contains(&field.as_str()))
            .map(|(field, value)| FieldCondition::equals(field.clone(), value.clone()))
            .collect();
        FilterSpec { conditions }
    }
}
