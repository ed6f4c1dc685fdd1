//! Keyword search: OR of substring matches over fields and relation paths

use super::{
    condition::{Cardinality, Condition, FieldCondition},
    relation::RelationSearchDescriptor,
};

pub struct KeywordSearchBuilder;

impl KeywordSearchBuilder {
    /// Build the keyword condition for `descriptor`.
    ///
    /// An empty keyword yields `Condition::Always` before any tree is built.
    /// Otherwise every direct field becomes a case-insensitive `contains`
    /// leaf, every relation is searched recursively (wrapped so that a
    /// `Many` hop matches when some element matches), and all of them are
    /// OR-ed at the top level. Relations whose subtree has no fields are
    /// skipped, and a descriptor without any searchable field imposes no
    /// constraint.
    pub fn build(keyword: &str, descriptor: &RelationSearchDescriptor) -> Condition {
        if keyword.is_empty() {
            return Condition::Always;
        }

        match Self::disjunction(keyword, descriptor) {
            Some(condition) => condition,
            None => {
                tracing::debug!("Keyword search over a descriptor without fields, ignoring keyword");
                Condition::Always
            }
        }
    }

    /// Keyword search over direct fields only
    pub fn build_direct<S: AsRef<str>>(keyword: &str, fields: &[S]) -> Condition {
        let descriptor = RelationSearchDescriptor::fields(fields.iter().map(|f| f.as_ref()));
        Self::build(keyword, &descriptor)
    }

    fn disjunction(keyword: &str, descriptor: &RelationSearchDescriptor) -> Option<Condition> {
        let direct = descriptor
            .direct_fields()
            .iter()
            .map(|field| Condition::Field(FieldCondition::contains_insensitive(field.clone(), keyword)));

        let nested = descriptor.relations().filter_map(|(name, hop)| {
            let inner = Self::disjunction(keyword, &hop.descriptor)?;
            Some(Condition::relation(name, hop.cardinality, inner))
        });

        Condition::or(direct.chain(nested).collect::<Vec<_>>())
    }
}

/// Collects every `(path, field)` pair a descriptor searches, in build order.
/// Paths list relation names from the root.
pub fn searched_paths(descriptor: &RelationSearchDescriptor) -> Vec<(Vec<(String, Cardinality)>, String)> {
    fn walk(
        d: &RelationSearchDescriptor,
        prefix: &mut Vec<(String, Cardinality)>,
        out: &mut Vec<(Vec<(String, Cardinality)>, String)>,
    ) {
        for field in d.direct_fields() {
            out.push((prefix.clone(), field.clone()));
        }
        for (name, hop) in d.relations() {
            prefix.push((name.to_string(), hop.cardinality));
            walk(&hop.descriptor, prefix, out);
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(descriptor, &mut Vec::new(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::relation::{book_with_borrowers, book_with_relations};

    fn contains(field: &str, kw: &str) -> Condition {
        FieldCondition::contains_insensitive(field, kw).into()
    }

    #[test]
    fn test_empty_keyword_short_circuits() {
        assert_eq!(KeywordSearchBuilder::build("", &book_with_borrowers()), Condition::Always);
        assert_eq!(KeywordSearchBuilder::build_direct::<&str>("", &[]), Condition::Always);
    }

    #[test]
    fn test_no_fields_is_unconstrained() {
        let empty = RelationSearchDescriptor::new().many("borrowItems", RelationSearchDescriptor::new());
        assert_eq!(KeywordSearchBuilder::build("x", &empty), Condition::Always);
    }

    #[test]
    fn test_direct_fields() {
        let c = KeywordSearchBuilder::build_direct("potter", &["title", "category"]);
        assert_eq!(c, Condition::Or(vec![contains("title", "potter"), contains("category", "potter")]));
    }

    #[test]
    fn test_single_field_is_not_wrapped() {
        let c = KeywordSearchBuilder::build_direct("potter", &["title"]);
        assert_eq!(c, contains("title", "potter"));
    }

    #[test]
    fn test_nested_relations() {
        let c = KeywordSearchBuilder::build("orwell", &book_with_borrowers());
        let names = || Condition::Or(vec![contains("firstName", "orwell"), contains("lastName", "orwell")]);

        let expected = Condition::Or(vec![
            contains("title", "orwell"),
            contains("category", "orwell"),
            Condition::relation("author", Cardinality::One, names()),
            Condition::relation(
                "borrowItems",
                Cardinality::Many,
                Condition::relation(
                    "transaction",
                    Cardinality::One,
                    Condition::relation("member", Cardinality::One, names()),
                ),
            ),
        ]);
        assert_eq!(c, expected);
    }

    #[test]
    fn test_relations_preset_searches_transaction_date() {
        let c = KeywordSearchBuilder::build("2026", &book_with_relations());
        let Condition::Or(parts) = c else {
            panic!("expected a disjunction");
        };
        assert_eq!(
            parts[3],
            Condition::relation(
                "borrowItems",
                Cardinality::Many,
                Condition::relation("transaction", Cardinality::One, contains("createdAt", "2026")),
            )
        );
    }

    #[test]
    fn test_searched_paths() {
        let paths = searched_paths(&book_with_borrowers());
        let rendered: Vec<String> = paths
            .iter()
            .map(|(path, field)| {
                let mut parts: Vec<&str> = path.iter().map(|(n, _)| n.as_str()).collect();
                parts.push(field);
                parts.join(".")
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                "title",
                "category",
                "author.firstName",
                "author.lastName",
                "borrowItems.transaction.member.firstName",
                "borrowItems.transaction.member.lastName",
            ]
        );
    }
}
