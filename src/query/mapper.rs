//! Query mapper facade.
//!
//! Composes the filter, keyword and pagination builders into the complete
//! `QuerySpec` a repository executes. Fetch and count entry points share
//! their builders so that, for the same inputs, `count` equals the number of
//! records the fetch would return without a page limit.

use serde::Serialize;

use super::{
    condition::Condition,
    filter::{FieldFilterBuilder, FilterSpec, QueryBag},
    keyword::{searched_paths, KeywordSearchBuilder},
    pagination::PaginationSpec,
    relation::{self, RelationSearchDescriptor},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// Relation to load alongside the root records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeSpec {
    pub relation: String,
    pub nested: Vec<IncludeSpec>,
    pub order_by: Vec<OrderBy>,
}

impl IncludeSpec {
    pub fn relation(name: impl Into<String>) -> Self {
        Self {
            relation: name.into(),
            nested: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn with(mut self, nested: IncludeSpec) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn ordered_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }
}

/// Everything one request asks of the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub filter: FilterSpec,
    pub keyword: Option<Condition>,
    pub pagination: Option<PaginationSpec>,
    pub include: Vec<IncludeSpec>,
    pub order_by: Vec<OrderBy>,
}

impl QuerySpec {
    fn filtered(filter: FilterSpec) -> Self {
        Self {
            filter,
            keyword: None,
            pagination: None,
            include: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Declared filters AND the keyword condition
    pub fn where_condition(&self) -> Condition {
        let keyword = self.keyword.clone().unwrap_or(Condition::Always);
        Condition::and([self.filter.to_condition(), keyword])
    }

    /// The spec the paired count query must run: same WHERE, no page,
    /// no includes, no ordering.
    pub fn count_spec(&self) -> QuerySpec {
        QuerySpec {
            filter: self.filter.clone(),
            keyword: self.keyword.clone(),
            pagination: None,
            include: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn includes(&self, path: &[&str]) -> bool {
        fn walk(level: &[IncludeSpec], path: &[&str]) -> bool {
            match path.split_first() {
                None => true,
                Some((head, rest)) => level
                    .iter()
                    .any(|inc| inc.relation == *head && walk(&inc.nested, rest)),
            }
        }
        walk(&self.include, path)
    }

    pub fn with_include(mut self, include: IncludeSpec) -> Self {
        self.include.push(include);
        self
    }

    pub fn ordered_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }
}

pub struct QueryMapper;

impl QueryMapper {
    pub fn find_all(bag: &QueryBag) -> QuerySpec {
        QuerySpec::filtered(FieldFilterBuilder::build(bag))
    }

    pub fn find_many_with_pagination(bag: &QueryBag, page: PaginationSpec) -> QuerySpec {
        QuerySpec {
            pagination: Some(page),
            ..Self::find_all(bag)
        }
    }

    /// Filters AND an OR-search of `keyword` over `fields`, paginated
    pub fn find_many_with_pagination_and_keyword<S: AsRef<str>>(
        bag: &QueryBag,
        keyword: &str,
        fields: &[S],
        page: PaginationSpec,
    ) -> QuerySpec {
        QuerySpec {
            pagination: Some(page),
            ..Self::count_with_keyword(bag, keyword, fields)
        }
    }

    pub fn count(bag: &QueryBag) -> QuerySpec {
        Self::find_all(bag)
    }

    pub fn count_with_keyword<S: AsRef<str>>(bag: &QueryBag, keyword: &str, fields: &[S]) -> QuerySpec {
        QuerySpec {
            keyword: Some(KeywordSearchBuilder::build_direct(keyword, fields)),
            ..Self::find_all(bag)
        }
    }

    /// Keyword-only search through `descriptor`, paginated and loading
    /// `include`
    pub fn find_many_with_keyword_and_relations(
        keyword: &str,
        descriptor: &RelationSearchDescriptor,
        include: Vec<IncludeSpec>,
        page: PaginationSpec,
    ) -> QuerySpec {
        QuerySpec {
            pagination: Some(page),
            include,
            ..Self::count_with_keyword_and_relations(keyword, descriptor)
        }
    }

    pub fn count_with_keyword_and_relations(keyword: &str, descriptor: &RelationSearchDescriptor) -> QuerySpec {
        QuerySpec {
            keyword: Some(Self::keyword_where_with_relations(keyword, descriptor)),
            ..QuerySpec::filtered(FilterSpec::default())
        }
    }

    pub fn keyword_where_with_relations(keyword: &str, descriptor: &RelationSearchDescriptor) -> Condition {
        tracing::debug!(
            keyword,
            paths = searched_paths(descriptor).len(),
            depth = descriptor.depth(),
            "Building keyword search"
        );
        KeywordSearchBuilder::build(keyword, descriptor)
    }

    // -------------------------------------------------------------------------
    // Book presets
    // -------------------------------------------------------------------------

    /// Book search over title, category, author names and borrower names,
    /// newest first, with author and borrower details loaded
    pub fn book_search(keyword: &str, page: PaginationSpec) -> QuerySpec {
        let include = vec![
            IncludeSpec::relation("author"),
            IncludeSpec::relation("borrowItems")
                .with(IncludeSpec::relation("transaction").with(IncludeSpec::relation("member")))
                .ordered_by(OrderBy::desc("createdAt")),
        ];
        Self::find_many_with_keyword_and_relations(keyword, &relation::book_with_borrowers(), include, page)
            .ordered_by(OrderBy::desc("createdAt"))
    }

    pub fn book_search_count(keyword: &str) -> QuerySpec {
        Self::count_with_keyword_and_relations(keyword, &relation::book_with_borrowers())
    }

    /// Book search over title, category, author names and borrow
    /// transaction dates
    pub fn book_relation_search(keyword: &str, page: PaginationSpec) -> QuerySpec {
        let include = vec![
            IncludeSpec::relation("author"),
            IncludeSpec::relation("borrowItems").with(IncludeSpec::relation("transaction")),
        ];
        Self::find_many_with_keyword_and_relations(keyword, &relation::book_with_relations(), include, page)
    }

    pub fn book_relation_search_count(keyword: &str) -> QuerySpec {
        Self::count_with_keyword_and_relations(keyword, &relation::book_with_relations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::condition::FieldCondition;

    fn bag() -> QueryBag {
        QueryBag::from_pairs([("category", "Fantasy"), ("page", "2"), ("keyword", "harry")])
    }

    #[test]
    fn test_find_all_has_no_keyword_or_page() {
        let spec = QueryMapper::find_all(&bag());
        assert!(spec.keyword.is_none());
        assert!(spec.pagination.is_none());
        assert_eq!(spec.where_condition(), Condition::Field(FieldCondition::equals("category", "Fantasy")));
    }

    #[test]
    fn test_paginated() {
        let spec = QueryMapper::find_many_with_pagination(&bag(), PaginationSpec::new(2, 10));
        let page = spec.pagination.expect("pagination");
        assert_eq!((page.skip(), page.take()), (10, 10));
    }

    #[test]
    fn test_keyword_and_filters_are_anded() {
        let spec = QueryMapper::find_many_with_pagination_and_keyword(
            &bag(),
            "harry",
            &["title", "category"],
            PaginationSpec::new(1, 10),
        );
        let Condition::And(parts) = spec.where_condition() else {
            panic!("expected a conjunction");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], Condition::Field(FieldCondition::equals("category", "Fantasy")));
        assert!(matches!(parts[1], Condition::Or(_)));
    }

    #[test]
    fn test_empty_keyword_equals_plain_filter() {
        let with_kw = QueryMapper::count_with_keyword(&bag(), "", &["title"]);
        let plain = QueryMapper::count(&bag());
        assert_eq!(with_kw.where_condition(), plain.where_condition());
    }

    #[test]
    fn test_count_variants_match_fetch_where() {
        let page = PaginationSpec::new(3, 5);
        let fetch = QueryMapper::find_many_with_pagination_and_keyword(&bag(), "x", &["title"], page);
        let count = QueryMapper::count_with_keyword(&bag(), "x", &["title"]);
        assert_eq!(fetch.count_spec(), count);

        let d = relation::book_with_relations();
        let fetch = QueryMapper::find_many_with_keyword_and_relations("x", &d, vec![], page);
        let count = QueryMapper::count_with_keyword_and_relations("x", &d);
        assert_eq!(fetch.count_spec(), count);

        assert_eq!(QueryMapper::book_search("x", page).count_spec(), QueryMapper::book_search_count("x"));
    }

    #[test]
    fn test_relation_search_ignores_filters() {
        let spec = QueryMapper::count_with_keyword_and_relations("", &relation::book_with_relations());
        assert!(spec.filter.is_empty());
        assert_eq!(spec.where_condition(), Condition::Always);
    }

    #[test]
    fn test_book_search_includes() {
        let spec = QueryMapper::book_search("", PaginationSpec::new(1, 10));
        assert!(spec.includes(&["author"]));
        assert!(spec.includes(&["borrowItems", "transaction", "member"]));
        assert!(!spec.includes(&["borrowItems", "book"]));
        assert_eq!(spec.order_by, vec![OrderBy::desc("createdAt")]);

        let spec = QueryMapper::book_relation_search("", PaginationSpec::new(1, 10));
        assert!(spec.includes(&["borrowItems", "transaction"]));
        assert!(!spec.includes(&["borrowItems", "transaction", "member"]));
    }
}
