//! Query-mapping engine.
//!
//! Translates an untyped request parameter bag into a `QuerySpec`: an AND of
//! equality filters, an optional OR-of-substring keyword search that may
//! follow relation hops, and an optional page. Building a spec never touches
//! the database; `sql` renders it for Postgres and `eval` applies it to
//! in-memory records.

pub mod condition;
pub mod eval;
pub mod filter;
pub mod keyword;
pub mod mapper;
pub mod pagination;
pub mod relation;
pub mod sql;

pub use condition::{Cardinality, Condition, FieldCondition, FieldValue, Operator};
pub use filter::{FieldFilterBuilder, FilterSpec, QueryBag};
pub use keyword::KeywordSearchBuilder;
pub use mapper::{IncludeSpec, OrderBy, QueryMapper, QuerySpec, SortDirection};
pub use pagination::{total_pages, PageParams, PaginationSpec};
pub use relation::RelationSearchDescriptor;
pub use sql::{EntitySchema, QueryError, SchemaCatalog};
