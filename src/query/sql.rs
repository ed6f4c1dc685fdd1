//! Rendering of query specs into parameterised Postgres statements.
//!
//! Field and relation names are resolved through an `EntitySchema` before
//! anything is written, so identifiers in the generated SQL always come from
//! the schema and every user-supplied value is a bind parameter.

use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;

use super::{
    condition::{Cardinality, Condition, FieldCondition, FieldValue, Operator},
    mapper::{OrderBy, QuerySpec},
};

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown field '{field}' on {entity}")]
    UnknownField { entity: String, field: String },

    #[error("Unknown relation '{relation}' on {entity}")]
    UnknownRelation { entity: String, relation: String },

    #[error("Relation '{relation}' on {entity} is not {expected:?}")]
    CardinalityMismatch {
        entity: String,
        relation: String,
        expected: Cardinality,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Timestamp,
}

impl FieldKind {
    fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Integer => "INTEGER",
            FieldKind::Text => "TEXT",
            FieldKind::Timestamp => "TIMESTAMPTZ",
        }
    }
}

#[derive(Debug)]
pub struct FieldSchema {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

/// How a relation is joined: `BelongsTo` holds the foreign key on the
/// current table, `HasMany` on the target table.
#[derive(Debug, Clone, Copy)]
pub enum RelationLink {
    BelongsTo { foreign_key: &'static str },
    HasMany { foreign_key: &'static str },
}

#[derive(Debug)]
pub struct RelationSchema {
    pub name: &'static str,
    pub target: &'static str,
    pub link: RelationLink,
}

impl RelationSchema {
    pub fn cardinality(&self) -> Cardinality {
        match self.link {
            RelationLink::BelongsTo { .. } => Cardinality::One,
            RelationLink::HasMany { .. } => Cardinality::Many,
        }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    pub table: &'static str,
    pub primary_key: &'static str,
    pub fields: &'static [FieldSchema],
    pub relations: &'static [RelationSchema],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Result<&FieldSchema, QueryError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| QueryError::UnknownField {
                entity: self.name.to_string(),
                field: name.to_string(),
            })
    }

    pub fn relation(&self, name: &str) -> Result<&RelationSchema, QueryError> {
        self.relations
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| QueryError::UnknownRelation {
                entity: self.name.to_string(),
                relation: name.to_string(),
            })
    }
}

/// The set of entities relations may point to
#[derive(Debug, Clone, Copy)]
pub struct SchemaCatalog {
    entities: &'static [&'static EntitySchema],
}

impl SchemaCatalog {
    pub const fn new(entities: &'static [&'static EntitySchema]) -> Self {
        Self { entities }
    }

    pub fn entity(&self, name: &str) -> Result<&'static EntitySchema, QueryError> {
        self.entities
            .iter()
            .copied()
            .find(|e| e.name == name)
            .ok_or_else(|| QueryError::UnknownEntity(name.to_string()))
    }

    /// `SELECT root.*` statement honouring filters, ordering and pagination.
    /// The primary key is always the last sort key so pages are stable.
    pub fn render_select(
        &self,
        root: &EntitySchema,
        spec: &QuerySpec,
    ) -> Result<QueryBuilder<'static, Postgres>, QueryError> {
        let mut b = QueryBuilder::new(format!("SELECT t0.* FROM {} t0 WHERE ", root.table));
        self.push_condition(&mut b, root, 0, &spec.where_condition())?;

        b.push(" ORDER BY ");
        b.push(order_clause(root, &spec.order_by, "t0")?);

        if let Some(page) = spec.pagination {
            b.push(" LIMIT ");
            b.push_bind(page.take());
            b.push(" OFFSET ");
            b.push_bind(page.skip());
        }
        Ok(b)
    }

    /// `SELECT COUNT(*)` over the same WHERE as `render_select`
    pub fn render_count(
        &self,
        root: &EntitySchema,
        spec: &QuerySpec,
    ) -> Result<QueryBuilder<'static, Postgres>, QueryError> {
        let mut b = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} t0 WHERE ", root.table));
        self.push_condition(&mut b, root, 0, &spec.where_condition())?;
        Ok(b)
    }

    fn push_condition(
        &self,
        b: &mut QueryBuilder<'static, Postgres>,
        entity: &EntitySchema,
        depth: usize,
        condition: &Condition,
    ) -> Result<(), QueryError> {
        match condition {
            Condition::Always => {
                b.push("TRUE");
            }
            Condition::Field(leaf) => push_leaf(b, entity, depth, leaf)?,
            Condition::And(parts) => self.push_junction(b, entity, depth, parts, " AND ", "TRUE")?,
            Condition::Or(parts) => self.push_junction(b, entity, depth, parts, " OR ", "FALSE")?,
            Condition::Relation {
                name,
                cardinality,
                condition,
            } => {
                let relation = entity.relation(name)?;
                if relation.cardinality() != *cardinality {
                    return Err(QueryError::CardinalityMismatch {
                        entity: entity.name.to_string(),
                        relation: name.clone(),
                        expected: *cardinality,
                    });
                }
                let target = self.entity(relation.target)?;
                let (outer, inner) = (depth, depth + 1);
                let join = match relation.link {
                    RelationLink::BelongsTo { foreign_key } => format!(
                        "t{inner}.{} = t{outer}.{foreign_key}",
                        target.primary_key
                    ),
                    RelationLink::HasMany { foreign_key } => format!(
                        "t{inner}.{foreign_key} = t{outer}.{}",
                        entity.primary_key
                    ),
                };
                b.push(format!(
                    "EXISTS (SELECT 1 FROM {} t{inner} WHERE {join} AND ",
                    target.table
                ));
                self.push_condition(b, target, inner, condition)?;
                b.push(")");
            }
        }
        Ok(())
    }

    fn push_junction(
        &self,
        b: &mut QueryBuilder<'static, Postgres>,
        entity: &EntitySchema,
        depth: usize,
        parts: &[Condition],
        separator: &str,
        identity: &str,
    ) -> Result<(), QueryError> {
        if parts.is_empty() {
            b.push(identity);
            return Ok(());
        }
        b.push("(");
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                b.push(separator);
            }
            self.push_condition(b, entity, depth, part)?;
        }
        b.push(")");
        Ok(())
    }
}

/// ORDER BY list for `entity` under `alias`, primary key last
pub fn order_clause(entity: &EntitySchema, orders: &[OrderBy], alias: &str) -> Result<String, QueryError> {
    let mut keys = Vec::with_capacity(orders.len() + 1);
    for order in orders {
        let field = entity.field(&order.field)?;
        keys.push(format!("{alias}.{} {}", field.column, order.direction.as_sql()));
    }
    keys.push(format!("{alias}.{} ASC", entity.primary_key));
    Ok(keys.join(", "))
}

fn push_leaf(
    b: &mut QueryBuilder<'static, Postgres>,
    entity: &EntitySchema,
    depth: usize,
    leaf: &FieldCondition,
) -> Result<(), QueryError> {
    let field = entity.field(&leaf.field)?;
    let column = format!("t{depth}.{}", field.column);

    match &leaf.operator {
        Operator::Equals(FieldValue::Null) => {
            b.push(format!("{column} IS NULL"));
        }
        Operator::Equals(FieldValue::Text(s)) if field.kind == FieldKind::Text => {
            b.push(format!("{column} = "));
            b.push_bind(s.clone());
        }
        Operator::Equals(FieldValue::Text(s)) => {
            b.push(format!("{column} = CAST("));
            b.push_bind(s.clone());
            b.push(format!(" AS {})", field.kind.sql_type()));
        }
        Operator::Equals(FieldValue::Integer(i)) => {
            b.push(format!("{column} = "));
            b.push_bind(*i);
        }
        Operator::Equals(FieldValue::Boolean(v)) => {
            b.push(format!("{column} = "));
            b.push_bind(*v);
        }
        Operator::Equals(FieldValue::Date(d)) if field.kind == FieldKind::Timestamp => {
            b.push(format!("CAST({column} AS DATE) = "));
            b.push_bind(*d);
        }
        Operator::Equals(FieldValue::Date(d)) => {
            b.push(format!("{column} = "));
            b.push_bind(*d);
        }
        Operator::Equals(FieldValue::Timestamp(t)) => {
            b.push(format!("{column} = "));
            b.push_bind(*t);
        }
        Operator::Contains {
            value,
            case_insensitive,
        } => {
            let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
            match field.kind {
                FieldKind::Text => b.push(format!("{column} {op} ")),
                // Same text as the JSON output, independent of the session time zone
                FieldKind::Timestamp => b.push(format!(
                    "to_char({column} AT TIME ZONE 'UTC', '{}') {op} ",
                    TIMESTAMP_TEXT_FORMAT
                )),
                FieldKind::Integer => b.push(format!("CAST({column} AS TEXT) {op} ")),
            };
            b.push_bind(format!("%{}%", escape_like(value)));
        }
    }
    Ok(())
}

/// `to_char` pattern giving timestamps their RFC 3339 UTC form, to the second
const TIMESTAMP_TEXT_FORMAT: &str = r#"YYYY-MM-DD"T"HH24:MI:SS"Z""#;

/// Escape LIKE wildcards so the keyword matches literally
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        filter::QueryBag,
        mapper::QueryMapper,
        pagination::PaginationSpec,
        relation::RelationSearchDescriptor,
    };

    static PARENT: EntitySchema = EntitySchema {
        name: "parent",
        table: "parents",
        primary_key: "id",
        fields: &[
            FieldSchema { name: "id", column: "id", kind: FieldKind::Integer },
            FieldSchema { name: "name", column: "name", kind: FieldKind::Text },
            FieldSchema { name: "bornAt", column: "born_at", kind: FieldKind::Timestamp },
        ],
        relations: &[RelationSchema {
            name: "children",
            target: "child",
            link: RelationLink::HasMany { foreign_key: "parent_id" },
        }],
    };

    static CHILD: EntitySchema = EntitySchema {
        name: "child",
        table: "children",
        primary_key: "id",
        fields: &[FieldSchema { name: "nickname", column: "nickname", kind: FieldKind::Text }],
        relations: &[RelationSchema {
            name: "parent",
            target: "parent",
            link: RelationLink::BelongsTo { foreign_key: "parent_id" },
        }],
    };

    static CATALOG: SchemaCatalog = SchemaCatalog::new(&[&PARENT, &CHILD]);

    #[test]
    fn test_order_clause() {
        let orders = [OrderBy::desc("bornAt"), OrderBy::asc("name")];
        assert_eq!(
            order_clause(&PARENT, &orders, "p").expect("order"),
            "p.born_at DESC, p.name ASC, p.id ASC"
        );
        assert!(order_clause(&PARENT, &[OrderBy::asc("nope")], "p").is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_count_without_conditions() {
        let spec = QueryMapper::count(&QueryBag::new());
        let b = CATALOG.render_count(&PARENT, &spec).expect("render");
        assert_eq!(b.sql(), "SELECT COUNT(*) FROM parents t0 WHERE TRUE");
    }

    #[test]
    fn test_select_with_filters_and_page() {
        let bag = QueryBag::from_pairs([("name", "Ann"), ("id", "3")]);
        let spec = QueryMapper::find_many_with_pagination(&bag, PaginationSpec::new(2, 10));
        let b = CATALOG.render_select(&PARENT, &spec).expect("render");
        assert_eq!(
            b.sql(),
            "SELECT t0.* FROM parents t0 WHERE (t0.name = $1 AND t0.id = CAST($2 AS INTEGER)) \
             ORDER BY t0.id ASC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_null_and_contains_on_timestamp() {
        let bag = QueryBag::new().with("bornAt", FieldValue::Null);
        let spec = QueryMapper::count_with_keyword(&bag, "19", &["bornAt"]);
        let b = CATALOG.render_count(&PARENT, &spec).expect("render");
        assert_eq!(
            b.sql(),
            "SELECT COUNT(*) FROM parents t0 WHERE (t0.born_at IS NULL AND \
             to_char(t0.born_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') ILIKE $1)"
        );
    }

    #[test]
    fn test_contains_on_integer_casts_to_text() {
        let spec = QueryMapper::count_with_keyword(&QueryBag::new(), "4", &["id"]);
        let b = CATALOG.render_count(&PARENT, &spec).expect("render");
        assert_eq!(
            b.sql(),
            "SELECT COUNT(*) FROM parents t0 WHERE CAST(t0.id AS TEXT) ILIKE $1"
        );
    }

    #[test]
    fn test_relations_render_as_exists() {
        let d = RelationSearchDescriptor::fields(["name"]).many(
            "children",
            RelationSearchDescriptor::fields(["nickname"])
                .one("parent", RelationSearchDescriptor::fields(["name"])),
        );
        let spec = QueryMapper::count_with_keyword_and_relations("x", &d);
        let b = CATALOG.render_count(&PARENT, &spec).expect("render");
        assert_eq!(
            b.sql(),
            "SELECT COUNT(*) FROM parents t0 WHERE (t0.name ILIKE $1 OR \
             EXISTS (SELECT 1 FROM children t1 WHERE t1.parent_id = t0.id AND \
             (t1.nickname ILIKE $2 OR \
             EXISTS (SELECT 1 FROM parents t2 WHERE t2.id = t1.parent_id AND t2.name ILIKE $3))))"
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let bag = QueryBag::from_pairs([("password", "x")]);
        let err = CATALOG
            .render_count(&PARENT, &QueryMapper::count(&bag))
            .err()
            .expect("unknown field must fail");
        assert_eq!(
            err,
            QueryError::UnknownField {
                entity: "parent".to_string(),
                field: "password".to_string()
            }
        );
    }

    #[test]
    fn test_cardinality_mismatch_rejected() {
        let d = RelationSearchDescriptor::new().one("children", RelationSearchDescriptor::fields(["nickname"]));
        let spec = QueryMapper::count_with_keyword_and_relations("x", &d);
        let err = CATALOG.render_count(&PARENT, &spec).err().expect("mismatch must fail");
        assert!(matches!(err, QueryError::CardinalityMismatch { .. }));
    }
}
