//! Table metadata for the library database.
//!
//! Maps the camelCase field and relation names used in query parameters
//! and search descriptors to tables, columns and join keys.

use crate::query::sql::{EntitySchema, FieldKind, FieldSchema, RelationLink, RelationSchema, SchemaCatalog};

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema { name, column, kind }
}

const fn belongs_to(name: &'static str, target: &'static str, foreign_key: &'static str) -> RelationSchema {
    RelationSchema {
        name,
        target,
        link: RelationLink::BelongsTo { foreign_key },
    }
}

const fn has_many(name: &'static str, target: &'static str, foreign_key: &'static str) -> RelationSchema {
    RelationSchema {
        name,
        target,
        link: RelationLink::HasMany { foreign_key },
    }
}

pub static AUTHOR: EntitySchema = EntitySchema {
    name: "author",
    table: "authors",
    primary_key: "id",
    fields: &[
        field("id", "id", FieldKind::Integer),
        field("firstName", "first_name", FieldKind::Text),
        field("lastName", "last_name", FieldKind::Text),
        field("affiliation", "affiliation", FieldKind::Text),
        field("createdAt", "created_at", FieldKind::Timestamp),
    ],
    relations: &[has_many("books", "book", "author_id")],
};

pub static BOOK: EntitySchema = EntitySchema {
    name: "book",
    table: "books",
    primary_key: "id",
    fields: &[
        field("id", "id", FieldKind::Integer),
        field("title", "title", FieldKind::Text),
        field("isbn", "isbn", FieldKind::Text),
        field("category", "category", FieldKind::Text),
        field("authorId", "author_id", FieldKind::Integer),
        field("createdAt", "created_at", FieldKind::Timestamp),
        field("updatedAt", "updated_at", FieldKind::Timestamp),
    ],
    relations: &[
        belongs_to("author", "author", "author_id"),
        has_many("borrowItems", "borrowItem", "book_id"),
    ],
};

pub static MEMBER: EntitySchema = EntitySchema {
    name: "member",
    table: "members",
    primary_key: "id",
    fields: &[
        field("id", "id", FieldKind::Integer),
        field("memberCode", "member_code", FieldKind::Text),
        field("firstName", "first_name", FieldKind::Text),
        field("lastName", "last_name", FieldKind::Text),
        field("phone", "phone", FieldKind::Text),
        field("createdAt", "created_at", FieldKind::Timestamp),
    ],
    relations: &[has_many("transactions", "borrowTransaction", "member_id")],
};

pub static BORROW_TRANSACTION: EntitySchema = EntitySchema {
    name: "borrowTransaction",
    table: "borrow_transactions",
    primary_key: "id",
    fields: &[
        field("id", "id", FieldKind::Integer),
        field("memberId", "member_id", FieldKind::Integer),
        field("createdAt", "created_at", FieldKind::Timestamp),
    ],
    relations: &[
        belongs_to("member", "member", "member_id"),
        has_many("items", "borrowItem", "transaction_id"),
    ],
};

pub static BORROW_ITEM: EntitySchema = EntitySchema {
    name: "borrowItem",
    table: "borrow_items",
    primary_key: "id",
    fields: &[
        field("id", "id", FieldKind::Integer),
        field("transactionId", "transaction_id", FieldKind::Integer),
        field("bookId", "book_id", FieldKind::Integer),
        field("dueDate", "due_date", FieldKind::Timestamp),
        field("returnedAt", "returned_at", FieldKind::Timestamp),
        field("createdAt", "created_at", FieldKind::Timestamp),
    ],
    relations: &[
        belongs_to("transaction", "borrowTransaction", "transaction_id"),
        belongs_to("book", "book", "book_id"),
    ],
};

pub static LIBRARY: SchemaCatalog = SchemaCatalog::new(&[&AUTHOR, &BOOK, &MEMBER, &BORROW_TRANSACTION, &BORROW_ITEM]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{relation, QueryMapper};

    #[test]
    fn test_presets_resolve_against_schema() {
        for preset in [relation::book_with_relations(), relation::book_with_borrowers(), relation::book_title_category()] {
            let spec = QueryMapper::count_with_keyword_and_relations("x", &preset);
            assert!(LIBRARY.render_count(&BOOK, &spec).is_ok());
        }
        let spec = QueryMapper::count_with_keyword_and_relations("x", &relation::member_identity());
        assert!(LIBRARY.render_count(&MEMBER, &spec).is_ok());
        let spec = QueryMapper::count_with_keyword_and_relations("x", &relation::author_names());
        assert!(LIBRARY.render_count(&AUTHOR, &spec).is_ok());
        let spec = QueryMapper::count_with_keyword_and_relations("x", &relation::borrow_item_dates());
        assert!(LIBRARY.render_count(&BORROW_ITEM, &spec).is_ok());
    }

    #[test]
    fn test_borrower_search_sql() {
        let spec = QueryMapper::book_search_count("doe");
        let b = LIBRARY.render_count(&BOOK, &spec).expect("render");
        let sql = b.sql();
        assert!(sql.contains("EXISTS (SELECT 1 FROM borrow_items t1 WHERE t1.book_id = t0.id AND"));
        assert!(sql.contains("EXISTS (SELECT 1 FROM borrow_transactions t2 WHERE t2.id = t1.transaction_id AND"));
        assert!(sql.contains("EXISTS (SELECT 1 FROM members t3 WHERE t3.id = t2.member_id AND"));
    }

    #[test]
    fn test_every_relation_target_exists() {
        for entity in [&AUTHOR, &BOOK, &MEMBER, &BORROW_TRANSACTION, &BORROW_ITEM] {
            for rel in entity.relations {
                assert!(LIBRARY.entity(rel.target).is_ok(), "{}.{}", entity.name, rel.name);
            }
        }
    }
}
