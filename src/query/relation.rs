//! Declarative description of which fields take part in a keyword search

use indexmap::IndexMap;

use super::condition::Cardinality;

/// One relation hop in a search descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct RelationHop {
    pub cardinality: Cardinality,
    pub descriptor: RelationSearchDescriptor,
}

/// Tree of searchable fields, rooted at the entity being queried.
///
/// `direct_fields` are matched on the current record; each entry of
/// `relations` moves one hop away and is searched with its own descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationSearchDescriptor {
    direct_fields: Vec<String>,
    relations: IndexMap<String, RelationHop>,
}

impl RelationSearchDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().fold(Self::new(), |d, f| d.field(f))
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.direct_fields.contains(&name) {
            self.direct_fields.push(name);
        }
        self
    }

    /// Adds a single-record relation
    pub fn one(self, name: impl Into<String>, descriptor: RelationSearchDescriptor) -> Self {
        self.relation(name, Cardinality::One, descriptor)
    }

    /// Adds a collection relation, searched with "some element matches"
    pub fn many(self, name: impl Into<String>, descriptor: RelationSearchDescriptor) -> Self {
        self.relation(name, Cardinality::Many, descriptor)
    }

    pub fn relation(
        mut self,
        name: impl Into<String>,
        cardinality: Cardinality,
        descriptor: RelationSearchDescriptor,
    ) -> Self {
        self.relations.insert(name.into(), RelationHop { cardinality, descriptor });
        self
    }

    pub fn direct_fields(&self) -> &[String] {
        &self.direct_fields
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &RelationHop)> {
        self.relations.iter().map(|(name, hop)| (name.as_str(), hop))
    }

    /// Number of relation hops on the longest path
    pub fn depth(&self) -> usize {
        self.relations
            .values()
            .map(|hop| 1 + hop.descriptor.depth())
            .max()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Presets for the library schema
// ---------------------------------------------------------------------------

/// Book title and category only
pub fn book_title_category() -> RelationSearchDescriptor {
    RelationSearchDescriptor::fields(["title", "category"])
}

fn person_names() -> RelationSearchDescriptor {
    RelationSearchDescriptor::fields(["firstName", "lastName"])
}

/// Book fields, author names and the date of any transaction the book was
/// borrowed in
pub fn book_with_relations() -> RelationSearchDescriptor {
    book_title_category()
        .one("author", person_names())
        .many(
            "borrowItems",
            RelationSearchDescriptor::new().one("transaction", RelationSearchDescriptor::fields(["createdAt"])),
        )
}

/// Book fields, author names and the names of anyone who ever borrowed the
/// book (book -> borrowItems -> transaction -> member)
pub fn book_with_borrowers() -> RelationSearchDescriptor {
    book_title_category().one("author", person_names()).many(
        "borrowItems",
        RelationSearchDescriptor::new().one(
            "transaction",
            RelationSearchDescriptor::new().one("member", person_names()),
        ),
    )
}

pub fn borrow_item_dates() -> RelationSearchDescriptor {
    RelationSearchDescriptor::fields(["dueDate", "returnedAt"])
}

pub fn member_identity() -> RelationSearchDescriptor {
    RelationSearchDescriptor::fields(["memberCode", "firstName", "lastName", "phone"])
}

pub fn author_names() -> RelationSearchDescriptor {
    RelationSearchDescriptor::fields(["firstName", "lastName", "affiliation"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_dedup() {
        let d = RelationSearchDescriptor::fields(["title", "title", "category"]);
        assert_eq!(d.direct_fields(), &["title".to_string(), "category".to_string()]);
    }

    #[test]
    fn test_depth() {
        assert_eq!(book_title_category().depth(), 0);
        assert_eq!(book_with_relations().depth(), 2);
        assert_eq!(book_with_borrowers().depth(), 3);
    }

    #[test]
    fn test_borrowers_path_cardinality() {
        let d = book_with_borrowers();
        let hops: Vec<(&str, Cardinality)> = d.relations().map(|(n, h)| (n, h.cardinality)).collect();
        assert_eq!(hops, vec![("author", Cardinality::One), ("borrowItems", Cardinality::Many)]);
    }
}
