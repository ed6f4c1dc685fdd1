//! Query-mapping scenarios against in-memory catalog records

use libris_server::query::{
    relation, Condition, KeywordSearchBuilder, PaginationSpec, QueryBag, QueryMapper,
};
use serde_json::{json, Value};

fn borrow_item(id: i64, created_at: &str, member: (&str, &str)) -> Value {
    json!({
        "id": id,
        "dueDate": "2026-01-15T00:00:00Z",
        "returnedAt": null,
        "createdAt": created_at,
        "transaction": {
            "id": id,
            "createdAt": created_at,
            "member": { "firstName": member.0, "lastName": member.1 }
        }
    })
}

fn catalog() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "1984",
            "category": "Dystopian",
            "createdAt": "2025-01-01T10:00:00Z",
            "author": { "firstName": "George", "lastName": "Orwell" },
            "borrowItems": [borrow_item(1, "2025-03-01T09:00:00Z", ("Jane", "Smith"))]
        }),
        json!({
            "id": 2,
            "title": "Harry Potter",
            "category": "Fantasy",
            "createdAt": "2025-02-01T10:00:00Z",
            "author": { "firstName": "J.K.", "lastName": "Rowling" },
            "borrowItems": [borrow_item(2, "2025-04-01T09:00:00Z", ("John", "Doe"))]
        }),
    ]
}

fn titles(records: &[&Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_keyword_scenario() {
    let books = catalog();
    let page = PaginationSpec::new(1, 10);

    let search = |keyword: &str| titles(&QueryMapper::book_search(keyword, page).fetch_from(&books));

    assert_eq!(search("dystopian"), vec!["1984"]);
    assert_eq!(search("rowling"), vec!["Harry Potter"]);
    // through the author relation only
    assert_eq!(search("orwell"), vec!["1984"]);
    // newest first
    assert_eq!(search(""), vec!["Harry Potter", "1984"]);
}

#[test]
fn test_empty_keyword_matches_everything() {
    let books = catalog();
    let bag = QueryBag::new();

    let with_empty = QueryMapper::find_all(&bag);
    let with_keyword = QueryMapper::count_with_keyword(&bag, "", &["title", "category"]);

    assert_eq!(with_keyword.count_in(&books), books.len());
    assert_eq!(with_keyword.count_in(&books), with_empty.count_in(&books));
    assert_eq!(KeywordSearchBuilder::build("", &relation::book_with_borrowers()), Condition::Always);
}

#[test]
fn test_count_matches_full_fetch() {
    let books = catalog();
    let bag = QueryBag::from_pairs([("category", "Fantasy"), ("keyword", "potter")]);

    for keyword in ["", "a", "potter", "zzz"] {
        let total = QueryMapper::count_with_keyword(&bag, keyword, &["title", "category"]).count_in(&books);
        let limit = total.max(1) as i64;
        let fetched = QueryMapper::find_many_with_pagination_and_keyword(
            &bag,
            keyword,
            &["title", "category"],
            PaginationSpec::new(1, limit),
        )
        .fetch_from(&books);
        assert_eq!(fetched.len(), total, "keyword {:?}", keyword);
    }

    for keyword in ["", "o", "smith", "george"] {
        let total = QueryMapper::book_search_count(keyword).count_in(&books);
        let fetched = QueryMapper::book_search(keyword, PaginationSpec::new(1, 50)).fetch_from(&books);
        assert_eq!(fetched.len(), total, "keyword {:?}", keyword);
    }
}

#[test]
fn test_borrower_match_survives_unrelated_borrower() {
    let mut books = catalog();
    let page = PaginationSpec::new(1, 10);

    assert_eq!(titles(&QueryMapper::book_search("smith", page).fetch_from(&books)), vec!["1984"]);

    if let Some(Value::Array(items)) = books[0].get_mut("borrowItems") {
        items.push(borrow_item(3, "2025-05-01T09:00:00Z", ("Ann", "Lee")));
    }
    assert_eq!(titles(&QueryMapper::book_search("smith", page).fetch_from(&books)), vec!["1984"]);
}

#[test]
fn test_relation_and_borrower_searches_diverge() {
    let books = catalog();
    let page = PaginationSpec::new(1, 10);

    // borrower names are only reachable through the borrower search
    assert_eq!(titles(&QueryMapper::book_search("jane", page).fetch_from(&books)), vec!["1984"]);
    assert!(QueryMapper::book_relation_search("jane", page).fetch_from(&books).is_empty());

    // transaction dates are only reachable through the relation search
    assert_eq!(
        titles(&QueryMapper::book_relation_search("2025-04", page).fetch_from(&books)),
        vec!["Harry Potter"]
    );
    assert!(QueryMapper::book_search("2025-04", page).fetch_from(&books).is_empty());

    // both agree on direct and author fields
    for keyword in ["fantasy", "orwell", "1984"] {
        assert_eq!(
            QueryMapper::book_search_count(keyword).count_in(&books),
            QueryMapper::book_relation_search_count(keyword).count_in(&books)
        );
    }
}

#[test]
fn test_second_page() {
    let books = catalog();
    let fetched = QueryMapper::book_search("", PaginationSpec::new(2, 1)).fetch_from(&books);
    assert_eq!(titles(&fetched), vec!["1984"]);
}
