//! Books repository for database operations

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorSummary,
        book::{Book, BookDetails, CreateBook},
        borrow::{BorrowItem, BorrowItemDetails, BorrowTransaction, TransactionDetails},
        member::MemberSummary,
    },
    query::{sql::order_clause, PaginationSpec, QueryBag, QueryMapper, QuerySpec},
};

use super::{
    count_spec, fetch_spec,
    schema::{BOOK, BORROW_ITEM},
};

/// Fields the simple keyword search looks at
const KEYWORD_FIELDS: [&str; 2] = ["title", "category"];

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn find_all(&self, query: &QueryBag) -> AppResult<Vec<Book>> {
        fetch_spec(&self.pool, &BOOK, &QueryMapper::find_all(query)).await
    }

    pub async fn find_many_with_pagination(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Vec<Book>> {
        fetch_spec(&self.pool, &BOOK, &QueryMapper::find_many_with_pagination(query, page)).await
    }

    pub async fn find_many_with_pagination_and_keyword(
        &self,
        query: &QueryBag,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<Book>> {
        let spec = QueryMapper::find_many_with_pagination_and_keyword(query, keyword, &KEYWORD_FIELDS, page);
        fetch_spec(&self.pool, &BOOK, &spec).await
    }

    pub async fn count(&self, query: &QueryBag) -> AppResult<i64> {
        count_spec(&self.pool, &BOOK, &QueryMapper::count(query)).await
    }

    pub async fn count_with_keyword(&self, query: &QueryBag, keyword: &str) -> AppResult<i64> {
        let spec = QueryMapper::count_with_keyword(query, keyword, &KEYWORD_FIELDS);
        count_spec(&self.pool, &BOOK, &spec).await
    }

    /// Keyword search over book fields, author names and transaction dates
    pub async fn find_many_with_keyword_and_relations(
        &self,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<BookDetails>> {
        let spec = QueryMapper::book_relation_search(keyword, page);
        let books = fetch_spec::<Book>(&self.pool, &BOOK, &spec).await?;
        self.load_relations(books, &spec).await
    }

    pub async fn count_with_keyword_and_relations(&self, keyword: &str) -> AppResult<i64> {
        count_spec(&self.pool, &BOOK, &QueryMapper::book_relation_search_count(keyword)).await
    }

    /// Keyword search over book fields, author names and borrower names,
    /// newest books first
    pub async fn search_with_keyword_and_pagination(
        &self,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<BookDetails>> {
        let spec = QueryMapper::book_search(keyword, page);
        let books = fetch_spec::<Book>(&self.pool, &BOOK, &spec).await?;
        self.load_relations(books, &spec).await
    }

    pub async fn count_with_keyword_search(&self, keyword: &str) -> AppResult<i64> {
        count_spec(&self.pool, &BOOK, &QueryMapper::book_search_count(keyword)).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    // =========================================================================
    // RELATIONS
    // =========================================================================

    /// Attach the relations `spec` asks to include
    async fn load_relations(&self, books: Vec<Book>, spec: &QuerySpec) -> AppResult<Vec<BookDetails>> {
        let mut details: Vec<BookDetails> = books.into_iter().map(BookDetails::from).collect();
        if details.is_empty() {
            return Ok(details);
        }

        if spec.includes(&["author"]) {
            let author_ids: Vec<i32> = details.iter().map(|b| b.author_id).collect();
            let authors: HashMap<i32, AuthorSummary> = sqlx::query_as::<_, AuthorSummary>(
                "SELECT id, first_name, last_name, affiliation FROM authors WHERE id = ANY($1)",
            )
            .bind(&author_ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

            for book in &mut details {
                book.author = authors.get(&book.author_id).cloned();
            }
        }

        if spec.includes(&["borrowItems"]) {
            let book_ids: Vec<i32> = details.iter().map(|b| b.id).collect();
            let mut by_book = self.load_borrow_items(&book_ids, spec).await?;
            for book in &mut details {
                book.borrow_items = by_book.remove(&book.id).unwrap_or_default();
            }
        }

        Ok(details)
    }

    async fn load_borrow_items(
        &self,
        book_ids: &[i32],
        spec: &QuerySpec,
    ) -> AppResult<HashMap<i32, Vec<BorrowItemDetails>>> {
        let orders = spec
            .include
            .iter()
            .find(|inc| inc.relation == "borrowItems")
            .map(|inc| inc.order_by.clone())
            .unwrap_or_default();
        let order = order_clause(&BORROW_ITEM, &orders, "bi")?;

        let items = sqlx::query_as::<_, BorrowItem>(&format!(
            "SELECT bi.* FROM borrow_items bi WHERE bi.book_id = ANY($1) ORDER BY {}",
            order
        ))
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut transactions: HashMap<i32, TransactionDetails> = HashMap::new();
        if spec.includes(&["borrowItems", "transaction"]) && !items.is_empty() {
            let ids: Vec<i32> = items.iter().map(|i| i.transaction_id).collect();
            transactions = sqlx::query_as::<_, BorrowTransaction>(
                "SELECT * FROM borrow_transactions WHERE id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|t| (t.id, TransactionDetails::from(t)))
            .collect();

            if spec.includes(&["borrowItems", "transaction", "member"]) && !transactions.is_empty() {
                let member_ids: Vec<i32> = transactions.values().map(|t| t.member_id).collect();
                let members: HashMap<i32, MemberSummary> = sqlx::query_as::<_, MemberSummary>(
                    "SELECT id, member_code, first_name, last_name FROM members WHERE id = ANY($1)",
                )
                .bind(&member_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect();

                for transaction in transactions.values_mut() {
                    transaction.member = members.get(&transaction.member_id).cloned();
                }
            }
        }

        let mut by_book: HashMap<i32, Vec<BorrowItemDetails>> = HashMap::new();
        for item in items {
            let book_id = item.book_id;
            let mut detail = BorrowItemDetails::from(item);
            detail.transaction = transactions.get(&detail.transaction_id).cloned();
            by_book.entry(book_id).or_default().push(detail);
        }
        Ok(by_book)
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, isbn, category, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(book.author_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
