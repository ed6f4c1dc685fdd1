//! Borrow items (lending history) repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowItem, CreateBorrowItem},
    query::{relation, PaginationSpec, QueryBag, QueryMapper},
};

use super::{count_spec, fetch_spec, schema::BORROW_ITEM};

#[derive(Clone)]
pub struct BorrowItemsRepository {
    pool: Pool<Postgres>,
}

impl BorrowItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, query: &QueryBag) -> AppResult<Vec<BorrowItem>> {
        fetch_spec(&self.pool, &BORROW_ITEM, &QueryMapper::find_all(query)).await
    }

    pub async fn find_many_with_pagination(
        &self,
        query: &QueryBag,
        page: PaginationSpec,
    ) -> AppResult<Vec<BorrowItem>> {
        fetch_spec(&self.pool, &BORROW_ITEM, &QueryMapper::find_many_with_pagination(query, page)).await
    }

    pub async fn count(&self, query: &QueryBag) -> AppResult<i64> {
        count_spec(&self.pool, &BORROW_ITEM, &QueryMapper::count(query)).await
    }

    /// Keyword search over due and return dates, AND-ed with filters
    pub async fn find_many_with_pagination_and_keyword(
        &self,
        query: &QueryBag,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<BorrowItem>> {
        let fields = relation::borrow_item_dates();
        let spec = QueryMapper::find_many_with_pagination_and_keyword(query, keyword, fields.direct_fields(), page);
        fetch_spec(&self.pool, &BORROW_ITEM, &spec).await
    }

    pub async fn count_with_keyword(&self, query: &QueryBag, keyword: &str) -> AppResult<i64> {
        let fields = relation::borrow_item_dates();
        let spec = QueryMapper::count_with_keyword(query, keyword, fields.direct_fields());
        count_spec(&self.pool, &BORROW_ITEM, &spec).await
    }

    pub async fn create(&self, item: &CreateBorrowItem) -> AppResult<BorrowItem> {
        let created = sqlx::query_as::<_, BorrowItem>(
            r#"
            INSERT INTO borrow_items (transaction_id, book_id, due_date, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(item.transaction_id)
        .bind(item.book_id)
        .bind(item.due_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Stamp the return date on a borrowed item
    pub async fn mark_returned(&self, id: i32) -> AppResult<BorrowItem> {
        sqlx::query_as::<_, BorrowItem>(
            "UPDATE borrow_items SET returned_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow item with id {} not found", id)))
    }
}
