//! Borrow transactions repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowItem, BorrowTransaction, CreateTransaction, TransactionWithItems},
};

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a transaction and the items lent in it
    pub async fn get_with_items(&self, id: i32) -> AppResult<TransactionWithItems> {
        let transaction = sqlx::query_as::<_, BorrowTransaction>("SELECT * FROM borrow_transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with id {} not found", id)))?;

        let items = sqlx::query_as::<_, BorrowItem>(
            "SELECT * FROM borrow_items WHERE transaction_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(TransactionWithItems {
            id: transaction.id,
            member_id: transaction.member_id,
            created_at: transaction.created_at,
            items,
        })
    }

    /// Create a transaction and all its items atomically
    pub async fn create(&self, request: &CreateTransaction) -> AppResult<TransactionWithItems> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, BorrowTransaction>(
            "INSERT INTO borrow_transactions (member_id, created_at) VALUES ($1, $2) RETURNING *",
        )
        .bind(request.member_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let created = sqlx::query_as::<_, BorrowItem>(
                r#"
                INSERT INTO borrow_items (transaction_id, book_id, due_date, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(transaction.id)
            .bind(item.book_id)
            .bind(item.due_date)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            items.push(created);
        }

        tx.commit().await?;

        tracing::info!(
            "Created borrow transaction id={} for member id={} with {} item(s)",
            transaction.id,
            transaction.member_id,
            items.len()
        );

        Ok(TransactionWithItems {
            id: transaction.id,
            member_id: transaction.member_id,
            created_at: transaction.created_at,
            items,
        })
    }
}
