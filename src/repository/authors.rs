//! Authors repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor},
    query::{relation, PaginationSpec, QueryBag, QueryMapper},
};

use super::{count_spec, fetch_spec, schema::AUTHOR};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, query: &QueryBag) -> AppResult<Vec<Author>> {
        fetch_spec(&self.pool, &AUTHOR, &QueryMapper::find_all(query)).await
    }

    /// Keyword search over names and affiliation
    pub async fn find_many_with_pagination_and_keyword(
        &self,
        query: &QueryBag,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<Author>> {
        let fields = relation::author_names();
        let spec = QueryMapper::find_many_with_pagination_and_keyword(query, keyword, fields.direct_fields(), page);
        fetch_spec(&self.pool, &AUTHOR, &spec).await
    }

    pub async fn count_with_keyword(&self, query: &QueryBag, keyword: &str) -> AppResult<i64> {
        let fields = relation::author_names();
        let spec = QueryMapper::count_with_keyword(query, keyword, fields.direct_fields());
        count_spec(&self.pool, &AUTHOR, &spec).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, affiliation, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.affiliation)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
