//! Members repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member},
    query::{relation, PaginationSpec, QueryBag, QueryMapper},
};

use super::{count_spec, fetch_spec, schema::MEMBER};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, query: &QueryBag) -> AppResult<Vec<Member>> {
        fetch_spec(&self.pool, &MEMBER, &QueryMapper::find_all(query)).await
    }

    pub async fn find_many_with_pagination(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Vec<Member>> {
        fetch_spec(&self.pool, &MEMBER, &QueryMapper::find_many_with_pagination(query, page)).await
    }

    pub async fn count(&self, query: &QueryBag) -> AppResult<i64> {
        count_spec(&self.pool, &MEMBER, &QueryMapper::count(query)).await
    }

    pub async fn find_many_with_pagination_and_keyword(
        &self,
        query: &QueryBag,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Vec<Member>> {
        let fields = relation::member_identity();
        let spec = QueryMapper::find_many_with_pagination_and_keyword(query, keyword, fields.direct_fields(), page);
        fetch_spec(&self.pool, &MEMBER, &spec).await
    }

    pub async fn count_with_keyword(&self, query: &QueryBag, keyword: &str) -> AppResult<i64> {
        let fields = relation::member_identity();
        let spec = QueryMapper::count_with_keyword(query, keyword, fields.direct_fields());
        count_spec(&self.pool, &MEMBER, &spec).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        let created = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (member_code, first_name, last_name, phone, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&member.member_code)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
