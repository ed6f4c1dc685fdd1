//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod borrow_items;
pub mod members;
pub mod schema;
pub mod transactions;

use sqlx::{postgres::PgRow, FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    query::{EntitySchema, QuerySpec},
};

use schema::LIBRARY;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub borrow_items: borrow_items::BorrowItemsRepository,
    pub members: members::MembersRepository,
    pub transactions: transactions::TransactionsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            borrow_items: borrow_items::BorrowItemsRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            transactions: transactions::TransactionsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Run the SELECT a spec describes and map rows to `T`
pub(crate) async fn fetch_spec<T>(pool: &Pool<Postgres>, entity: &EntitySchema, spec: &QuerySpec) -> AppResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut builder = LIBRARY.render_select(entity, spec)?;
    tracing::debug!(entity = entity.name, sql = builder.sql(), "Fetching records");

    let rows = builder.build_query_as::<T>().fetch_all(pool).await?;
    Ok(rows)
}

/// Count the records matching a spec's WHERE condition
pub(crate) async fn count_spec(pool: &Pool<Postgres>, entity: &EntitySchema, spec: &QuerySpec) -> AppResult<i64> {
    let mut builder = LIBRARY.render_count(entity, spec)?;
    tracing::debug!(entity = entity.name, sql = builder.sql(), "Counting records");

    let (total,): (i64,) = builder.build_query_as().fetch_one(pool).await?;
    Ok(total)
}
