//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::AuthorSummary, borrow::BorrowItemDetails};

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its author and borrow history, as returned by searches
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Option<AuthorSummary>,
    pub borrow_items: Vec<BorrowItemDetails>,
}

impl From<Book> for BookDetails {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            isbn: b.isbn,
            category: b.category,
            author_id: b.author_id,
            created_at: b.created_at,
            updated_at: b.updated_at,
            author: None,
            borrow_items: Vec::new(),
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 10, max = 17, message = "ISBN must be 10 to 17 characters"))]
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub author_id: i32,
}
