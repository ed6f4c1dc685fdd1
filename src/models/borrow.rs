//! Borrow transactions and the items lent in them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::member::MemberSummary;

/// One visit at the desk: a member borrowing one or more books
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowTransaction {
    pub id: i32,
    pub member_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A single book lent within a transaction
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowItem {
    pub id: i32,
    pub transaction_id: i32,
    pub book_id: i32,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub id: i32,
    pub member_id: i32,
    pub created_at: DateTime<Utc>,
    pub member: Option<MemberSummary>,
}

impl From<BorrowTransaction> for TransactionDetails {
    fn from(t: BorrowTransaction) -> Self {
        Self {
            id: t.id,
            member_id: t.member_id,
            created_at: t.created_at,
            member: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowItemDetails {
    pub id: i32,
    pub transaction_id: i32,
    pub book_id: i32,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub transaction: Option<TransactionDetails>,
}

impl From<BorrowItem> for BorrowItemDetails {
    fn from(i: BorrowItem) -> Self {
        Self {
            id: i.id,
            transaction_id: i.transaction_id,
            book_id: i.book_id,
            due_date: i.due_date,
            returned_at: i.returned_at,
            created_at: i.created_at,
            transaction: None,
        }
    }
}

/// Transaction with its items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithItems {
    pub id: i32,
    pub member_id: i32,
    pub created_at: DateTime<Utc>,
    pub items: Vec<BorrowItem>,
}

/// Add one item to an existing transaction
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowItem {
    pub transaction_id: i32,
    pub book_id: i32,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemRequest {
    pub book_id: i32,
    pub due_date: DateTime<Utc>,
}

/// Create transaction request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub member_id: i32,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<TransactionItemRequest>,
}
