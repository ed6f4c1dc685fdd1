//! Borrow transactions service

use validator::Validate;

use crate::{
    error::AppResult,
    models::borrow::{CreateTransaction, TransactionWithItems},
    repository::Repository,
};

#[derive(Clone)]
pub struct TransactionsService {
    repository: Repository,
}

impl TransactionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_transaction(&self, id: i32) -> AppResult<TransactionWithItems> {
        self.repository.transactions.get_with_items(id).await
    }

    /// Lend one or more books to a member
    pub async fn create_transaction(&self, request: CreateTransaction) -> AppResult<TransactionWithItems> {
        request.validate()?;
        // Verify member exists
        self.repository.members.get_by_id(request.member_id).await?;
        self.repository.transactions.create(&request).await
    }
}
