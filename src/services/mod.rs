//! Business logic services

pub mod authors;
pub mod books;
pub mod borrow_items;
pub mod members;
pub mod transactions;

use crate::{
    error::AppResult,
    query::{total_pages, PaginationSpec},
    repository::Repository,
};

/// One page of results together with the totals used to navigate them
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: PaginationSpec) -> Self {
        Self {
            data,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total_pages(total, page.limit),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub borrow_items: borrow_items::BorrowItemsService,
    pub members: members::MembersService,
    pub transactions: transactions::TransactionsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            borrow_items: borrow_items::BorrowItemsService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            transactions: transactions::TransactionsService::new(repository.clone()),
            repository,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_totals() {
        let page = Paginated::new(vec![1, 2, 3], 23, PaginationSpec::new(3, 10));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert!(!page.is_empty());

        let empty: Paginated<i32> = Paginated::new(vec![], 0, PaginationSpec::new(1, 10));
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_empty());
    }
}
