//! Lending history service

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::borrow::{BorrowItem, CreateBorrowItem},
    query::{FieldValue, PaginationSpec, QueryBag},
    repository::Repository,
};

use super::Paginated;

#[derive(Clone)]
pub struct BorrowItemsService {
    repository: Repository,
}

impl BorrowItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all_histories(&self, query: &QueryBag) -> AppResult<Vec<BorrowItem>> {
        self.repository.borrow_items.find_all(query).await
    }

    pub async fn get_histories_with_pagination(
        &self,
        query: &QueryBag,
        page: PaginationSpec,
    ) -> AppResult<Paginated<BorrowItem>> {
        let items = &self.repository.borrow_items;
        let (data, total) = tokio::try_join!(items.find_many_with_pagination(query, page), items.count(query))?;
        Ok(Paginated::new(data, total, page))
    }

    pub async fn search_histories(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Paginated<BorrowItem>> {
        let items = &self.repository.borrow_items;
        let keyword = query.keyword();
        let (data, total) = tokio::try_join!(
            items.find_many_with_pagination_and_keyword(query, keyword, page),
            items.count_with_keyword(query, keyword)
        )?;
        Ok(Paginated::new(data, total, page))
    }

    /// Items that have not been given back yet
    pub async fn get_unreturned(&self) -> AppResult<Vec<BorrowItem>> {
        let query = QueryBag::new().with("returnedAt", FieldValue::Null);
        self.repository.borrow_items.find_all(&query).await
    }

    /// Items due on `due_date`, optionally only those still out
    pub async fn get_due_on(&self, due_date: NaiveDate, unreturned_only: bool) -> AppResult<Vec<BorrowItem>> {
        let mut query = QueryBag::new().with("dueDate", due_date);
        if unreturned_only {
            query.insert("returnedAt", FieldValue::Null);
        }
        self.repository.borrow_items.find_all(&query).await
    }

    pub async fn create_history(&self, item: CreateBorrowItem) -> AppResult<BorrowItem> {
        self.repository.books.get_by_id(item.book_id).await?;
        self.repository.borrow_items.create(&item).await
    }

    pub async fn mark_returned(&self, id: i32) -> AppResult<BorrowItem> {
        let item = self.repository.borrow_items.mark_returned(id).await?;
        tracing::info!("Borrow item id={} returned", item.id);
        Ok(item)
    }
}
