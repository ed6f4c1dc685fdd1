//! Catalog (books) service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookDetails, CreateBook},
    query::{PaginationSpec, QueryBag},
    repository::Repository,
};

use super::Paginated;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books matching the equality filters in `query`
    pub async fn get_all_books(&self, query: &QueryBag) -> AppResult<Vec<Book>> {
        self.repository.books.find_all(query).await
    }

    pub async fn get_books_with_pagination(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Paginated<Book>> {
        let books = &self.repository.books;
        let (data, total) = tokio::try_join!(books.find_many_with_pagination(query, page), books.count(query))?;
        Ok(Paginated::new(data, total, page))
    }

    /// Keyword over title and category, AND-ed with the remaining filters
    pub async fn search_books(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Paginated<Book>> {
        let books = &self.repository.books;
        let keyword = query.keyword();
        let (data, total) = tokio::try_join!(
            books.find_many_with_pagination_and_keyword(query, keyword, page),
            books.count_with_keyword(query, keyword)
        )?;
        Ok(Paginated::new(data, total, page))
    }

    /// Keyword over book fields, author names and borrowing dates
    pub async fn search_books_with_relations(
        &self,
        keyword: &str,
        page: PaginationSpec,
    ) -> AppResult<Paginated<BookDetails>> {
        let books = &self.repository.books;
        let (data, total) = tokio::try_join!(
            books.find_many_with_keyword_and_relations(keyword, page),
            books.count_with_keyword_and_relations(keyword)
        )?;
        Ok(Paginated::new(data, total, page))
    }

    /// Keyword over book fields, author names and borrower names
    pub async fn search_books_advanced(&self, keyword: &str, page: PaginationSpec) -> AppResult<Paginated<BookDetails>> {
        let books = &self.repository.books;
        let (data, total) = tokio::try_join!(
            books.search_with_keyword_and_pagination(keyword, page),
            books.count_with_keyword_search(keyword)
        )?;

        tracing::debug!(keyword, total, page = page.page, "Advanced book search");
        Ok(Paginated::new(data, total, page))
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book for an existing author
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        self.repository.authors.get_by_id(book.author_id).await?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Created book id={} '{}'", created.id, created.title);
        Ok(created)
    }
}
