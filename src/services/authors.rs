//! Authors service

use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
    query::{PaginationSpec, QueryBag},
    repository::Repository,
};

use super::Paginated;

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all_authors(&self, query: &QueryBag) -> AppResult<Vec<Author>> {
        self.repository.authors.find_all(query).await
    }

    pub async fn search_authors(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Paginated<Author>> {
        let authors = &self.repository.authors;
        let keyword = query.keyword();
        let (data, total) = tokio::try_join!(
            authors.find_many_with_pagination_and_keyword(query, keyword, page),
            authors.count_with_keyword(query, keyword)
        )?;
        Ok(Paginated::new(data, total, page))
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate()?;
        self.repository.authors.create(&author).await
    }
}
