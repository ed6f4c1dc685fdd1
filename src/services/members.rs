//! Members service

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member},
    query::{PaginationSpec, QueryBag},
    repository::Repository,
};

use super::Paginated;

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all_members(&self, query: &QueryBag) -> AppResult<Vec<Member>> {
        self.repository.members.find_all(query).await
    }

    pub async fn get_members_with_pagination(
        &self,
        query: &QueryBag,
        page: PaginationSpec,
    ) -> AppResult<Paginated<Member>> {
        let members = &self.repository.members;
        let (data, total) = tokio::try_join!(members.find_many_with_pagination(query, page), members.count(query))?;
        Ok(Paginated::new(data, total, page))
    }

    pub async fn search_members(&self, query: &QueryBag, page: PaginationSpec) -> AppResult<Paginated<Member>> {
        let members = &self.repository.members;
        let keyword = query.keyword();
        let (data, total) = tokio::try_join!(
            members.find_many_with_pagination_and_keyword(query, keyword, page),
            members.count_with_keyword(query, keyword)
        )?;
        Ok(Paginated::new(data, total, page))
    }

    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        member.validate()?;
        let created = self.repository.members.create(&member).await?;
        tracing::info!("Created member id={} code={}", created.id, created.member_code);
        Ok(created)
    }
}
