//! Member endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member},
    query::QueryBag,
};

use super::{list_or_not_found, page_spec, paginated_or_not_found, query_bag, PaginatedResponse, RawQuery};

/// Copy the non-empty `fields` of `source` into a fresh bag
fn pick(source: &QueryBag, fields: &[&str]) -> QueryBag {
    let mut bag = QueryBag::new();
    for field in fields {
        if let Some(value) = source.text(field).filter(|v| !v.is_empty()) {
            bag.insert(*field, value);
        }
    }
    bag
}

#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "Matching members", body = Vec<Member>),
        (status = 404, description = "No members found")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.get_all_members(&query_bag(query)).await?;
    list_or_not_found(members, "No members found")
}

#[utoipa::path(
    get,
    path = "/members/paginated",
    tag = "members",
    responses(
        (status = 200, description = "Page of members", body = PaginatedResponse<Member>),
        (status = 404, description = "No members found")
    )
)]
pub async fn list_members_paginated(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.members.get_members_with_pagination(&bag, page).await?;
    paginated_or_not_found(result, "Members retrieved successfully", "No members found")
}

/// Keyword over member code, names and phone
#[utoipa::path(
    get,
    path = "/members/search",
    tag = "members",
    responses(
        (status = 200, description = "Page of members", body = PaginatedResponse<Member>),
        (status = 404, description = "No members found")
    )
)]
pub async fn search_members(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.members.search_members(&bag, page).await?;
    paginated_or_not_found(result, "Members retrieved successfully", "No members found")
}

#[utoipa::path(
    get,
    path = "/members/by-name",
    tag = "members",
    params(
        ("firstName" = Option<String>, Query, description = "Exact first name"),
        ("lastName" = Option<String>, Query, description = "Exact last name")
    ),
    responses(
        (status = 200, description = "Members with the given name", body = Vec<Member>),
        (status = 400, description = "Neither firstName nor lastName given"),
        (status = 404, description = "No members found with the given name")
    )
)]
pub async fn find_by_name(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<Member>>> {
    let filter = pick(&query_bag(query), &["firstName", "lastName"]);
    if filter.is_empty() {
        return Err(AppError::BadRequest(
            "firstName or lastName query parameter is required".to_string(),
        ));
    }

    let members = state.services.members.get_all_members(&filter).await?;
    list_or_not_found(members, "No members found with the given name")
}

#[utoipa::path(
    get,
    path = "/members/by-code",
    tag = "members",
    params(
        ("memberCode" = String, Query, description = "Member code")
    ),
    responses(
        (status = 200, description = "Member with the given code", body = Vec<Member>),
        (status = 400, description = "memberCode missing"),
        (status = 404, description = "No member found with the given memberCode")
    )
)]
pub async fn find_by_code(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<Member>>> {
    let filter = pick(&query_bag(query), &["memberCode"]);
    if filter.is_empty() {
        return Err(AppError::BadRequest("memberCode query parameter is required".to_string()));
    }

    let members = state.services.members.get_all_members(&filter).await?;
    list_or_not_found(members, "No member found with the given memberCode")
}

#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Member code already in use")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    Json(member): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let created = state.services.members.create_member(member).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_skips_empty_and_unrelated() {
        let source = QueryBag::from_pairs([("firstName", "John"), ("lastName", ""), ("phone", "555")]);
        let bag = pick(&source, &["firstName", "lastName"]);
        assert_eq!(bag.text("firstName"), Some("John"));
        assert_eq!(bag.get("lastName"), None);
        assert_eq!(bag.get("phone"), None);

        assert!(pick(&QueryBag::new(), &["memberCode"]).is_empty());
    }
}
