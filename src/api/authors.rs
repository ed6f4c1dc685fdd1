//! Author endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
};

use super::{list_or_not_found, page_spec, paginated_or_not_found, query_bag, PaginatedResponse, RawQuery};

#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Matching authors", body = Vec<Author>),
        (status = 404, description = "No authors found")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.get_all_authors(&query_bag(query)).await?;
    list_or_not_found(authors, "No authors found")
}

/// Keyword over names and affiliation
#[utoipa::path(
    get,
    path = "/authors/search",
    tag = "authors",
    responses(
        (status = 200, description = "Page of authors", body = PaginatedResponse<Author>),
        (status = 404, description = "No authors found")
    )
)]
pub async fn search_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.authors.search_authors(&bag, page).await?;
    paginated_or_not_found(result, "Authors retrieved successfully", "No authors found")
}

#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let created = state.services.authors.create_author(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
