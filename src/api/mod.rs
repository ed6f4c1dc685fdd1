//! API handlers for Libris REST endpoints

pub mod authors;
pub mod books;
pub mod borrow_items;
pub mod health;
pub mod members;
pub mod openapi;
pub mod transactions;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    query::{PageParams, PaginationSpec, QueryBag},
    services::Paginated,
    AppState,
};

/// Raw query-string pairs, in request order
pub type RawQuery = Vec<(String, String)>;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub success: bool,
    pub message: String,
    /// Records on this page
    pub data: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub limit: i64,
    pub total_pages: i64,
}

/// Build the filter bag from raw query pairs
pub(crate) fn query_bag(pairs: RawQuery) -> QueryBag {
    QueryBag::from_pairs(pairs)
}

/// Resolve `page` / `limit` from the bag, falling back to configured defaults
pub(crate) fn page_spec(state: &AppState, bag: &QueryBag) -> PaginationSpec {
    PageParams::new(bag.page(), bag.limit()).resolve(state.config.pagination.default_limit)
}

/// A plain list, or 404 with `message` when nothing matched
pub(crate) fn list_or_not_found<T: Serialize>(records: Vec<T>, message: &str) -> AppResult<Json<Vec<T>>> {
    if records.is_empty() {
        return Err(AppError::NotFound(message.to_string()));
    }
    Ok(Json(records))
}

/// Paginated body with `x-total-count` / `x-total-pages` headers, or 404 when the page is empty
pub(crate) fn paginated_or_not_found<T>(page: Paginated<T>, message: &str, not_found: &str) -> AppResult<Response>
where
    T: Serialize + for<'a> ToSchema<'a>,
{
    if page.is_empty() {
        return Err(AppError::NotFound(not_found.to_string()));
    }

    let headers = [
        ("x-total-count", page.total.to_string()),
        ("x-total-pages", page.total_pages.to_string()),
    ];
    let body = PaginatedResponse {
        success: true,
        message: message.to_string(),
        data: page.data,
        total: page.total,
        page: page.page,
        limit: page.limit,
        total_pages: page.total_pages,
    };

    Ok((headers, Json(body)).into_response())
}
