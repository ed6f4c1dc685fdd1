//! Lending history endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowItem, CreateBorrowItem},
    query::QueryBag,
};

use super::{list_or_not_found, page_spec, paginated_or_not_found, query_bag, PaginatedResponse, RawQuery};

const DUE_DATE_REQUIRED: &str = "dueDate query parameter is required (format: YYYY-MM-DD)";

/// Parse the mandatory `dueDate` parameter
fn due_date(bag: &QueryBag) -> AppResult<NaiveDate> {
    let raw = bag
        .text("dueDate")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(DUE_DATE_REQUIRED.to_string()))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid dueDate '{}': expected YYYY-MM-DD", raw)))
}

#[utoipa::path(
    get,
    path = "/histories",
    tag = "histories",
    responses(
        (status = 200, description = "Matching borrow items", body = Vec<BorrowItem>),
        (status = 404, description = "No histories found")
    )
)]
pub async fn list_histories(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<BorrowItem>>> {
    let items = state.services.borrow_items.get_all_histories(&query_bag(query)).await?;
    list_or_not_found(items, "No histories found")
}

#[utoipa::path(
    get,
    path = "/histories/paginated",
    tag = "histories",
    responses(
        (status = 200, description = "Page of borrow items", body = PaginatedResponse<BorrowItem>),
        (status = 404, description = "No histories found")
    )
)]
pub async fn list_histories_paginated(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.borrow_items.get_histories_with_pagination(&bag, page).await?;
    paginated_or_not_found(result, "Histories retrieved successfully", "No histories found")
}

/// Items not returned yet
#[utoipa::path(
    get,
    path = "/histories/unreturned",
    tag = "histories",
    responses(
        (status = 200, description = "Unreturned borrow items", body = Vec<BorrowItem>),
        (status = 404, description = "No unreturned books found")
    )
)]
pub async fn list_unreturned(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BorrowItem>>> {
    let items = state.services.borrow_items.get_unreturned().await?;
    list_or_not_found(items, "No unreturned books found")
}

#[utoipa::path(
    get,
    path = "/histories/due-date",
    tag = "histories",
    params(
        ("dueDate" = String, Query, description = "Due date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Items due on the date", body = Vec<BorrowItem>),
        (status = 400, description = "Missing or malformed dueDate"),
        (status = 404, description = "No books found for the given due date")
    )
)]
pub async fn list_due_on(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<BorrowItem>>> {
    let date = due_date(&query_bag(query))?;
    let items = state.services.borrow_items.get_due_on(date, false).await?;
    list_or_not_found(items, "No books found for the given due date")
}

#[utoipa::path(
    get,
    path = "/histories/due-date-unreturned",
    tag = "histories",
    params(
        ("dueDate" = String, Query, description = "Due date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Unreturned items due on the date", body = Vec<BorrowItem>),
        (status = 400, description = "Missing or malformed dueDate"),
        (status = 404, description = "No unreturned books found for the given due date")
    )
)]
pub async fn list_due_on_unreturned(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<BorrowItem>>> {
    let date = due_date(&query_bag(query))?;
    let items = state.services.borrow_items.get_due_on(date, true).await?;
    list_or_not_found(items, "No unreturned books found for the given due date")
}

/// Keyword over due and return dates, combined with field filters
#[utoipa::path(
    get,
    path = "/histories/search",
    tag = "histories",
    responses(
        (status = 200, description = "Page of borrow items", body = PaginatedResponse<BorrowItem>),
        (status = 404, description = "No histories found")
    )
)]
pub async fn search_histories(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.borrow_items.search_histories(&bag, page).await?;
    paginated_or_not_found(result, "Histories retrieved successfully", "No histories found")
}

#[utoipa::path(
    post,
    path = "/histories",
    tag = "histories",
    request_body = CreateBorrowItem,
    responses(
        (status = 201, description = "Borrow item created", body = BorrowItem),
        (status = 400, description = "Unknown transaction"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_history(
    State(state): State<crate::AppState>,
    Json(item): Json<CreateBorrowItem>,
) -> AppResult<(StatusCode, Json<BorrowItem>)> {
    let created = state.services.borrow_items.create_history(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Mark a borrowed item as returned
#[utoipa::path(
    post,
    path = "/histories/{id}/return",
    tag = "histories",
    params(
        ("id" = i32, Path, description = "Borrow item ID")
    ),
    responses(
        (status = 200, description = "Item returned", body = BorrowItem),
        (status = 404, description = "Borrow item not found")
    )
)]
pub async fn return_item(State(state): State<crate::AppState>, Path(id): Path<i32>) -> AppResult<Json<BorrowItem>> {
    let item = state.services.borrow_items.mark_returned(id).await?;
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_parsing() {
        let bag = QueryBag::from_pairs([("dueDate", "2026-01-15")]);
        assert_eq!(due_date(&bag).ok(), NaiveDate::from_ymd_opt(2026, 1, 15));

        assert!(matches!(due_date(&QueryBag::new()), Err(AppError::BadRequest(_))));
        assert!(matches!(
            due_date(&QueryBag::from_pairs([("dueDate", "")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            due_date(&QueryBag::from_pairs([("dueDate", "15/01/2026")])),
            Err(AppError::BadRequest(_))
        ));
    }
}
