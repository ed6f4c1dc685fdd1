//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookDetails, CreateBook},
};

use super::{list_or_not_found, page_spec, paginated_or_not_found, query_bag, PaginatedResponse, RawQuery};

/// Advanced search over title, category, author and borrower names
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("keyword" = Option<String>, Query, description = "Search keyword; empty lists every book"),
        ("page" = Option<i64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Books with author and borrowing history", body = PaginatedResponse<BookDetails>),
        (status = 404, description = "No books found")
    )
)]
pub async fn search_books_advanced(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.books.search_books_advanced(bag.keyword(), page).await?;
    paginated_or_not_found(result, "Books retrieved successfully", "No books found")
}

/// List books matching exact field filters
#[utoipa::path(
    get,
    path = "/books/all",
    tag = "books",
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Unknown filter field"),
        (status = 404, description = "No books found")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.get_all_books(&query_bag(query)).await?;
    list_or_not_found(books, "No books found")
}

#[utoipa::path(
    get,
    path = "/books/paginated",
    tag = "books",
    responses(
        (status = 200, description = "Page of books", body = PaginatedResponse<Book>),
        (status = 404, description = "No books found")
    )
)]
pub async fn list_books_paginated(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.books.get_books_with_pagination(&bag, page).await?;
    paginated_or_not_found(result, "Books retrieved successfully", "No books found")
}

/// Keyword over title and category, combined with field filters
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    responses(
        (status = 200, description = "Page of books", body = PaginatedResponse<Book>),
        (status = 404, description = "No books found")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.books.search_books(&bag, page).await?;
    paginated_or_not_found(result, "Books retrieved successfully", "No books found")
}

/// Keyword over book fields, author names and borrowing dates
#[utoipa::path(
    get,
    path = "/books/search/relations",
    tag = "books",
    responses(
        (status = 200, description = "Page of books with relations", body = PaginatedResponse<BookDetails>),
        (status = 404, description = "No books found")
    )
)]
pub async fn search_books_with_relations(
    State(state): State<crate::AppState>,
    Query(query): Query<RawQuery>,
) -> AppResult<Response> {
    let bag = query_bag(query);
    let page = page_spec(&state, &bag);

    let result = state.services.books.search_books_with_relations(bag.keyword(), page).await?;
    paginated_or_not_found(result, "Books retrieved successfully", "No books found")
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<crate::AppState>, Path(id): Path<i32>) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
