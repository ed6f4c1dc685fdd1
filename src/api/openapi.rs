//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, borrow_items, health, members, transactions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library catalog and lending REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::search_books_advanced,
        books::list_books,
        books::list_books_paginated,
        books::search_books,
        books::search_books_with_relations,
        books::get_book,
        books::create_book,
        // Histories
        borrow_items::list_histories,
        borrow_items::list_histories_paginated,
        borrow_items::list_unreturned,
        borrow_items::list_due_on,
        borrow_items::list_due_on_unreturned,
        borrow_items::search_histories,
        borrow_items::create_history,
        borrow_items::return_item,
        // Members
        members::list_members,
        members::list_members_paginated,
        members::search_members,
        members::find_by_name,
        members::find_by_code,
        members::create_member,
        // Authors
        authors::list_authors,
        authors::search_authors,
        authors::create_author,
        // Transactions
        transactions::create_transaction,
        transactions::get_transaction,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorSummary,
            crate::models::author::CreateAuthor,
            // Members
            crate::models::member::Member,
            crate::models::member::MemberSummary,
            crate::models::member::CreateMember,
            // Lending
            crate::models::borrow::BorrowTransaction,
            crate::models::borrow::BorrowItem,
            crate::models::borrow::TransactionDetails,
            crate::models::borrow::BorrowItemDetails,
            crate::models::borrow::TransactionWithItems,
            crate::models::borrow::CreateBorrowItem,
            crate::models::borrow::TransactionItemRequest,
            crate::models::borrow::CreateTransaction,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog search and management"),
        (name = "histories", description = "Lending history"),
        (name = "members", description = "Library members"),
        (name = "authors", description = "Authors"),
        (name = "transactions", description = "Borrow transactions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
