//! Borrow transaction endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{CreateTransaction, TransactionWithItems},
};

/// Lend books to a member in a single transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransaction,
    responses(
        (status = 201, description = "Transaction created", body = TransactionWithItems),
        (status = 400, description = "Invalid input or unknown book"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn create_transaction(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateTransaction>,
) -> AppResult<(StatusCode, Json<TransactionWithItems>)> {
    let created = state.services.transactions.create_transaction(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction with its items", body = TransactionWithItems),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<TransactionWithItems>> {
    let transaction = state.services.transactions.get_transaction(id).await?;
    Ok(Json(transaction))
}
