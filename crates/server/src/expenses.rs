//! Expense API endpoints

use axum::{Json, extract::State, http::StatusCode};
use engine::Amount;

use crate::{
    ServerError,
    server::ServerState,
    types::expense::{ExpenseCreated, ExpenseNew},
};

/// Record a new expense, bypassing the chat conversation
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let amount: Amount = payload.amount.as_text().parse()?;

    let expense = state
        .engine
        .record_expense(
            payload.user_id,
            &payload.category,
            amount,
            payload.date.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseCreated {
            id: expense.id,
            user_id: expense.user_id,
            local_month: expense.local_month().key(),
            category: expense.category,
            amount: expense.amount.to_f64(),
            recorded_at: expense.recorded_at,
            local_date: expense.local_date,
        }),
    ))
}
