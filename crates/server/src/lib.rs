use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener};

mod expenses;
mod server;
mod summary;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{AmountInput, ExpenseCreated, ExpenseNew};
    }

    pub mod summary {
        pub use api_types::summary::{
            CategoryAmount, DailyQuery, DailySummary, DayKind, MonthlyQuery, MonthlySummary,
        };
    }

    pub mod health {
        pub use api_types::health::Health;
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UnknownCategory(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidMonth(_)
        | EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        EngineError::ClockResolution(_)
        | EngineError::InvalidConfig(_)
        | EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    if err.is_validation() {
        return err.to_string();
    }
    tracing::error!("request failed: {err}");
    "internal server error".to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let status = status_for_engine_error(&err);
        let error = message_for_engine_error(err);

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
