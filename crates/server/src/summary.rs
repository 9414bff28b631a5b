//! Summary API endpoints

use axum::{
    Json,
    extract::{Query, State},
};
use engine::CategoryTotal;

use crate::{
    ServerError,
    server::ServerState,
    types::summary::{
        CategoryAmount, DailyQuery, DailySummary, DayKind, MonthlyQuery, MonthlySummary,
    },
};

/// Handle requests for the daily summary, optionally for `?date=YYYY-MM-DD`
pub async fn today(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailySummary>, ServerError> {
    let summary = state.engine.daily_summary(query.date.as_deref()).await?;

    Ok(Json(DailySummary {
        date: summary.date,
        day_kind: match summary.day_kind {
            engine::DayKind::Weekday => DayKind::Weekday,
            engine::DayKind::Weekend => DayKind::Weekend,
        },
        budget: summary.budget.to_f64(),
        spent: summary.spent.to_f64(),
        remaining: summary.remaining.to_f64(),
    }))
}

/// Handle requests for the monthly summary, optionally for
/// `?year=YYYY&month=M`
pub async fn month(
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlySummary>, ServerError> {
    let summary = state
        .engine
        .monthly_summary(query.year.as_deref(), query.month.as_deref())
        .await?;

    Ok(Json(MonthlySummary {
        year: summary.year,
        month: summary.month,
        weekday_count: summary.weekday_count,
        weekend_count: summary.weekend_count,
        monthly_daily_budget: summary.monthly_daily_budget.to_f64(),
        spent_daily: summary.spent_daily.to_f64(),
        spent_monthly: summary.spent_monthly.to_f64(),
        per_category_monthly: category_amounts(summary.per_category_monthly),
        spent_other: summary.spent_other.to_f64(),
        per_category_other: category_amounts(summary.per_category_other),
        fixed_budget_total: summary.fixed_budget_total.to_f64(),
        total_budget_tracked: summary.total_budget_tracked.to_f64(),
        total_spent_tracked: summary.total_spent_tracked.to_f64(),
        remaining_tracked: summary.remaining_tracked.to_f64(),
    }))
}

fn category_amounts(rows: Vec<CategoryTotal>) -> Vec<CategoryAmount> {
    rows.into_iter()
        .map(|row| CategoryAmount {
            category: row.category,
            total: row.total.to_f64(),
        })
        .collect()
}
