//! Expense records.
//!
//! An `Expense` is append-only: the engine writes it once and never updates
//! or deletes it. Negative amounts are refunds.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Amount,
    calendar::{self, YearMonth},
};

/// Chat/user identifier the expense is attributed to.
pub type UserId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub local_date: NaiveDate,
    pub user_id: UserId,
    pub category: String,
    pub amount: Amount,
}

impl Expense {
    pub fn new(
        user_id: UserId,
        category: String,
        amount: Amount,
        recorded_at: DateTime<Utc>,
        local_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            local_date,
            user_id,
            category,
            amount,
        }
    }

    pub fn local_month(&self) -> YearMonth {
        YearMonth::of(self.local_date)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub recorded_at: DateTimeUtc,
    pub local_date: String,
    pub local_month: String,
    pub user_id: i64,
    pub category: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            recorded_at: ActiveValue::Set(expense.recorded_at),
            local_date: ActiveValue::Set(calendar::date_key(expense.local_date)),
            local_month: ActiveValue::Set(expense.local_month().key()),
            user_id: ActiveValue::Set(expense.user_id),
            category: ActiveValue::Set(expense.category.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn active_model_carries_bucket_keys() {
        let expense = Expense::new(
            7,
            "Meals".to_string(),
            Amount::new(-250),
            Utc.with_ymd_and_hms(2025, 3, 1, 2, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        );
        let model = ActiveModel::from(&expense);
        assert_eq!(model.local_date, ActiveValue::Set("2025-03-01".to_string()));
        assert_eq!(model.local_month, ActiveValue::Set("2025-03".to_string()));
        assert_eq!(model.amount_minor, ActiveValue::Set(-250));
    }
}
