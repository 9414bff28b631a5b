use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }

    impl Health {
        pub fn ok() -> Self {
            Self {
                status: "ok".to_string(),
            }
        }
    }
}

pub mod expense {
    use super::*;

    /// An amount as sent by API clients: either a JSON number (`12.5`) or a
    /// decimal string (`"12,50"`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Number(f64),
        Text(String),
    }

    impl AmountInput {
        /// Textual form handed to the amount parser.
        pub fn as_text(&self) -> String {
            match self {
                Self::Number(value) => value.to_string(),
                Self::Text(text) => text.clone(),
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub user_id: i64,
        pub category: String,
        pub amount: AmountInput,
        /// Local date override (`YYYY-MM-DD`). If absent, server uses today.
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
        pub user_id: i64,
        pub category: String,
        pub amount: f64,
        pub recorded_at: DateTime<Utc>,
        pub local_date: NaiveDate,
        /// `YYYY-MM`
        pub local_month: String,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyQuery {
        pub date: Option<String>,
    }

    /// Raw strings on purpose: the engine reports malformed values.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        pub year: Option<String>,
        pub month: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DayKind {
        Weekday,
        Weekend,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailySummary {
        pub date: NaiveDate,
        pub day_kind: DayKind,
        pub budget: f64,
        pub spent: f64,
        pub remaining: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryAmount {
        pub category: String,
        pub total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub year: i32,
        pub month: u32,
        pub weekday_count: u32,
        pub weekend_count: u32,
        pub monthly_daily_budget: f64,
        pub spent_daily: f64,
        pub spent_monthly: f64,
        pub per_category_monthly: Vec<CategoryAmount>,
        pub spent_other: f64,
        pub per_category_other: Vec<CategoryAmount>,
        pub fixed_budget_total: f64,
        pub total_budget_tracked: f64,
        pub total_spent_tracked: f64,
        pub remaining_tracked: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::expense::{AmountInput, ExpenseNew};

    #[test]
    fn expense_amount_accepts_number_or_text() {
        let body: ExpenseNew =
            serde_json::from_str(r#"{"user_id": 1, "category": "Meals", "amount": 12.5}"#).unwrap();
        assert_eq!(body.amount, AmountInput::Number(12.5));
        assert_eq!(body.amount.as_text(), "12.5");
        assert!(body.date.is_none());

        let body: ExpenseNew = serde_json::from_str(
            r#"{"user_id": 1, "category": "Meals", "amount": "-3,20", "date": "2025-03-15"}"#,
        )
        .unwrap();
        assert_eq!(body.amount.as_text(), "-3,20");
        assert_eq!(body.date.as_deref(), Some("2025-03-15"));
    }
}
