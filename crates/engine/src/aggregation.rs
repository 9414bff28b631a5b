//! Budget-vs-spend summaries.
//!
//! Summaries are derived on demand from stored expenses and the static
//! [`BudgetModel`](crate::BudgetModel); nothing here is persisted. Totals keep
//! full cent precision, rounding is a display concern.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    Amount, CategoryKind, Engine, ResultEngine,
    calendar::{self, DayKind, YearMonth},
    storage::{Bucket, CategoryTotal},
};

/// Per-category sums inside one bucket.
///
/// `per_category` follows the order of the requested categories and only
/// lists categories that had activity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategorySums {
    pub total: Amount,
    pub per_category: Vec<CategoryTotal>,
}

impl CategorySums {
    pub fn get(&self, category: &str) -> Option<Amount> {
        self.per_category
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day_kind: DayKind,
    pub budget: Amount,
    pub spent: Amount,
    /// Negative when the day is overspent.
    pub remaining: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub weekday_count: u32,
    pub weekend_count: u32,
    pub monthly_daily_budget: Amount,
    pub spent_daily: Amount,
    pub spent_monthly: Amount,
    pub per_category_monthly: Vec<CategoryTotal>,
    pub spent_other: Amount,
    pub per_category_other: Vec<CategoryTotal>,
    pub fixed_budget_total: Amount,
    pub total_budget_tracked: Amount,
    /// Daily and monthly spend only; `other` spend is informational.
    pub total_spent_tracked: Amount,
    pub remaining_tracked: Amount,
}

impl Engine {
    /// Grouped sums of `categories` inside `bucket`.
    ///
    /// An empty category list short-circuits to zero without touching storage.
    pub async fn sum_by_category(
        &self,
        bucket: Bucket,
        categories: &[String],
    ) -> ResultEngine<CategorySums> {
        if categories.is_empty() {
            return Ok(CategorySums::default());
        }

        let mut rows = self.storage.sum_by_category(bucket, categories).await?;
        rows.sort_by_key(|row| categories.iter().position(|name| *name == row.category));

        Ok(CategorySums {
            total: rows.iter().map(|row| row.total).sum(),
            per_category: rows,
        })
    }

    /// Summary of one local day; `date` must be strict `YYYY-MM-DD` when
    /// given, otherwise today's local date is used.
    pub async fn daily_summary(&self, date: Option<&str>) -> ResultEngine<DailySummary> {
        let date = match date {
            Some(raw) => calendar::parse_date(raw)?,
            None => self.today()?,
        };

        let daily = self.model.registry().categories_of_kind(CategoryKind::Daily);
        let spent = self.sum_by_category(Bucket::Day(date), &daily).await?.total;
        let budget = self.model.daily_budget_for(date);

        tracing::debug!("daily summary {date}: budget {budget}, spent {spent}");

        Ok(DailySummary {
            date,
            day_kind: calendar::classify_day(date),
            budget,
            spent,
            remaining: budget - spent,
        })
    }

    /// Summary of one local month. Missing parts default to the current local
    /// year/month.
    pub async fn monthly_summary(
        &self,
        year: Option<&str>,
        month: Option<&str>,
    ) -> ResultEngine<MonthlySummary> {
        let month = match (year, month) {
            (Some(year), Some(month)) => YearMonth::parse(year, month)?,
            (year, month) => {
                let current = YearMonth::of(self.today()?);
                let year = year.map(str::to_string).unwrap_or(current.year().to_string());
                let month = month
                    .map(str::to_string)
                    .unwrap_or(current.month().to_string());
                YearMonth::parse(&year, &month)?
            }
        };

        let registry = self.model.registry();
        let daily = registry.categories_of_kind(CategoryKind::Daily);
        let monthly = registry.categories_of_kind(CategoryKind::Monthly);
        let other = registry.categories_of_kind(CategoryKind::Other);
        let bucket = Bucket::Month(month);

        let (daily, monthly, other) = tokio::try_join!(
            self.sum_by_category(bucket, &daily),
            self.sum_by_category(bucket, &monthly),
            self.sum_by_category(bucket, &other),
        )?;

        let counts = calendar::count_weekdays_and_weekends(month);
        let monthly_daily_budget = self.model.monthly_daily_bucket_budget(month);
        let fixed_budget_total = self.model.fixed_budget_total();
        let total_budget_tracked = monthly_daily_budget + fixed_budget_total;
        let total_spent_tracked = daily.total + monthly.total;

        tracing::debug!(
            "monthly summary {month}: budget {total_budget_tracked}, spent {total_spent_tracked}"
        );

        Ok(MonthlySummary {
            year: month.year(),
            month: month.month(),
            weekday_count: counts.weekdays,
            weekend_count: counts.weekends,
            monthly_daily_budget,
            spent_daily: daily.total,
            spent_monthly: monthly.total,
            per_category_monthly: monthly.per_category,
            spent_other: other.total,
            per_category_other: other.per_category,
            fixed_budget_total,
            total_budget_tracked,
            total_spent_tracked,
            remaining_tracked: total_budget_tracked - total_spent_tracked,
        })
    }
}
