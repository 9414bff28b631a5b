//! Static budget model: category registry, budget amounts and the local
//! timezone, built once at startup and shared read-only afterwards.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    Amount, CategoryKind, CategoryRegistry, EngineError, ResultEngine,
    calendar::{DayKind, YearMonth, classify_day, count_weekdays_and_weekends},
};

const MAX_DAYS_IN_MONTH: u32 = 31;

/// Budget amounts as read from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BudgetConfig {
    pub weekday_budget: Amount,
    pub weekend_budget: Amount,
    #[serde(default)]
    pub monthly_budgets: BTreeMap<String, Amount>,
}

#[derive(Clone, Debug)]
pub struct BudgetModel {
    registry: CategoryRegistry,
    budgets: BudgetConfig,
    timezone: String,
}

impl BudgetModel {
    /// Validates and assembles the model.
    ///
    /// An unknown timezone is fatal, and so are budgets whose monthly totals
    /// would not fit in an [`Amount`]. A `monthly` category without a budget, or
    /// a budget for a category that is not `monthly`, is only reported: the
    /// former counts as 0, the latter is ignored.
    pub fn new(
        registry: CategoryRegistry,
        budgets: BudgetConfig,
        timezone: impl Into<String>,
    ) -> ResultEngine<Self> {
        let timezone = timezone.into();
        if timezone.parse::<Tz>().is_err() {
            return Err(EngineError::InvalidConfig(format!(
                "unknown timezone \"{timezone}\""
            )));
        }

        for name in registry.categories_of_kind(CategoryKind::Monthly) {
            if !budgets.monthly_budgets.contains_key(&name) {
                tracing::warn!("monthly category \"{name}\" has no budget, counting it as 0");
            }
        }
        for name in budgets.monthly_budgets.keys() {
            match registry.kind_of(name) {
                Ok(CategoryKind::Monthly) => {}
                Ok(kind) => tracing::warn!(
                    "budget for \"{name}\" ignored: category kind is {kind}, not monthly"
                ),
                Err(_) => tracing::warn!("budget for \"{name}\" ignored: unknown category"),
            }
        }

        let model = Self {
            registry,
            budgets,
            timezone,
        };
        model.check_month_totals()?;
        Ok(model)
    }

    /// Monthly totals use plain arithmetic; a 31-day month of either day kind
    /// plus every fixed cap has to fit.
    fn check_month_totals(&self) -> ResultEngine<()> {
        let too_large = || EngineError::InvalidConfig("budget amounts are too large".to_string());

        let mut fixed = Amount::ZERO;
        for name in self.registry.categories_of_kind(CategoryKind::Monthly) {
            let budget = self.monthly_budget_for(&name).unwrap_or(Amount::ZERO);
            fixed = fixed.checked_add(budget).ok_or_else(too_large)?;
        }

        let widest = |amount: Amount| amount.checked_mul(MAX_DAYS_IN_MONTH);
        let weekday = widest(self.budgets.weekday_budget).ok_or_else(too_large)?;
        let weekend = widest(self.budgets.weekend_budget).ok_or_else(too_large)?;
        weekday
            .checked_add(weekend)
            .and_then(|pool| pool.checked_add(fixed))
            .ok_or_else(too_large)?;
        Ok(())
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn weekday_budget(&self) -> Amount {
        self.budgets.weekday_budget
    }

    pub fn weekend_budget(&self) -> Amount {
        self.budgets.weekend_budget
    }

    pub fn daily_budget_for(&self, date: NaiveDate) -> Amount {
        match classify_day(date) {
            DayKind::Weekday => self.budgets.weekday_budget,
            DayKind::Weekend => self.budgets.weekend_budget,
        }
    }

    /// Budget of the shared daily pool over a whole month.
    pub fn monthly_daily_bucket_budget(&self, month: YearMonth) -> Amount {
        let counts = count_weekdays_and_weekends(month);
        self.budgets.weekday_budget * counts.weekdays + self.budgets.weekend_budget * counts.weekends
    }

    /// Budget of a `monthly` category; `None` for any other kind.
    pub fn monthly_budget_for(&self, name: &str) -> Option<Amount> {
        match self.registry.kind_of(name) {
            Ok(CategoryKind::Monthly) => Some(
                self.budgets
                    .monthly_budgets
                    .get(name)
                    .copied()
                    .unwrap_or(Amount::ZERO),
            ),
            _ => None,
        }
    }

    /// Sum of all monthly caps, whether or not the categories saw any spend.
    pub fn fixed_budget_total(&self) -> Amount {
        self.registry
            .categories_of_kind(CategoryKind::Monthly)
            .iter()
            .filter_map(|name| self.monthly_budget_for(name))
            .sum()
    }
}
