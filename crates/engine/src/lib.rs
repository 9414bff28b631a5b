//! Budget aggregation and conversation engine.
//!
//! The [`Engine`] combines the static [`BudgetModel`] with a [`Storage`]
//! collaborator and a [`Clock`]. It is cheap to share behind an `Arc` and holds
//! no mutable state of its own.

use std::sync::Arc;

use chrono::NaiveDate;

pub use aggregation::{CategorySums, DailySummary, MonthlySummary};
pub use budget::{BudgetConfig, BudgetModel};
pub use calendar::{DayKind, MonthDayCounts, YearMonth};
pub use categories::{Category, CategoryKind, CategoryRegistry};
pub use clock::{Clock, FixedClock, SystemClock};
pub use conversation::{Command, ConversationState, Input, Reply};
pub use error::EngineError;
pub use expenses::{Expense, UserId};
pub use money::Amount;
pub use storage::{Bucket, CategoryTotal, SeaOrmStorage, Storage};

mod aggregation;
mod budget;
pub mod calendar;
mod categories;
mod clock;
pub mod conversation;
mod error;
mod expenses;
mod money;
mod storage;
mod user_states;

type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    model: BudgetModel,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn model(&self) -> &BudgetModel {
        &self.model
    }

    /// Current local date in the configured timezone.
    pub fn today(&self) -> ResultEngine<NaiveDate> {
        calendar::resolve_local_date(self.clock.now(), self.model.timezone())
    }

    /// Validate and append a new expense.
    ///
    /// `date` overrides the local date bucket (strict `YYYY-MM-DD`); the
    /// recording instant is always "now". Validation happens before anything
    /// is written.
    pub async fn record_expense(
        &self,
        user_id: UserId,
        category: &str,
        amount: Amount,
        date: Option<&str>,
    ) -> ResultEngine<Expense> {
        self.model.registry().kind_of(category)?;
        let local_date = match date {
            Some(raw) => calendar::parse_date(raw)?,
            None => self.today()?,
        };

        let expense = Expense::new(
            user_id,
            category.to_string(),
            amount,
            self.clock.now(),
            local_date,
        );
        self.storage.insert_expense(&expense).await?;

        tracing::info!(
            "recorded expense {} for user {user_id}: {category} {amount} on {local_date}",
            expense.id
        );
        Ok(expense)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    model: Option<BudgetModel>,
    storage: Option<Arc<dyn Storage>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Pass the required budget model
    pub fn model(mut self, model: BudgetModel) -> EngineBuilder {
        self.model = Some(model);
        self
    }

    /// Use a sea-orm database as storage
    pub fn database(self, db: sea_orm::DatabaseConnection) -> EngineBuilder {
        self.storage(SeaOrmStorage::new(db))
    }

    pub fn storage(mut self, storage: impl Storage + 'static) -> EngineBuilder {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Override the system clock
    pub fn clock(mut self, clock: impl Clock + 'static) -> EngineBuilder {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let model = self
            .model
            .ok_or_else(|| EngineError::InvalidConfig("missing budget model".to_string()))?;
        let storage = self
            .storage
            .ok_or_else(|| EngineError::InvalidConfig("missing storage".to_string()))?;
        Ok(Engine {
            model,
            storage,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
