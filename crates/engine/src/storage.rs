//! # Storage
//!
//! The engine never keeps expenses or conversation state in memory between
//! calls: everything goes through a [`Storage`] implementation. The default
//! one, [`SeaOrmStorage`], is backed by a sea-orm connection.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, QueryFilter, QuerySelect, prelude::*,
    sea_query::OnConflict,
};
use serde::Serialize;

use crate::{
    Amount, ResultEngine,
    calendar::{self, YearMonth},
    conversation::ConversationState,
    expenses::{self, Expense, UserId},
    user_states,
};

/// Time grouping key used by aggregations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    Day(NaiveDate),
    Month(YearMonth),
}

impl Bucket {
    /// Value stored in the matching `expenses` column.
    pub fn key(&self) -> String {
        match self {
            Self::Day(date) => calendar::date_key(*date),
            Self::Month(month) => month.key(),
        }
    }
}

/// Summed amount of one category inside a bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
}

/// Interface of the storage collaborator.
///
/// Implementations must be safe to share between concurrently handled
/// requests; the engine itself takes no locks.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Append a new expense.
    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()>;

    /// Sum of amounts in `bucket` for each of `categories`, grouped by
    /// category. Categories without rows are absent from the result.
    async fn sum_by_category(
        &self,
        bucket: Bucket,
        categories: &[String],
    ) -> ResultEngine<Vec<CategoryTotal>>;

    async fn get_user_state(&self, user_id: UserId) -> ResultEngine<Option<ConversationState>>;

    /// Insert or overwrite the state row of `user_id`.
    async fn set_user_state(
        &self,
        user_id: UserId,
        state: &ConversationState,
    ) -> ResultEngine<()>;

    async fn clear_user_state(&self, user_id: UserId) -> ResultEngine<()>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmStorage {
    database: DatabaseConnection,
}

impl SeaOrmStorage {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn sum_by_category(
        &self,
        bucket: Bucket,
        categories: &[String],
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let bucket_column = match bucket {
            Bucket::Day(_) => expenses::Column::LocalDate,
            Bucket::Month(_) => expenses::Column::LocalMonth,
        };

        let rows: Vec<(String, i64)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(expenses::Column::AmountMinor.sum(), "total")
            .filter(bucket_column.eq(bucket.key()))
            .filter(expenses::Column::Category.is_in(categories.iter().cloned()))
            .group_by(expenses::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category,
                total: Amount::new(total),
            })
            .collect())
    }

    async fn get_user_state(&self, user_id: UserId) -> ResultEngine<Option<ConversationState>> {
        let row = user_states::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?;
        Ok(row.map(ConversationState::from))
    }

    async fn set_user_state(
        &self,
        user_id: UserId,
        state: &ConversationState,
    ) -> ResultEngine<()> {
        user_states::Entity::insert(user_states::ActiveModel::from_state(user_id, state))
            .on_conflict(
                OnConflict::column(user_states::Column::UserId)
                    .update_columns([
                        user_states::Column::Step,
                        user_states::Column::PendingCategory,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn clear_user_state(&self, user_id: UserId) -> ResultEngine<()> {
        user_states::Entity::delete_by_id(user_id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
