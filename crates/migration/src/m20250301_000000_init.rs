//! Initial schema.
//!
//! - `expenses`: append-only expense records, pre-bucketed by local day and
//!   local month
//! - `user_states`: one row per user with a conversation in progress

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    RecordedAt,
    LocalDate,
    LocalMonth,
    UserId,
    Category,
    AmountMinor,
}

#[derive(Iden)]
enum UserStates {
    Table,
    UserId,
    Step,
    PendingCategory,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ─────────────────────────────────────────────────────────────────────
        // Expenses
        // ─────────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Expenses::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::LocalDate).string().not_null())
                    .col(ColumnDef::new(Expenses::LocalMonth).string().not_null())
                    .col(ColumnDef::new(Expenses::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-local_date")
                    .table(Expenses::Table)
                    .col(Expenses::LocalDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-local_month")
                    .table(Expenses::Table)
                    .col(Expenses::LocalMonth)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-category")
                    .table(Expenses::Table)
                    .col(Expenses::Category)
                    .to_owned(),
            )
            .await?;

        // ─────────────────────────────────────────────────────────────────────
        // Conversation state
        // ─────────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(UserStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserStates::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserStates::Step).string().not_null())
                    .col(ColumnDef::new(UserStates::PendingCategory).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        Ok(())
    }
}
