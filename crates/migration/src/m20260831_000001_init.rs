//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: account owners (the engine only reads the username)
//! - `bank_accounts`: balances, the target of settlements
//! - `categories`: expense classification
//! - `income_sources`: where incomes come from
//! - `incomes`: credit entries, optionally recurring
//! - `expenses`: debit entries, optionally recurring

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    Name,
    BalanceMinor,
    AccountNumber,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Description,
}

#[derive(Iden)]
enum IncomeSources {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    UserId,
    BankAccountId,
    SourceId,
    AmountMinor,
    Remarks,
    DueDate,
    PaymentDate,
    Settled,
    IsRecurring,
    RecurringKind,
    RecurringDay,
    RecurUntil,
    RecurringGroupId,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    BankAccountId,
    CategoryId,
    AmountMinor,
    Remarks,
    DueDate,
    PaymentDate,
    Settled,
    IsRecurring,
    RecurringKind,
    RecurringDay,
    RecurUntil,
    RecurringGroupId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Bank accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccounts::UserId).string().not_null())
                    .col(ColumnDef::new(BankAccounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(BankAccounts::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankAccounts::AccountNumber).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_accounts-user_id")
                            .from(BankAccounts::Table, BankAccounts::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_accounts-user_id-name-unique")
                    .table(BankAccounts::Table)
                    .col(BankAccounts::UserId)
                    .col(BankAccounts::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Income sources
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(IncomeSources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncomeSources::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncomeSources::UserId).string().not_null())
                    .col(ColumnDef::new(IncomeSources::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-income_sources-user_id")
                            .from(IncomeSources::Table, IncomeSources::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income_sources-user_id-name-unique")
                    .table(IncomeSources::Table)
                    .col(IncomeSources::UserId)
                    .col(IncomeSources::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Incomes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Incomes::UserId).string().not_null())
                    .col(ColumnDef::new(Incomes::BankAccountId).uuid().not_null())
                    .col(ColumnDef::new(Incomes::SourceId).uuid().not_null())
                    .col(
                        ColumnDef::new(Incomes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::Remarks).string())
                    .col(ColumnDef::new(Incomes::DueDate).date().not_null())
                    .col(ColumnDef::new(Incomes::PaymentDate).date())
                    .col(ColumnDef::new(Incomes::Settled).boolean().not_null())
                    .col(ColumnDef::new(Incomes::IsRecurring).boolean().not_null())
                    .col(ColumnDef::new(Incomes::RecurringKind).string())
                    .col(ColumnDef::new(Incomes::RecurringDay).integer())
                    .col(ColumnDef::new(Incomes::RecurUntil).date())
                    .col(ColumnDef::new(Incomes::RecurringGroupId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-user_id")
                            .from(Incomes::Table, Incomes::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-bank_account_id")
                            .from(Incomes::Table, Incomes::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-source_id")
                            .from(Incomes::Table, Incomes::SourceId)
                            .to(IncomeSources::Table, IncomeSources::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-user_id-due_date")
                    .table(Incomes::Table)
                    .col(Incomes::UserId)
                    .col(Incomes::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-recurring_group_id")
                    .table(Incomes::Table)
                    .col(Incomes::RecurringGroupId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::BankAccountId).uuid().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).uuid())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Remarks).string())
                    .col(ColumnDef::new(Expenses::DueDate).date().not_null())
                    .col(ColumnDef::new(Expenses::PaymentDate).date())
                    .col(ColumnDef::new(Expenses::Settled).boolean().not_null())
                    .col(ColumnDef::new(Expenses::IsRecurring).boolean().not_null())
                    .col(ColumnDef::new(Expenses::RecurringKind).string())
                    .col(ColumnDef::new(Expenses::RecurringDay).integer())
                    .col(ColumnDef::new(Expenses::RecurUntil).date())
                    .col(ColumnDef::new(Expenses::RecurringGroupId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-user_id")
                            .from(Expenses::Table, Expenses::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-bank_account_id")
                            .from(Expenses::Table, Expenses::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-user_id-due_date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-recurring_group_id")
                    .table(Expenses::Table)
                    .col(Expenses::RecurringGroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeSources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
