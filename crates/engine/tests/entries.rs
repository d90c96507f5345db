use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CreateExpenseCmd, CreateIncomeCmd, Engine, EngineError, EntryKind, EntryListFilter, Money,
    Recurrence, RecurrenceKind, SkipReason, UpdateEntryCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec!["alice".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn fixture_account(engine: &Engine, balance: i64) -> Uuid {
    engine
        .create_bank_account("alice", "Checking", Money::new(balance), None)
        .await
        .unwrap()
        .id
}

async fn fixture_source(engine: &Engine) -> Uuid {
    engine
        .create_income_source("alice", "Salary")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_income_returns_one_unsettled_occurrence() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let created = engine
        .create_income(CreateIncomeCmd::new(
            "alice",
            account_id,
            source_id,
            Money::new(5_000_00),
            date(2025, 1, 5),
        ))
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let entry = &created[0];
    assert!(!entry.settled);
    assert!(entry.payment_date.is_none());
    assert!(entry.recurring_group_id.is_none());
    assert_eq!(entry.amount, Money::new(5_000_00));
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let result = engine
        .create_income(CreateIncomeCmd::new(
            "alice",
            account_id,
            source_id,
            Money::ZERO,
            date(2025, 1, 5),
        ))
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn recurring_expense_materializes_with_month_end_clamping() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    // Day 31 clamps to Feb 28 and recovers to Mar 31 and Apr 30.
    let created = engine
        .create_expense(
            CreateExpenseCmd::new("alice", account_id, Money::new(100_00), date(2025, 1, 31))
                .recurrence(Recurrence {
                    kind: RecurrenceKind::SpecificDate,
                    day: Some(31),
                    until: Some(date(2025, 4, 30)),
                }),
        )
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = created.iter().map(|e| e.due_date).collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 1, 31),
            date(2025, 2, 28),
            date(2025, 3, 31),
            date(2025, 4, 30),
        ]
    );
    let group_id = created[0].recurring_group_id.unwrap();
    assert!(created.iter().all(|e| e.recurring_group_id == Some(group_id)));
    assert!(created.iter().all(|e| !e.settled));
}

#[tokio::test]
async fn open_ended_series_stops_at_horizon_and_extends() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let created = engine
        .create_income(
            CreateIncomeCmd::new(
                "alice",
                account_id,
                source_id,
                Money::new(3_000_00),
                date(2025, 1, 1),
            )
            .recurrence(Recurrence {
                kind: RecurrenceKind::StartOfMonth,
                day: None,
                until: None,
            }),
        )
        .await
        .unwrap();

    // Template plus twelve months ahead.
    assert_eq!(created.len(), 13);
    assert_eq!(created.last().unwrap().due_date, date(2026, 1, 1));

    let group_id = created[0].recurring_group_id.unwrap();
    let extended = engine
        .extend_series(EntryKind::Income, group_id, "alice", date(2026, 3, 1))
        .await
        .unwrap();
    assert_eq!(extended.len(), 2);
    assert_eq!(extended[0].due_date, date(2026, 2, 1));
    assert_eq!(extended[1].due_date, date(2026, 3, 1));
    assert!(extended.iter().all(|e| !e.settled));
}

#[tokio::test]
async fn settle_income_credits_account_exactly_once() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 1_000_00).await;
    let source_id = fixture_source(&engine).await;

    let created = engine
        .create_income(CreateIncomeCmd::new(
            "alice",
            account_id,
            source_id,
            Money::new(5_000_00),
            date(2025, 1, 5),
        ))
        .await
        .unwrap();
    let entry_id = created[0].id;

    let settled = engine
        .settle(EntryKind::Income, entry_id, "alice", date(2025, 1, 7))
        .await
        .unwrap();
    assert!(settled.settled);
    assert_eq!(settled.payment_date, Some(date(2025, 1, 7)));

    let account = engine.bank_account("alice", account_id).await.unwrap();
    assert_eq!(account.balance, Money::new(6_000_00));

    // The second attempt must not touch the balance again.
    let result = engine
        .settle(EntryKind::Income, entry_id, "alice", date(2025, 1, 8))
        .await;
    assert!(matches!(result, Err(EngineError::Conflict(_))));
    let account = engine.bank_account("alice", account_id).await.unwrap();
    assert_eq!(account.balance, Money::new(6_000_00));
}

#[tokio::test]
async fn settle_expense_debits_account() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 1_000_00).await;

    let created = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            account_id,
            Money::new(250_00),
            date(2025, 1, 10),
        ))
        .await
        .unwrap();

    engine
        .settle(EntryKind::Expense, created[0].id, "alice", date(2025, 1, 12))
        .await
        .unwrap();

    let account = engine.bank_account("alice", account_id).await.unwrap();
    assert_eq!(account.balance, Money::new(750_00));
}

#[tokio::test]
async fn cascade_update_is_forward_only_and_skips_settled() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    let created = engine
        .create_expense(
            CreateExpenseCmd::new("alice", account_id, Money::new(100_00), date(2025, 1, 15))
                .recurrence(Recurrence {
                    kind: RecurrenceKind::SpecificDate,
                    day: Some(15),
                    until: Some(date(2025, 3, 15)),
                }),
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 3);

    // Settle the middle occurrence; it must survive the cascade untouched.
    engine
        .settle(EntryKind::Expense, created[1].id, "alice", date(2025, 2, 15))
        .await
        .unwrap();

    let outcome = engine
        .update_entry(
            UpdateEntryCmd::new(EntryKind::Expense, created[0].id, "alice")
                .amount(Money::new(150_00))
                .apply_to_future(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.updated.len(), 2);
    assert!(outcome.updated.iter().all(|e| e.amount == Money::new(150_00)));
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].id, created[1].id);
    assert_eq!(outcome.skipped[0].reason, SkipReason::Settled);
    assert_eq!(outcome.removed, 0);

    let untouched = engine
        .entry(EntryKind::Expense, created[1].id, "alice")
        .await
        .unwrap();
    assert_eq!(untouched.amount, Money::new(100_00));
}

#[tokio::test]
async fn cascade_from_middle_leaves_earlier_occurrences_alone() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    let created = engine
        .create_expense(
            CreateExpenseCmd::new("alice", account_id, Money::new(100_00), date(2025, 1, 15))
                .recurrence(Recurrence {
                    kind: RecurrenceKind::SpecificDate,
                    day: Some(15),
                    until: Some(date(2025, 3, 15)),
                }),
        )
        .await
        .unwrap();

    let outcome = engine
        .update_entry(
            UpdateEntryCmd::new(EntryKind::Expense, created[1].id, "alice")
                .remarks("rent increase")
                .apply_to_future(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.updated.len(), 2);

    let first = engine
        .entry(EntryKind::Expense, created[0].id, "alice")
        .await
        .unwrap();
    assert!(first.remarks.is_none());
}

#[tokio::test]
async fn shrinking_recur_until_removes_trailing_unsettled() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let created = engine
        .create_income(
            CreateIncomeCmd::new(
                "alice",
                account_id,
                source_id,
                Money::new(3_000_00),
                date(2025, 1, 15),
            )
            .recurrence(Recurrence {
                kind: RecurrenceKind::SpecificDate,
                day: Some(15),
                until: Some(date(2025, 4, 15)),
            }),
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 4);

    let outcome = engine
        .update_entry(
            UpdateEntryCmd::new(EntryKind::Income, created[0].id, "alice")
                .recur_until(date(2025, 2, 15))
                .apply_to_future(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.updated.len(), 2);
    assert!(outcome
        .updated
        .iter()
        .all(|e| e.recurrence.unwrap().until == Some(date(2025, 2, 15))));

    let listing = engine
        .list_entries(EntryKind::Income, "alice", &EntryListFilter::default())
        .await
        .unwrap();
    assert_eq!(listing.meta.total, 2);
}

#[tokio::test]
async fn settled_entries_cannot_be_edited_or_deleted() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    let created = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            account_id,
            Money::new(100_00),
            date(2025, 1, 10),
        ))
        .await
        .unwrap();
    let entry_id = created[0].id;
    engine
        .settle(EntryKind::Expense, entry_id, "alice", date(2025, 1, 10))
        .await
        .unwrap();

    let edit = engine
        .update_entry(
            UpdateEntryCmd::new(EntryKind::Expense, entry_id, "alice")
                .amount(Money::new(200_00)),
        )
        .await;
    assert!(matches!(edit, Err(EngineError::Conflict(_))));

    let delete = engine
        .delete_entry(EntryKind::Expense, entry_id, "alice", false)
        .await;
    assert!(matches!(delete, Err(EngineError::Conflict(_))));
}

#[tokio::test]
async fn delete_with_apply_to_future_removes_unsettled_tail() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    let created = engine
        .create_expense(
            CreateExpenseCmd::new("alice", account_id, Money::new(100_00), date(2025, 1, 15))
                .recurrence(Recurrence {
                    kind: RecurrenceKind::SpecificDate,
                    day: Some(15),
                    until: Some(date(2025, 3, 15)),
                }),
        )
        .await
        .unwrap();

    let deleted = engine
        .delete_entry(EntryKind::Expense, created[1].id, "alice", true)
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let listing = engine
        .list_entries(EntryKind::Expense, "alice", &EntryListFilter::default())
        .await
        .unwrap();
    assert_eq!(listing.meta.total, 1);
    assert_eq!(listing.items[0].id, created[0].id);
}

#[tokio::test]
async fn single_delete_removes_only_the_target() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;

    let created = engine
        .create_expense(
            CreateExpenseCmd::new("alice", account_id, Money::new(100_00), date(2025, 1, 15))
                .recurrence(Recurrence {
                    kind: RecurrenceKind::SpecificDate,
                    day: Some(15),
                    until: Some(date(2025, 3, 15)),
                }),
        )
        .await
        .unwrap();

    let deleted = engine
        .delete_entry(EntryKind::Expense, created[1].id, "alice", false)
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let listing = engine
        .list_entries(EntryKind::Expense, "alice", &EntryListFilter::default())
        .await
        .unwrap();
    assert_eq!(listing.meta.total, 2);
}

#[tokio::test]
async fn expense_patch_rejects_income_source() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let created = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            account_id,
            Money::new(100_00),
            date(2025, 1, 10),
        ))
        .await
        .unwrap();

    let result = engine
        .update_entry(
            UpdateEntryCmd::new(EntryKind::Expense, created[0].id, "alice").source_id(source_id),
        )
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn listing_pages_and_filters_by_settlement() {
    let (engine, _db) = engine_with_db().await;
    let account_id = fixture_account(&engine, 0).await;
    let source_id = fixture_source(&engine).await;

    let mut ids = Vec::new();
    for day in 1..=3 {
        let created = engine
            .create_income(CreateIncomeCmd::new(
                "alice",
                account_id,
                source_id,
                Money::new(1_000_00),
                date(2025, 1, day),
            ))
            .await
            .unwrap();
        ids.push(created[0].id);
    }
    engine
        .settle(EntryKind::Income, ids[0], "alice", date(2025, 1, 1))
        .await
        .unwrap();

    let filter = EntryListFilter {
        per_page: 2,
        ..Default::default()
    };
    let first_page = engine
        .list_entries(EntryKind::Income, "alice", &filter)
        .await
        .unwrap();
    assert_eq!(first_page.items.len(), 2);
    assert_eq!(first_page.meta.total, 3);
    assert_eq!(first_page.meta.last_page, 2);
    assert_eq!(first_page.meta.from, Some(1));
    assert_eq!(first_page.meta.to, Some(2));

    let pending = engine
        .list_entries(
            EntryKind::Income,
            "alice",
            &EntryListFilter {
                settled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pending.meta.total, 2);
}

#[tokio::test]
async fn entries_are_scoped_to_their_owner() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec!["bob".into()],
    ))
    .await
    .unwrap();

    let account_id = fixture_account(&engine, 0).await;
    let created = engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            account_id,
            Money::new(100_00),
            date(2025, 1, 10),
        ))
        .await
        .unwrap();

    let result = engine
        .entry(EntryKind::Expense, created[0].id, "bob")
        .await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
}
