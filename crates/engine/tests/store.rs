use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{CreateExpenseCmd, CreateIncomeCmd, Engine, EngineError, Money};
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

#[tokio::test]
async fn bank_account_crud_roundtrip() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .create_bank_account("alice", "  Checking ", Money::new(100_00), Some("IT60X054"))
        .await
        .unwrap();
    assert_eq!(account.name, "Checking");

    let updated = engine
        .update_bank_account("alice", account.id, "Main", Money::new(250_00), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Main");
    assert_eq!(updated.balance, Money::new(250_00));
    assert!(updated.account_number.is_none());

    engine.delete_bank_account("alice", account.id).await.unwrap();
    let result = engine.bank_account("alice", account.id).await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let result = engine
        .create_bank_account("alice", "   ", Money::ZERO, None)
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
    let result = engine.create_category("alice", "", None).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn referenced_account_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .create_bank_account("alice", "Checking", Money::ZERO, None)
        .await
        .unwrap();
    engine
        .create_expense(CreateExpenseCmd::new(
            "alice",
            account.id,
            Money::new(10_00),
            date(2025, 1, 1),
        ))
        .await
        .unwrap();

    let result = engine.delete_bank_account("alice", account.id).await;
    assert_eq!(result, Err(EngineError::InUse("Checking".to_string())));
}

#[tokio::test]
async fn referenced_category_and_source_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .create_bank_account("alice", "Checking", Money::ZERO, None)
        .await
        .unwrap();
    let category = engine
        .create_category("alice", "Rent", Some("housing"))
        .await
        .unwrap();
    let source = engine
        .create_income_source("alice", "Salary")
        .await
        .unwrap();

    engine
        .create_expense(
            CreateExpenseCmd::new("alice", account.id, Money::new(10_00), date(2025, 1, 1))
                .category_id(category.id),
        )
        .await
        .unwrap();
    engine
        .create_income(CreateIncomeCmd::new(
            "alice",
            account.id,
            source.id,
            Money::new(10_00),
            date(2025, 1, 1),
        ))
        .await
        .unwrap();

    let result = engine.delete_category("alice", category.id).await;
    assert_eq!(result, Err(EngineError::InUse("Rent".to_string())));
    let result = engine.delete_income_source("alice", source.id).await;
    assert_eq!(result, Err(EngineError::InUse("Salary".to_string())));
}

#[tokio::test]
async fn unreferenced_lookups_delete_cleanly() {
    let (engine, _db) = engine_with_db().await;

    let category = engine
        .create_category("alice", "Travel", None)
        .await
        .unwrap();
    let source = engine
        .create_income_source("alice", "Dividends")
        .await
        .unwrap();

    engine.delete_category("alice", category.id).await.unwrap();
    engine.delete_income_source("alice", source.id).await.unwrap();
}

#[tokio::test]
async fn list_filters_by_name_substring() {
    let (engine, _db) = engine_with_db().await;

    for name in ["Checking", "Savings", "Shared checking"] {
        engine
            .create_bank_account("alice", name, Money::ZERO, None)
            .await
            .unwrap();
    }

    let page = engine
        .list_bank_accounts("alice", 1, 10, Some("hecking"))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 2);

    let all = engine.list_bank_accounts("alice", 1, 10, None).await.unwrap();
    assert_eq!(all.meta.total, 3);
    // Ordered by name.
    assert_eq!(all.items[0].name, "Checking");
}

#[tokio::test]
async fn lookups_are_scoped_to_their_owner() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec!["bob".into()],
    ))
    .await
    .unwrap();

    let account = engine
        .create_bank_account("alice", "Checking", Money::ZERO, None)
        .await
        .unwrap();

    let result = engine.bank_account("bob", account.id).await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
    let page = engine.list_bank_accounts("bob", 1, 10, None).await.unwrap();
    assert_eq!(page.meta.total, 0);
}
