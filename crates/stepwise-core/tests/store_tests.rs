use rusqlite::Connection;
use stepwise_core::{
    Database, JsonFileStore, MemoryStore, Plan, PlanId, PlannerError, SnapshotStore, SqliteStore,
    Step, StepStatus,
};
use tempfile::{NamedTempFile, TempDir};

mod common;

/// A plan exercising every persisted field.
fn mixed_plan() -> Plan {
    let mut plan = common::diamond_plan();
    {
        let a = plan.step_mut("a").unwrap();
        a.status = StepStatus::Completed;
        a.result = Some("line one\nline \"two\"".to_string());
        a.attempts = 2;
    }
    plan.step_mut("b").unwrap().status = StepStatus::Failed;
    plan.step_mut("b").unwrap().attempts = 4;
    plan.step_mut("c").unwrap().status = StepStatus::Running;
    plan
}

async fn check_round_trip(store: &dyn SnapshotStore) {
    let plan = mixed_plan();
    store.save(&plan).await.expect("Failed to save plan");

    let loaded = store.load(&plan.id).await.expect("Failed to load plan");
    assert_eq!(loaded, plan);
    // Declaration order survives
    let ids: Vec<_> = loaded.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d"]);
}

async fn check_overwrite_and_delete(store: &dyn SnapshotStore) {
    let mut plan = common::diamond_plan();
    store.save(&plan).await.unwrap();

    plan.step_mut("a").unwrap().status = StepStatus::Completed;
    plan.step_mut("a").unwrap().result = Some("done".to_string());
    plan.steps.pop();
    store.save(&plan).await.unwrap();

    let loaded = store.load(&plan.id).await.unwrap();
    assert_eq!(loaded.steps.len(), 3);
    assert_eq!(loaded.step("a").unwrap().result.as_deref(), Some("done"));

    let summaries = store.list().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].completed_steps, 1);
    assert_eq!(summaries[0].total_steps, 3);

    store.delete(&plan.id).await.unwrap();
    assert!(matches!(
        store.load(&plan.id).await,
        Err(PlannerError::PlanNotFound { .. })
    ));
    assert!(matches!(
        store.delete(&plan.id).await,
        Err(PlannerError::PlanNotFound { .. })
    ));
    assert!(store.list().await.unwrap().is_empty());
}

async fn check_missing(store: &dyn SnapshotStore) {
    let id = PlanId::generate();
    match store.load(&id).await {
        Err(PlannerError::PlanNotFound { id: missing }) => assert_eq!(missing, id),
        other => panic!("Expected PlanNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_memory_store_contract() {
    let store = MemoryStore::new();
    check_round_trip(&store).await;
    check_overwrite_and_delete(&store).await;
    check_missing(&store).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("nested/dir/plans.db"))
        .await
        .expect("Failed to open store");
    assert!(store.path().exists());

    check_round_trip(&store).await;
    check_overwrite_and_delete(&store).await;
    check_missing(&store).await;
}

#[tokio::test]
async fn test_json_file_store_contract() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("snapshots")).unwrap();

    check_round_trip(&store).await;
    check_overwrite_and_delete(&store).await;
    check_missing(&store).await;
}

#[tokio::test]
async fn test_json_snapshots_are_plain_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path()).unwrap();
    let plan = mixed_plan();
    store.save(&plan).await.unwrap();

    let path = store.dir().join(format!("{}.json", plan.id));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["id"], plan.id.as_str());
    assert_eq!(json["steps"][0]["status"], "completed");
    assert_eq!(json["steps"][3]["dependencies"][1], "c");
    assert!(!store.dir().join(format!("{}.json.tmp", plan.id)).exists());

    // Unreadable files are skipped when listing
    std::fs::write(store.dir().join("garbage.json"), "not json").unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_json_store_rejects_unsafe_ids() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path()).unwrap();

    assert!(matches!(
        store.load(&PlanId::from("../etc/passwd")).await,
        Err(PlannerError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_sqlite_list_orders_by_last_update() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("plans.db"))
        .await
        .unwrap();

    let older = Plan::new("older", vec![Step::new("x", "x", &[])]);
    let mut newer = Plan::new("newer", Vec::new());
    newer.updated_at = older.updated_at + jiff::SignedDuration::from_secs(60);
    store.save(&older).await.unwrap();
    store.save(&newer).await.unwrap();

    let summaries = store.list().await.unwrap();
    assert_eq!(summaries[0].task, "newer");
    assert_eq!(summaries[0].total_steps, 0);
    assert_eq!(summaries[1].task, "older");
    assert_eq!(summaries[1].pending_steps, 1);
}

#[test]
fn test_database_cascades_step_rows() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let mut db = Database::new(temp_file.path()).expect("Failed to create test database");
    let plan = common::diamond_plan();
    db.save_plan(&plan).unwrap();
    db.delete_plan(&plan.id).unwrap();

    let connection = Connection::open(temp_file.path()).unwrap();
    let orphans: i64 = connection
        .query_row("SELECT COUNT(*) FROM steps", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_sqlite_rejects_out_of_range_attempts() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("plans.db"))
        .await
        .unwrap();
    let plan = common::diamond_plan();
    store.save(&plan).await.unwrap();

    for tampered in [-1_i64, i64::from(u32::MAX) + 1] {
        let connection = Connection::open(store.path()).unwrap();
        connection
            .execute(
                "UPDATE steps SET attempts = ?1 WHERE step_id = 'b'",
                [tampered],
            )
            .unwrap();

        assert!(matches!(
            store.load(&plan.id).await,
            Err(PlannerError::Database { .. })
        ));
    }
}

#[test]
fn test_migration_adds_attempts_column() {
    let temp_file = NamedTempFile::new().unwrap();
    {
        let connection = Connection::open(temp_file.path()).unwrap();
        connection
            .execute_batch(
                "CREATE TABLE plans (
                    id TEXT PRIMARY KEY NOT NULL,
                    task TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE TABLE steps (
                    plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
                    step_order INTEGER NOT NULL,
                    step_id TEXT NOT NULL,
                    description TEXT NOT NULL,
                    dependencies TEXT NOT NULL DEFAULT '[]',
                    status TEXT NOT NULL DEFAULT 'pending',
                    result TEXT,
                    PRIMARY KEY (plan_id, step_order)
                );
                INSERT INTO plans VALUES ('legacy', 'Old task', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z');
                INSERT INTO steps (plan_id, step_order, step_id, description, dependencies, status, result)
                    VALUES ('legacy', 0, 'a', 'Old step', '[]', 'completed', 'ok');",
            )
            .unwrap();
    }

    let db = Database::new(temp_file.path()).expect("Migration should succeed");
    let plan = db
        .load_plan(&PlanId::from("legacy"))
        .unwrap()
        .expect("Legacy plan should load");

    assert_eq!(plan.task, "Old task");
    let step = plan.step("a").unwrap();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.result.as_deref(), Some("ok"));
    assert_eq!(step.attempts, 0);
}
