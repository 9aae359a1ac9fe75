use stepwise_core::{Id, LoadPlan, PlannerBuilder, PlannerError, ResumePlan, StepStatus};

mod common;

#[tokio::test]
async fn test_complete_plan_workflow() {
    let (_temp_dir, planner) = common::create_test_planner().await;
    let mut plan = common::diamond_plan();
    planner.save_plan(&plan).await.expect("Failed to save plan");

    let executor = common::RecordingExecutor::default();
    planner
        .execute_plan(&mut plan, &executor)
        .await
        .expect("Failed to execute plan");
    assert_eq!(executor.calls(), ["a", "b", "c", "d"]);

    let stored = planner
        .load_plan(&LoadPlan {
            id: plan.id.to_string(),
            verify: true,
        })
        .await
        .expect("Failed to load plan");
    assert_eq!(stored, plan);
    assert_eq!(
        stored.step("d").unwrap().result.as_deref(),
        Some("Step d completed")
    );

    let summaries = planner.list_plans().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].completed_steps, 4);

    planner
        .delete_plan(&Id {
            id: plan.id.to_string(),
        })
        .await
        .unwrap();
    assert!(planner.list_plans().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resume_in_a_new_planner() {
    let (temp_dir, planner) = common::create_test_planner().await;
    let mut plan = common::diamond_plan();
    planner.save_plan(&plan).await.unwrap();

    let broken = common::RecordingExecutor::failing(&["c"]);
    let err = planner.execute_plan(&mut plan, &broken).await.unwrap_err();
    assert!(matches!(err, PlannerError::StepExhausted { attempts: 2, .. }));
    drop(planner);

    // A fresh process picks the run up from the saved snapshot
    let planner = PlannerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .unwrap();
    let mut resumed = planner
        .load_plan(&LoadPlan {
            id: plan.id.to_string(),
            verify: false,
        })
        .await
        .unwrap();
    assert_eq!(resumed.step("a").unwrap().status, StepStatus::Completed);
    assert_eq!(resumed.step("b").unwrap().status, StepStatus::Completed);
    assert_eq!(resumed.step("c").unwrap().status, StepStatus::Failed);
    assert_eq!(resumed.step("c").unwrap().attempts, 2);

    planner
        .prepare_resume(&mut resumed, &ResumePlan { retry_failed: true })
        .await
        .unwrap();
    let fixed = common::RecordingExecutor::default();
    planner.execute_plan(&mut resumed, &fixed).await.unwrap();

    // Completed steps are never re-invoked
    assert_eq!(fixed.calls(), ["c", "d"]);
    assert!(resumed.is_complete());
}

#[tokio::test]
async fn test_snapshot_dir_selects_json_store() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let planner = PlannerBuilder::new()
        .with_snapshot_dir(Some(temp_dir.path()))
        .build()
        .await
        .unwrap();

    let mut plan = common::diamond_plan();
    planner
        .execute_plan(&mut plan, &common::RecordingExecutor::default())
        .await
        .unwrap();

    assert!(temp_dir.path().join(format!("{}.json", plan.id)).exists());
    assert!(!temp_dir.path().join("stepwise.db").exists());
}

#[tokio::test]
async fn test_missing_plan_is_reported() {
    let (_temp_dir, planner) = common::create_test_planner().await;

    let err = planner
        .load_plan(&LoadPlan {
            id: "no-such-plan".to_string(),
            verify: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::PlanNotFound { .. }));
    assert_eq!(err.to_string(), "Plan with ID no-such-plan not found");
}
