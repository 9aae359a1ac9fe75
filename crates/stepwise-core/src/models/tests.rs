#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::{
        display::{LocalDateTime, PlanSummaries, ReadySteps},
        models::{Plan, PlanId, PlanSummary, Step, StepStatus},
    };

    fn create_test_step(id: &str, status: StepStatus, dependencies: &[&str]) -> Step {
        let mut step = Step::new(id, format!("Description of {id}"), dependencies);
        step.status = status;
        if status == StepStatus::Completed {
            step.result = Some(format!("Step {id} completed"));
            step.attempts = 1;
        }
        step
    }

    fn create_test_plan() -> Plan {
        Plan {
            id: PlanId::from("7b0c2a4e-plan"),
            task: "Migrate the billing database".to_string(),
            steps: vec![
                create_test_step("backup", StepStatus::Completed, &[]),
                create_test_step("migrate", StepStatus::Failed, &["backup"]),
                create_test_step("verify", StepStatus::Pending, &["migrate"]),
            ],
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            updated_at: Timestamp::from_second(1641081600).unwrap(), // 2022-01-02 00:00:00 UTC
        }
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            StepStatus::Pending,
            StepStatus::Running,
            StepStatus::Completed,
            StepStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<StepStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!("COMPLETED".parse::<StepStatus>(), Ok(StepStatus::Completed));
        assert!("done".parse::<StepStatus>().is_err());
    }

    #[test]
    fn test_status_terminal_states() {
        assert!(!StepStatus::Pending.is_terminal());
        assert!(!StepStatus::Running.is_terminal());
        assert!(StepStatus::Completed.is_terminal());
        assert!(StepStatus::Failed.is_terminal());
        assert!(!StepStatus::Completed.can_transition_to(StepStatus::Running));
        assert!(!StepStatus::Failed.can_transition_to(StepStatus::Pending));
    }

    #[test]
    fn test_step_json_defaults() {
        let step: Step =
            serde_json::from_str(r#"{"id": "a", "description": "Do it"}"#).unwrap();
        assert_eq!(step, Step::new("a", "Do it", &[]));

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_plan_json_round_trip() {
        let plan = create_test_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
        assert!(json.contains(r#""id":"7b0c2a4e-plan""#));
    }

    #[test]
    fn test_plan_ids_are_unique() {
        let first = Plan::new("same task", Vec::new());
        let second = Plan::new("same task", Vec::new());
        assert_ne!(first.id, second.id);
        assert!(first.is_complete());
    }

    #[test]
    fn test_plan_progress_and_ids() {
        let plan = create_test_plan();
        assert_eq!(plan.progress(), (1, 3));
        assert!(!plan.is_complete());
        assert_eq!(plan.unfinished_ids(), ["migrate", "verify"]);
        assert_eq!(plan.failed_ids(), ["migrate"]);
        assert!(plan.step("verify").unwrap().depends_on("migrate"));
        assert!(plan.step("nope").is_none());
    }

    #[test]
    fn test_plan_resets() {
        let mut plan = create_test_plan();
        plan.step_mut("verify").unwrap().status = StepStatus::Running;

        assert_eq!(plan.reset_interrupted(), ["verify"]);
        assert_eq!(plan.step("verify").unwrap().status, StepStatus::Pending);
        assert_eq!(plan.step("migrate").unwrap().status, StepStatus::Failed);
        assert!(plan.updated_at > Timestamp::from_second(1641081600).unwrap());

        assert_eq!(plan.reset_failed(), ["migrate"]);
        let migrate = plan.step("migrate").unwrap();
        assert_eq!(migrate.status, StepStatus::Pending);
        assert_eq!(migrate.attempts, 0);

        assert!(plan.reset_failed().is_empty());
        assert_eq!(plan.step("backup").unwrap().status, StepStatus::Completed);
    }

    #[test]
    fn test_summary_counts() {
        let mut plan = create_test_plan();
        plan.steps
            .push(create_test_step("notify", StepStatus::Running, &["verify"]));

        let summary = PlanSummary::from(&plan);
        assert_eq!(summary.id, plan.id);
        assert_eq!(summary.total_steps, 4);
        assert_eq!(summary.completed_steps, 1);
        assert_eq!(summary.failed_steps, 1);
        assert_eq!(summary.pending_steps, 2);
    }

    #[test]
    fn test_plan_display() {
        let plan = create_test_plan();
        let output = plan.to_string();

        assert!(output.starts_with("# Plan 7b0c2a4e-plan\n"));
        assert!(output.contains("- Task: Migrate the billing database"));
        assert!(output.contains("- Progress: 1/3 completed"));
        assert!(output.contains("- Failed: migrate"));
        assert!(output.contains(&format!(
            "- Created: {}",
            LocalDateTime(&plan.created_at)
        )));
        assert!(output.contains("## Steps"));
        assert!(output.contains("### backup (✓ Completed)"));
        assert!(output.contains("### migrate (✗ Failed)"));
        assert!(output.contains("- Depends on: migrate"));
    }

    #[test]
    fn test_step_display_shows_result_only_when_completed() {
        let completed = create_test_step("backup", StepStatus::Completed, &[]);
        let output = completed.to_string();
        assert!(output.contains("#### Result"));
        assert!(output.contains("Step backup completed"));
        assert!(!output.contains("- Attempts"));

        let mut failed = create_test_step("migrate", StepStatus::Failed, &["backup"]);
        failed.attempts = 4;
        let output = failed.to_string();
        assert!(!output.contains("#### Result"));
        assert!(output.contains("- Attempts: 4"));
    }

    #[test]
    fn test_empty_plan_display() {
        let plan = Plan::new("Nothing", Vec::new());
        assert!(plan.to_string().contains("No steps in this plan."));
    }

    #[test]
    fn test_collection_display() {
        assert_eq!(PlanSummaries(Vec::new()).to_string(), "No plans found.\n");

        let plan = create_test_plan();
        let summaries = PlanSummaries(vec![PlanSummary::from(&plan)]);
        let output = summaries.to_string();
        assert!(output.contains("## 7b0c2a4e-plan (1/3)"));
        assert!(output.contains("- **Task**: Migrate the billing database"));
        assert!(output.contains("- **Failed steps**: 1"));

        assert_eq!(ReadySteps(Vec::new()).to_string(), "No steps are ready.\n");
        let ready = ReadySteps(vec![&plan.steps[2]]);
        assert_eq!(ready.len(), 1);
        assert!(ready
            .to_string()
            .contains("- **verify**: Description of verify"));
    }
}
