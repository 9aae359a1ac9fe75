//! Plan snapshot queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Plan, PlanId, PlanSummary, Step, StepStatus},
};

const UPSERT_PLAN_SQL: &str = "INSERT INTO plans (id, task, created_at, updated_at) VALUES (?1, ?2, ?3, ?4) \
     ON CONFLICT(id) DO UPDATE SET task = excluded.task, created_at = excluded.created_at, updated_at = excluded.updated_at";
const DELETE_PLAN_STEPS_SQL: &str = "DELETE FROM steps WHERE plan_id = ?1";
const INSERT_STEP_SQL: &str = "INSERT INTO steps (plan_id, step_order, step_id, description, dependencies, status, result, attempts) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_PLAN_SQL: &str = "SELECT id, task, created_at, updated_at FROM plans WHERE id = ?1";
const SELECT_STEPS_BY_PLAN_SQL: &str = "SELECT step_id, description, dependencies, status, result, attempts FROM steps WHERE plan_id = ?1 ORDER BY step_order";
const SELECT_SUMMARIES_SQL: &str = "SELECT p.id, p.task, p.created_at, p.updated_at, \
     COUNT(s.step_id), \
     COALESCE(SUM(CASE WHEN s.status = 'completed' THEN 1 ELSE 0 END), 0), \
     COALESCE(SUM(CASE WHEN s.status = 'failed' THEN 1 ELSE 0 END), 0) \
     FROM plans p LEFT JOIN steps s ON s.plan_id = p.id GROUP BY p.id";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";

fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

fn timestamp_column(row: &Row, column: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(column)?
        .parse::<Timestamp>()
        .map_err(|e| conversion_error(column, e))
}

fn count_column(row: &Row, column: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(column)?;
    u32::try_from(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e))
    })
}

impl super::Database {
    /// Helper function to construct a Step from a database row
    fn build_step_from_row(row: &Row) -> rusqlite::Result<Step> {
        let status_str: String = row.get(3)?;
        let status = status_str.parse::<StepStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        let dependencies_json: String = row.get(2)?;
        let dependencies: Vec<String> =
            serde_json::from_str(&dependencies_json).map_err(|e| conversion_error(2, e))?;

        Ok(Step {
            id: row.get(0)?,
            description: row.get(1)?,
            dependencies,
            status,
            result: row.get(4)?,
            attempts: count_column(row, 5)?,
        })
    }

    /// Replaces the stored snapshot of `plan` in a single transaction.
    pub fn save_plan(&mut self, plan: &Plan) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            UPSERT_PLAN_SQL,
            params![
                plan.id.as_str(),
                &plan.task,
                plan.created_at.to_string(),
                plan.updated_at.to_string()
            ],
        )
        .db_context("Failed to upsert plan")?;

        tx.execute(DELETE_PLAN_STEPS_SQL, params![plan.id.as_str()])
            .db_context("Failed to clear previous steps")?;

        {
            let mut stmt = tx
                .prepare(INSERT_STEP_SQL)
                .db_context("Failed to prepare step insert")?;
            for (order, step) in plan.steps.iter().enumerate() {
                let dependencies = serde_json::to_string(&step.dependencies)?;
                stmt.execute(params![
                    plan.id.as_str(),
                    order as i64,
                    &step.id,
                    &step.description,
                    dependencies,
                    step.status.as_str(),
                    step.result.as_deref(),
                    i64::from(step.attempts)
                ])
                .db_context("Failed to insert step")?;
            }
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Loads a snapshot with its steps in declaration order.
    pub fn load_plan(&self, id: &PlanId) -> Result<Option<Plan>> {
        let plan = self
            .connection
            .query_row(SELECT_PLAN_SQL, params![id.as_str()], |row| {
                Ok(Plan {
                    id: PlanId::from(row.get::<_, String>(0)?),
                    task: row.get(1)?,
                    steps: Vec::new(),
                    created_at: timestamp_column(row, 2)?,
                    updated_at: timestamp_column(row, 3)?,
                })
            })
            .optional()
            .db_context("Failed to query plan")?;

        let Some(mut plan) = plan else {
            return Ok(None);
        };

        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_BY_PLAN_SQL)
            .db_context("Failed to prepare query")?;
        plan.steps = stmt
            .query_map(params![id.as_str()], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read steps")?;

        Ok(Some(plan))
    }

    /// Summaries of every stored plan, in no particular order.
    pub fn list_summaries(&self) -> Result<Vec<PlanSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUMMARIES_SQL)
            .db_context("Failed to prepare query")?;

        let summaries = stmt
            .query_map([], |row| {
                let total_steps = count_column(row, 4)?;
                let completed_steps = count_column(row, 5)?;
                let failed_steps = count_column(row, 6)?;
                Ok(PlanSummary {
                    id: PlanId::from(row.get::<_, String>(0)?),
                    task: row.get(1)?,
                    created_at: timestamp_column(row, 2)?,
                    updated_at: timestamp_column(row, 3)?,
                    total_steps,
                    completed_steps,
                    failed_steps,
                    pending_steps: total_steps.saturating_sub(completed_steps + failed_steps),
                })
            })
            .db_context("Failed to query plan summaries")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plan summaries")?;

        Ok(summaries)
    }

    /// Deletes a plan and, through the foreign key, its steps.
    pub fn delete_plan(&mut self, id: &PlanId) -> Result<()> {
        let deleted = self
            .connection
            .execute(DELETE_PLAN_SQL, params![id.as_str()])
            .db_context("Failed to delete plan")?;

        if deleted == 0 {
            return Err(PlannerError::PlanNotFound { id: id.clone() });
        }
        Ok(())
    }
}
