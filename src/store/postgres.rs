//! Postgres-backed implementation of [`SurveyStore`].
//!
//! # Schema
//! `surveys` and `options` (see `migrations/`). `options.survey_id` references
//! `surveys.id` with `ON DELETE CASCADE`, so deleting a survey removes its
//! options in the same statement and no orphan option can exist.
//!
//! # Vote atomicity
//! Votes are a single `UPDATE ... SET votes = votes + 1` statement. Postgres
//! takes a row lock for the update, so concurrent votes on one option queue
//! behind each other and each one sees the previous increment. There is no
//! read-then-write round trip that could lose a vote.
use super::{StoreError, StoreResult, SurveyStore};
use crate::config::PostgresConfig;
use crate::db;
use crate::models::{NewOption, NewSurvey, OptionPatch, Survey, SurveyOption};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

const OPTION_COLUMNS: &str = "id, survey_id, description, position, votes";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect, run migrations and return a ready store.
    pub async fn connect(config: &PostgresConfig) -> StoreResult<Self> {
        let pool = db::create_pool(config)
            .await
            .context("connect postgres pool")?;
        db::run_migrations(&pool)
            .await
            .context("run postgres migrations")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SurveyStore for PostgresStore {
    async fn list_surveys(&self) -> StoreResult<Vec<Survey>> {
        let rows =
            sqlx::query_as::<_, Survey>("SELECT id, name, description FROM surveys ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn create_survey(&self, survey: NewSurvey) -> StoreResult<Survey> {
        let row = sqlx::query_as::<_, Survey>(
            "INSERT INTO surveys (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&survey.name)
        .bind(&survey.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_survey(&self, id: i64) -> StoreResult<Survey> {
        let row =
            sqlx::query_as::<_, Survey>("SELECT id, name, description FROM surveys WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| StoreError::NotFound("survey".into()))
    }

    async fn update_survey(&self, id: i64, survey: NewSurvey) -> StoreResult<Survey> {
        let row = sqlx::query_as::<_, Survey>(
            r#"UPDATE surveys SET name = $2, description = $3
               WHERE id = $1
               RETURNING id, name, description"#,
        )
        .bind(id)
        .bind(&survey.name)
        .bind(&survey.description)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| StoreError::NotFound("survey".into()))
    }

    async fn delete_survey(&self, id: i64) -> StoreResult<()> {
        // Options go with the survey through the foreign key cascade.
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("survey".into()));
        }
        Ok(())
    }

    async fn list_all_options(&self) -> StoreResult<Vec<SurveyOption>> {
        let rows = sqlx::query_as::<_, SurveyOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM options ORDER BY survey_id, position, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_option(&self, option: NewOption) -> StoreResult<SurveyOption> {
        let result = sqlx::query_as::<_, SurveyOption>(&format!(
            r#"INSERT INTO options (survey_id, description, position)
               VALUES ($1, $2, $3)
               RETURNING {OPTION_COLUMNS}"#
        ))
        .bind(option.survey_id)
        .bind(&option.description)
        .bind(option.position)
        .fetch_one(&self.pool)
        .await;
        match result {
            Ok(row) => Ok(row),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(StoreError::InvalidReference("survey".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_option(&self, id: i64) -> StoreResult<SurveyOption> {
        let row = sqlx::query_as::<_, SurveyOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM options WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| StoreError::NotFound("option".into()))
    }

    async fn update_option(&self, id: i64, patch: OptionPatch) -> StoreResult<SurveyOption> {
        // NULL parameters keep the stored value.
        let row = sqlx::query_as::<_, SurveyOption>(&format!(
            r#"UPDATE options
               SET description = COALESCE($2, description),
                   position = COALESCE($3, position)
               WHERE id = $1
               RETURNING {OPTION_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.description)
        .bind(patch.position)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| StoreError::NotFound("option".into()))
    }

    async fn delete_option(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM options WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("option".into()));
        }
        Ok(())
    }

    async fn vote(&self, option_id: i64) -> StoreResult<i64> {
        let votes: Option<i64> = sqlx::query_scalar(
            "UPDATE options SET votes = votes + 1 WHERE id = $1 RETURNING votes",
        )
        .bind(option_id)
        .fetch_optional(&self.pool)
        .await?;
        votes.ok_or_else(|| StoreError::NotFound("option".into()))
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
