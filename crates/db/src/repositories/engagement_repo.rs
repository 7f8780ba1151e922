//! Repository for the `engagements` table.

use contractor_core::types::DbId;
use sqlx::PgPool;

use crate::models::engagement::{CreateEngagement, Engagement, UpdateEngagement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, contractor_id, project_id, contract_id, role_title, \
                       start_date, end_date, status, created_at, updated_at";

/// Provides CRUD operations for engagements.
pub struct EngagementRepo;

impl EngagementRepo {
    /// Insert a new engagement, returning the created row. Status starts `ACTIVE`.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateEngagement,
    ) -> Result<Engagement, sqlx::Error> {
        let query = format!(
            "INSERT INTO engagements
                (organization_id, contractor_id, project_id, contract_id, role_title,
                 start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Engagement>(&query)
            .bind(organization_id)
            .bind(input.contractor_id)
            .bind(input.project_id)
            .bind(input.contract_id)
            .bind(input.role_title.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find an engagement by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Engagement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM engagements WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Engagement>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List engagements with optional project / contractor filters.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        project_id: Option<DbId>,
        contractor_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Engagement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM engagements
             WHERE organization_id = $1
               AND ($2::BIGINT IS NULL OR project_id = $2)
               AND ($3::BIGINT IS NULL OR contractor_id = $3)
             ORDER BY start_date DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Engagement>(&query)
            .bind(organization_id)
            .bind(project_id)
            .bind(contractor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an engagement. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateEngagement,
    ) -> Result<Option<Engagement>, sqlx::Error> {
        let query = format!(
            "UPDATE engagements SET
                role_title = COALESCE($3, role_title),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Engagement>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.role_title.as_deref().map(str::trim))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }
}
