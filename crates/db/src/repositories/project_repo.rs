//! Repository for the `projects` table, including derived spend.

use contractor_core::budget::SpendBreakdown;
use contractor_core::types::{Amount, DbId};
use contractor_core::validation::DEFAULT_CURRENCY;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, name, code, description, budget, currency, \
                       start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// A duplicate code within the organization violates `uq_projects_org_code`.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (organization_id, name, code, description, budget, currency, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(organization_id)
            .bind(input.name.trim())
            .bind(input.code.trim())
            .bind(&input.description)
            .bind(input.budget.unwrap_or(Decimal::ZERO))
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List projects ordered by code.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE organization_id = $1
             ORDER BY code ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(organization_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                budget = COALESCE($5, budget),
                currency = COALESCE($6, currency),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.budget)
            .bind(&input.currency)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Derive a project's spend from its invoices and approved timesheets.
    ///
    /// - invoiced: `total_amount` of every non-`DRAFT` invoice on the project
    /// - uninvoiced timesheets: hours x contract rate over `APPROVED` timesheets
    ///   that no non-`DRAFT` invoice references; undated entries are ignored
    pub async fn spend_breakdown(
        pool: &PgPool,
        organization_id: DbId,
        project_id: DbId,
    ) -> Result<SpendBreakdown, sqlx::Error> {
        let (invoiced, uninvoiced_timesheets): (Amount, Amount) = sqlx::query_as(
            "SELECT
                (SELECT COALESCE(SUM(i.total_amount), 0)
                   FROM invoices i
                  WHERE i.organization_id = $1
                    AND i.project_id = $2
                    AND i.status <> 'DRAFT'),
                (SELECT COALESCE(SUM(te.hours * c.rate), 0)
                   FROM timesheets t
                   JOIN engagements e ON e.id = t.engagement_id
                   JOIN contracts c ON c.id = e.contract_id
                   JOIN time_entries te ON te.timesheet_id = t.id
                  WHERE t.organization_id = $1
                    AND t.project_id = $2
                    AND t.status = 'APPROVED'
                    AND te.entry_date IS NOT NULL
                    AND NOT EXISTS (
                        SELECT 1 FROM invoices i
                         WHERE i.timesheet_id = t.id AND i.status <> 'DRAFT'
                    ))",
        )
        .bind(organization_id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(SpendBreakdown {
            invoiced,
            uninvoiced_timesheets,
        })
    }
}
