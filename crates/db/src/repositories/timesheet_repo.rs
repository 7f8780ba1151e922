//! Repository for the `timesheets` and `time_entries` tables.

use contractor_core::timesheet::{TimesheetStatus, TimesheetTransition};
use contractor_core::types::DbId;
use sqlx::{PgPool, Postgres};

use crate::models::timesheet::{
    CreateTimesheet, TimeEntry, TimeEntryInput, Timesheet, TimesheetExportRow, TimesheetFilter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, engagement_id, project_id, period_start, period_end, \
                       status, rejection_reason, submitted_at, approved_at, rejected_at, \
                       reviewed_by, created_by, created_at, updated_at";

/// Column list for `time_entries`.
const ENTRY_COLUMNS: &str =
    "id, timesheet_id, position, entry_date, hours, description, created_at, updated_at";

/// Provides persistence for timesheets and their entries.
pub struct TimesheetRepo;

impl TimesheetRepo {
    /// Insert a timesheet header and its entries in one transaction.
    ///
    /// The timesheet starts in `DRAFT`. `project_id` is copied from the engagement
    /// by the caller.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        project_id: DbId,
        created_by: DbId,
        input: &CreateTimesheet,
    ) -> Result<(Timesheet, Vec<TimeEntry>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO timesheets
                (organization_id, engagement_id, project_id, period_start, period_end, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let timesheet = sqlx::query_as::<_, Timesheet>(&query)
            .bind(organization_id)
            .bind(input.engagement_id)
            .bind(project_id)
            .bind(input.period_start)
            .bind(input.period_end)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let entries = insert_entries_inner(&mut tx, timesheet.id, &input.entries).await?;

        tx.commit().await?;
        Ok((timesheet, entries))
    }

    /// Find a timesheet by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Timesheet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM timesheets WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Timesheet>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Entries of a timesheet ordered by position.
    pub async fn entries_for(
        pool: &PgPool,
        timesheet_id: DbId,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries
             WHERE timesheet_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(timesheet_id)
            .fetch_all(pool)
            .await
    }

    /// List timesheets with optional engagement / project / status filters,
    /// most recent period first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        filter: &TimesheetFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Timesheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timesheets
             WHERE organization_id = $1
               AND ($2::BIGINT IS NULL OR engagement_id = $2)
               AND ($3::BIGINT IS NULL OR project_id = $3)
               AND ($4::TEXT IS NULL OR status = $4)
             ORDER BY period_start DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Timesheet>(&query)
            .bind(organization_id)
            .bind(filter.engagement_id)
            .bind(filter.project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace every entry of a draft timesheet.
    ///
    /// The header row is locked for the duration of the transaction. Returns
    /// `None` if the timesheet does not exist or is no longer `DRAFT`.
    pub async fn replace_entries(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        entries: &[TimeEntryInput],
    ) -> Result<Option<Vec<TimeEntry>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM timesheets
             WHERE id = $1 AND organization_id = $2 AND status = $3
             FOR UPDATE",
        )
        .bind(id)
        .bind(organization_id)
        .bind(TimesheetStatus::Draft.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM time_entries WHERE timesheet_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let inserted = insert_entries_inner(&mut tx, id, entries).await?;

        // Touch the header so updated_at reflects the edit.
        sqlx::query("UPDATE timesheets SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(inserted))
    }

    /// Persist a planned status transition.
    ///
    /// The update only applies while the row is still in `transition.from`; a
    /// submit additionally requires a dated entry with hours > 0 to exist.
    /// Returns `None` when the guard did not match (the row changed underneath
    /// or was never there).
    pub async fn apply_transition(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        transition: &TimesheetTransition,
        reviewer_id: Option<DbId>,
    ) -> Result<Option<Timesheet>, sqlx::Error> {
        let query = format!(
            "UPDATE timesheets SET
                status = $3,
                rejection_reason = COALESCE($4, rejection_reason),
                reviewed_by = COALESCE($5, reviewed_by),
                submitted_at = CASE WHEN $3 = 'SUBMITTED' THEN NOW() ELSE submitted_at END,
                approved_at = CASE WHEN $3 = 'APPROVED' THEN NOW() ELSE approved_at END,
                rejected_at = CASE WHEN $3 = 'REJECTED' THEN NOW() ELSE rejected_at END
             WHERE id = $1
               AND organization_id = $2
               AND status = $6
               AND ($3 <> 'SUBMITTED' OR EXISTS (
                    SELECT 1 FROM time_entries te
                     WHERE te.timesheet_id = timesheets.id
                       AND te.entry_date IS NOT NULL
                       AND te.hours > 0
               ))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Timesheet>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(transition.to.as_str())
            .bind(&transition.rejection_reason)
            .bind(reviewer_id)
            .bind(transition.from.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Flattened rows for CSV export, with derived hour totals.
    pub async fn export_rows(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<TimesheetExportRow>, sqlx::Error> {
        sqlx::query_as::<_, TimesheetExportRow>(
            "SELECT t.id,
                    p.code AS project_code,
                    c.first_name || ' ' || c.last_name AS contractor_name,
                    t.period_start,
                    t.period_end,
                    t.status,
                    COALESCE(
                        (SELECT SUM(te.hours) FROM time_entries te
                          WHERE te.timesheet_id = t.id AND te.entry_date IS NOT NULL),
                        0
                    ) AS total_hours,
                    t.submitted_at,
                    t.approved_at,
                    t.rejection_reason
             FROM timesheets t
             JOIN projects p ON p.id = t.project_id
             JOIN engagements e ON e.id = t.engagement_id
             JOIN contractors c ON c.id = e.contractor_id
             WHERE t.organization_id = $1
             ORDER BY t.period_start ASC, t.id ASC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }
}

/// Insert entries in order, assigning positions from 0.
async fn insert_entries_inner(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    timesheet_id: DbId,
    entries: &[TimeEntryInput],
) -> Result<Vec<TimeEntry>, sqlx::Error> {
    let query = format!(
        "INSERT INTO time_entries (timesheet_id, position, entry_date, hours, description)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {ENTRY_COLUMNS}"
    );
    let mut inserted = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        let row = sqlx::query_as::<_, TimeEntry>(&query)
            .bind(timesheet_id)
            .bind(position as i32)
            .bind(entry.date)
            .bind(entry.hours)
            .bind(&entry.description)
            .fetch_one(&mut **tx)
            .await?;
        inserted.push(row);
    }
    Ok(inserted)
}
