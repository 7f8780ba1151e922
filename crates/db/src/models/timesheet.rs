//! Timesheet and time entry models and DTOs.
//!
//! `total_hours` is never stored; [`TimesheetDetail`] recomputes it from the
//! entries every time it is built.

use contractor_core::csv::{opt_field, CsvRow};
use contractor_core::timesheet::{total_hours, EntryHours, TimesheetStatus};
use contractor_core::types::{Amount, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `timesheets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Timesheet {
    pub id: DbId,
    pub organization_id: DbId,
    pub engagement_id: DbId,
    pub project_id: DbId,
    pub period_start: Date,
    pub period_end: Date,
    #[sqlx(try_from = "String")]
    pub status: TimesheetStatus,
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub reviewed_by: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `time_entries` table. Ordered by `position`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntry {
    pub id: DbId,
    pub timesheet_id: DbId,
    pub position: i32,
    #[serde(rename = "date")]
    pub entry_date: Option<Date>,
    pub hours: Amount,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EntryHours for TimeEntry {
    fn entry_date(&self) -> Option<Date> {
        self.entry_date
    }

    fn hours(&self) -> Amount {
        self.hours
    }
}

/// A timesheet with its entries and derived hour total.
#[derive(Debug, Clone, Serialize)]
pub struct TimesheetDetail {
    #[serde(flatten)]
    pub timesheet: Timesheet,
    pub entries: Vec<TimeEntry>,
    pub total_hours: Amount,
}

impl TimesheetDetail {
    pub fn new(timesheet: Timesheet, entries: Vec<TimeEntry>) -> Self {
        let total_hours = total_hours(&entries);
        Self {
            timesheet,
            entries,
            total_hours,
        }
    }
}

/// One entry as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimeEntryInput {
    pub date: Option<Date>,
    pub hours: Amount,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl EntryHours for TimeEntryInput {
    fn entry_date(&self) -> Option<Date> {
        self.date
    }

    fn hours(&self) -> Amount {
        self.hours
    }
}

/// DTO for creating a new timesheet with its entries.
///
/// The project is taken from the engagement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimesheet {
    pub engagement_id: DbId,
    pub period_start: Date,
    pub period_end: Date,
    #[serde(default)]
    #[validate(nested)]
    pub entries: Vec<TimeEntryInput>,
}

/// DTO replacing every entry of a draft timesheet.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceEntries {
    #[validate(nested)]
    pub entries: Vec<TimeEntryInput>,
}

/// Request body for rejecting a submitted timesheet.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectTimesheet {
    #[serde(default)]
    pub reason: String,
}

/// Optional filters for listing timesheets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimesheetFilter {
    pub engagement_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub status: Option<TimesheetStatus>,
}

/// Flattened timesheet row for CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct TimesheetExportRow {
    pub id: DbId,
    pub project_code: String,
    pub contractor_name: String,
    pub period_start: Date,
    pub period_end: Date,
    #[sqlx(try_from = "String")]
    pub status: TimesheetStatus,
    pub total_hours: Amount,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
}

impl CsvRow for TimesheetExportRow {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "project_code",
            "contractor",
            "period_start",
            "period_end",
            "status",
            "total_hours",
            "submitted_at",
            "approved_at",
            "rejection_reason",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.project_code.clone(),
            self.contractor_name.clone(),
            self.period_start.to_string(),
            self.period_end.to_string(),
            self.status.to_string(),
            self.total_hours.to_string(),
            self.submitted_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            self.approved_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            opt_field(&self.rejection_reason),
        ]
    }
}
