//! Timesheet lifecycle: status machine, period rules and hour aggregation.
//!
//! ```text
//! DRAFT --submit--> SUBMITTED --approve--> APPROVED
//!                       |
//!                       +------reject----> REJECTED
//! ```
//!
//! APPROVED and REJECTED are terminal. There is no path back to DRAFT; a
//! rejected period is re-filed as a new timesheet.

use rust_decimal::Decimal;

use crate::error::{CoreError, FieldError};
use crate::types::{Amount, Date};
use crate::validation::DECIMAL_SCALE;

/// Upper bound on the hours recorded by a single entry.
pub const MAX_HOURS_PER_ENTRY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Maximum length of a rejection reason.
pub const MAX_REJECTION_REASON_LENGTH: usize = 2_000;

/// Maximum length of an entry description.
pub const MAX_ENTRY_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum number of entries on one timesheet.
pub const MAX_ENTRIES: usize = 366;

crate::define_status_enum! {
    /// Timesheet review status.
    TimesheetStatus {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

impl TimesheetStatus {
    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        match self {
            TimesheetStatus::Approved | TimesheetStatus::Rejected => true,
            TimesheetStatus::Draft | TimesheetStatus::Submitted => false,
        }
    }

    /// Entries may only be replaced while the timesheet is a draft.
    pub fn entries_editable(self) -> bool {
        self == TimesheetStatus::Draft
    }
}

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimesheetAction {
    Submit,
    Approve,
    Reject { reason: String },
}

impl TimesheetAction {
    pub fn name(&self) -> &'static str {
        match self {
            TimesheetAction::Submit => "submit",
            TimesheetAction::Approve => "approve",
            TimesheetAction::Reject { .. } => "reject",
        }
    }
}

/// The outcome of a permitted action, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetTransition {
    pub from: TimesheetStatus,
    pub to: TimesheetStatus,
    pub rejection_reason: Option<String>,
}

/// Target status for `action` taken from `from`, or a validation error.
///
/// Total over every (status, action) pair.
pub fn next_status(
    from: TimesheetStatus,
    action: &TimesheetAction,
) -> Result<TimesheetStatus, CoreError> {
    use TimesheetAction as A;
    use TimesheetStatus as S;

    match (from, action) {
        (S::Draft, A::Submit) => Ok(S::Submitted),
        (S::Submitted, A::Approve) => Ok(S::Approved),
        (S::Submitted, A::Reject { .. }) => Ok(S::Rejected),
        (S::Draft, A::Approve | A::Reject { .. })
        | (S::Submitted, A::Submit)
        | (S::Approved | S::Rejected, _) => Err(CoreError::Validation(format!(
            "Cannot {} a timesheet in status {from}",
            action.name()
        ))),
    }
}

/// A timesheet period. `end` is strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: Date,
    end: Date,
}

impl Period {
    pub fn new(start: Date, end: Date) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::InvalidFields(vec![FieldError::new(
                "period_end",
                format!("must be after period_start ({start})"),
            )]));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Read access to the parts of an entry the lifecycle rules look at.
pub trait EntryHours {
    fn entry_date(&self) -> Option<Date>;
    fn hours(&self) -> Amount;
}

impl EntryHours for (Option<Date>, Amount) {
    fn entry_date(&self) -> Option<Date> {
        self.0
    }

    fn hours(&self) -> Amount {
        self.1
    }
}

/// Sum of hours over entries that carry a date. Undated entries are ignored.
pub fn total_hours<E: EntryHours>(entries: &[E]) -> Amount {
    entries
        .iter()
        .filter(|e| e.entry_date().is_some())
        .map(EntryHours::hours)
        .sum()
}

/// Whether any entry is dated and records positive hours.
pub fn has_billable_entry<E: EntryHours>(entries: &[E]) -> bool {
    entries
        .iter()
        .any(|e| e.entry_date().is_some() && e.hours() > Decimal::ZERO)
}

/// Per-entry rules: hours within `[0, 24]` in hundredths, dates inside the period.
///
/// Reports every offending entry at once, keyed `entries[i].field`.
pub fn validate_entries<E: EntryHours>(period: &Period, entries: &[E]) -> Result<(), CoreError> {
    if entries.len() > MAX_ENTRIES {
        return Err(CoreError::InvalidFields(vec![FieldError::new(
            "entries",
            format!("at most {MAX_ENTRIES} entries are allowed"),
        )]));
    }

    let mut errors = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let hours = entry.hours();
        if hours < Decimal::ZERO || hours > MAX_HOURS_PER_ENTRY {
            errors.push(FieldError::new(
                format!("entries[{i}].hours"),
                format!("must be between 0 and {MAX_HOURS_PER_ENTRY}"),
            ));
        } else if hours.normalize().scale() > DECIMAL_SCALE {
            errors.push(FieldError::new(
                format!("entries[{i}].hours"),
                format!("must have at most {DECIMAL_SCALE} decimal places"),
            ));
        }
        if let Some(date) = entry.entry_date() {
            if !period.contains(date) {
                errors.push(FieldError::new(
                    format!("entries[{i}].date"),
                    format!(
                        "{date} is outside the period {} to {}",
                        period.start(),
                        period.end()
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(errors))
    }
}

/// Trim and bound a rejection reason. Blank reasons are refused.
pub fn validate_rejection_reason(reason: &str) -> Result<String, CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidFields(vec![FieldError::new(
            "reason",
            "a rejection reason is required",
        )]));
    }
    if trimmed.chars().count() > MAX_REJECTION_REASON_LENGTH {
        return Err(CoreError::InvalidFields(vec![FieldError::new(
            "reason",
            format!("must be at most {MAX_REJECTION_REASON_LENGTH} characters"),
        )]));
    }
    Ok(trimmed.to_string())
}

/// Check every guard for `action` and produce the transition to persist.
///
/// Submitting additionally requires a valid period and at least one dated
/// entry with positive hours.
pub fn plan_transition<E: EntryHours>(
    current: TimesheetStatus,
    period_start: Date,
    period_end: Date,
    entries: &[E],
    action: &TimesheetAction,
) -> Result<TimesheetTransition, CoreError> {
    let to = next_status(current, action)?;

    let rejection_reason = match action {
        TimesheetAction::Submit => {
            let period = Period::new(period_start, period_end)?;
            validate_entries(&period, entries)?;
            if !has_billable_entry(entries) {
                return Err(CoreError::Validation(
                    "Timesheet must have at least one dated entry with hours greater than 0 \
                     before it can be submitted"
                        .into(),
                ));
            }
            None
        }
        TimesheetAction::Approve => None,
        TimesheetAction::Reject { reason } => Some(validate_rejection_reason(reason)?),
    };

    Ok(TimesheetTransition {
        from: current,
        to,
        rejection_reason,
    })
}
