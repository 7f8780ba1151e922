//! Contract and engagement statuses.

use crate::error::CoreError;

crate::define_status_enum! {
    /// Contract status. Set directly through updates; no guarded transitions.
    ContractStatus {
        Draft => "DRAFT",
        Active => "ACTIVE",
        Expired => "EXPIRED",
        Terminated => "TERMINATED",
    }
}

crate::define_status_enum! {
    /// Engagement status.
    EngagementStatus {
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

/// New engagements may only reference a contract that is in force.
pub fn ensure_contract_engageable(status: ContractStatus) -> Result<(), CoreError> {
    match status {
        ContractStatus::Draft | ContractStatus::Active => Ok(()),
        ContractStatus::Expired | ContractStatus::Terminated => Err(CoreError::Validation(
            format!("Cannot create an engagement under a contract in status {status}"),
        )),
    }
}

/// Timesheets may only be filed against an active engagement.
pub fn ensure_engagement_active(status: EngagementStatus) -> Result<(), CoreError> {
    match status {
        EngagementStatus::Active => Ok(()),
        EngagementStatus::Completed | EngagementStatus::Cancelled => Err(CoreError::Validation(
            format!("Cannot file a timesheet against an engagement in status {status}"),
        )),
    }
}
