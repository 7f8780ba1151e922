//! Shared query parameter types for API handlers.

use contractor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use contractor_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `[1, MAX_LIMIT]`, defaulting to `DEFAULT_LIMIT`.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT)
    }

    /// Offset clamped to be non-negative.
    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// `?contractor_id=` filter for contract listing.
///
/// Extracted alongside [`PaginationParams`] from the same query string.
#[derive(Debug, Default, Deserialize)]
pub struct ContractListParams {
    pub contractor_id: Option<DbId>,
}

/// `?project_id=&contractor_id=` filters for engagement listing.
#[derive(Debug, Default, Deserialize)]
pub struct EngagementListParams {
    pub project_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
}
