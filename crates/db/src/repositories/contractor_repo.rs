//! Repository for the `contractors` table.

use contractor_core::types::DbId;
use sqlx::PgPool;

use crate::models::contractor::{Contractor, CreateContractor, UpdateContractor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, supplier_id, first_name, last_name, email, phone, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for contractors.
pub struct ContractorRepo;

impl ContractorRepo {
    /// Insert a new contractor, returning the created row.
    ///
    /// A duplicate email within the organization violates `uq_contractors_org_email`.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateContractor,
    ) -> Result<Contractor, sqlx::Error> {
        let query = format!(
            "INSERT INTO contractors
                (organization_id, supplier_id, first_name, last_name, email, phone)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(organization_id)
            .bind(input.supplier_id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a contractor by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Contractor>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contractors WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List contractors ordered by last name, then first name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractors
             WHERE organization_id = $1
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(organization_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every contractor in the organization, for export.
    pub async fn list_all(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractors
             WHERE organization_id = $1
             ORDER BY last_name ASC, first_name ASC, id ASC"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contractor. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateContractor,
    ) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!(
            "UPDATE contractors SET
                supplier_id = COALESCE($3, supplier_id),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                email = COALESCE($6, email),
                phone = COALESCE($7, phone),
                is_active = COALESCE($8, is_active)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.supplier_id)
            .bind(input.first_name.as_deref().map(str::trim))
            .bind(input.last_name.as_deref().map(str::trim))
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
