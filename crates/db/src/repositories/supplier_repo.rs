//! Repository for the `suppliers` table.

use contractor_core::types::DbId;
use sqlx::PgPool;

use crate::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, organization_id, name, contact_email, phone, address, created_at, updated_at";

/// Provides CRUD operations for suppliers.
pub struct SupplierRepo;

impl SupplierRepo {
    /// Insert a new supplier, returning the created row.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateSupplier,
    ) -> Result<Supplier, sqlx::Error> {
        let query = format!(
            "INSERT INTO suppliers (organization_id, name, contact_email, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(organization_id)
            .bind(input.name.trim())
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a supplier by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM suppliers WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List suppliers ordered by name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Supplier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM suppliers
             WHERE organization_id = $1
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(organization_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every supplier in the organization, for export.
    pub async fn list_all(pool: &PgPool, organization_id: DbId) -> Result<Vec<Supplier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM suppliers WHERE organization_id = $1 ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a supplier. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!(
            "UPDATE suppliers SET
                name = COALESCE($3, name),
                contact_email = COALESCE($4, contact_email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a supplier by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
