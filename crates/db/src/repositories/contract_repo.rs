//! Repository for the `contracts` table.

use contractor_core::contract::ContractStatus;
use contractor_core::types::DbId;
use contractor_core::validation::DEFAULT_CURRENCY;
use sqlx::PgPool;

use crate::models::contract::{Contract, CreateContract, UpdateContract};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, contractor_id, supplier_id, title, rate, currency, \
                       start_date, end_date, status, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract, returning the created row.
    ///
    /// Status defaults to `DRAFT` and currency to `USD`.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (organization_id, contractor_id, supplier_id, title, rate, currency,
                 start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(organization_id)
            .bind(input.contractor_id)
            .bind(input.supplier_id)
            .bind(input.title.trim())
            .bind(input.rate)
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status.unwrap_or(ContractStatus::Draft).as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a contract by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contracts WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts, optionally restricted to one contractor, newest first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        contractor_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE organization_id = $1
               AND ($2::BIGINT IS NULL OR contractor_id = $2)
             ORDER BY start_date DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(organization_id)
            .bind(contractor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                supplier_id = COALESCE($3, supplier_id),
                title = COALESCE($4, title),
                rate = COALESCE($5, rate),
                currency = COALESCE($6, currency),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                status = COALESCE($9, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.supplier_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(input.rate)
            .bind(&input.currency)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }
}
