//! Repository for the `organizations` table.

use contractor_core::roles::ROLE_ADMIN;
use contractor_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{NewOwner, Organization};
use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides operations for organizations (tenants).
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Create an organization and its first admin user in one transaction.
    pub async fn create_with_owner(
        pool: &PgPool,
        name: &str,
        owner: &NewOwner,
    ) -> Result<(Organization, User), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("INSERT INTO organizations (name) VALUES ($1) RETURNING {COLUMNS}");
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(
            "WITH u AS (
                INSERT INTO users (organization_id, email, full_name, password_hash, role_id)
                SELECT $1, $2, $3, $4, id FROM roles WHERE name = $5
                RETURNING *
             )
             SELECT u.id, u.organization_id, u.email, u.full_name, u.password_hash,
                    u.role_id, r.name AS role, u.is_active, u.last_login_at,
                    u.failed_login_count, u.locked_until, u.created_at, u.updated_at
             FROM u JOIN roles r ON r.id = u.role_id",
        )
        .bind(organization.id)
        .bind(&owner.email)
        .bind(&owner.full_name)
        .bind(&owner.password_hash)
        .bind(ROLE_ADMIN)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((organization, user))
    }

    /// Find an organization by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
