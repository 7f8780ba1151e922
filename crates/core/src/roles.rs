//! Well-known role names and the permission matrix.
//!
//! Role names must match the seed data in `20260301000002_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_CONTRACTOR: &str = "contractor";

/// All seeded role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_CONTRACTOR];

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Read any organization record.
    ViewRecords,
    /// Create and edit suppliers, contractors, contracts, projects, engagements.
    ManageDirectory,
    /// Create timesheets, replace their entries, submit them.
    EditTimesheets,
    /// Approve or reject submitted timesheets.
    ReviewTimesheets,
    /// Create, submit and mark invoices paid.
    ManageInvoices,
    /// Download CSV exports.
    ExportData,
    /// Create and deactivate users.
    ManageUsers,
}

/// Whether `role` grants `permission`. Unknown roles grant nothing.
pub fn role_has_permission(role: &str, permission: Permission) -> bool {
    match role {
        ROLE_ADMIN => true,
        ROLE_MANAGER => !matches!(permission, Permission::ManageUsers),
        ROLE_CONTRACTOR => matches!(
            permission,
            Permission::ViewRecords | Permission::EditTimesheets
        ),
        _ => false,
    }
}
