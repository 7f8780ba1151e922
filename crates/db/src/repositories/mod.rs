//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every business-record query is
//! scoped by `organization_id`.

pub mod contract_repo;
pub mod contractor_repo;
pub mod engagement_repo;
pub mod invoice_repo;
pub mod organization_repo;
pub mod project_repo;
pub mod role_repo;
pub mod session_repo;
pub mod supplier_repo;
pub mod timesheet_repo;
pub mod user_repo;

pub use contract_repo::ContractRepo;
pub use contractor_repo::ContractorRepo;
pub use engagement_repo::EngagementRepo;
pub use invoice_repo::InvoiceRepo;
pub use organization_repo::OrganizationRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use supplier_repo::SupplierRepo;
pub use timesheet_repo::TimesheetRepo;
pub use user_repo::UserRepo;
