//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireManager`] -- Requires `manager` or `admin`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//!
//! Finer-grained checks go through [`auth::AuthUser::require`].

pub mod auth;
pub mod rbac;
