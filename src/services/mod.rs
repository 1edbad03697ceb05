//! Service layer for backvault
//!
//! The service layer provides business logic on top of the storage layer:
//! profile validation and the profile registry.

pub mod path_policy;
pub mod profile;

pub use path_policy::PathPolicy;
pub use profile::ProfileRegistry;
