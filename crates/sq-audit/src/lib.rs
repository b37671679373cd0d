//! # sq-audit
//!
//! Rule-based audit of a SonarQube server and of system info files.
//!
//! Checks are pure functions over domain objects (one module per object
//! family) returning [`Problem`]s. [`Auditor`] fetches the objects through
//! a [`SonarClient`](sq_client::SonarClient) and runs them; [`nodes`]
//! audits the application nodes of a SIF without any server.
//!
//! [`Problem`]: sq_core::Problem

pub mod auditor;
pub mod cardinality;
pub mod exclusions;
pub mod nodes;
pub mod profiles;
pub mod projects;
pub mod rules;
pub mod users;

mod error;

pub use auditor::{Auditor, Scope};
pub use error::AuditError;
pub use exclusions::ExclusionPatterns;
pub use nodes::{audit_sif, audit_sif_file};
pub use rules::RuleId;
