//! Domain objects deserialized from SonarQube web API responses.
//!
//! Field names follow the API's camelCase JSON. Attributes the API does not
//! return inline (the owning project of a branch, the login of a token) are
//! filled in by the client after deserialization.

mod branch;
mod component;
mod issue;
mod quality_profile;
mod server;
mod task;
mod user;

pub use branch::{Branch, PullRequest};
pub use component::{Application, Portfolio, Project};
pub use issue::{ChangelogEntry, Comment, FieldDiff, Issue, IssueAction};
pub use quality_profile::QualityProfile;
pub use server::ServerInfo;
pub use task::{Task, TaskDetails};
pub use user::{Group, User, UserToken};
