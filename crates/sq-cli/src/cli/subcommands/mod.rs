mod issues;
mod projects;
mod task;

pub use issues::{IssueExportArgs, IssuesCommands};
pub use projects::ProjectsCommands;
pub use task::TaskCommands;
