//! Background tasks (compute engine): lookup, details, and completion polling.
//!
//! # Polling
//!
//! [`SonarClient::wait_for_completion`] sleeps `initial` before the first
//! poll of `ce/activity` and doubles the interval after every poll. Once the
//! accumulated sleep reaches `timeout` while the task is still pending or in
//! progress, the outcome is [`TaskOutcome::Timeout`]. Only the activity
//! entry whose id equals the task id is considered; a response without it
//! leaves the known status unchanged.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use sq_core::Version;
use sq_core::entities::{Task, TaskDetails};
use sq_core::enums::TaskStatus;

use crate::{ClientError, Query, SonarClient};

/// First version whose `ce/activity` accepts `component=<key>`; older ones
/// take `q=<key>`.
const COMPONENT_FILTER_VERSION: Version = Version::new(8, 0, 0);

// ── Types ──────────────────────────────────────────────────────────

/// Backoff parameters of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Sleep before the first poll; doubled after each poll.
    pub initial: Duration,
    /// Accumulated sleep after which a non-terminal task times out.
    pub timeout: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            timeout: Duration::from_secs(180),
        }
    }
}

impl PollSchedule {
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            initial: Duration::from_millis(500),
            timeout,
        }
    }
}

/// How waiting on a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
    Canceled,
    /// The client gave up; the task may still complete on the server.
    Timeout { last_status: TaskStatus },
}

impl TaskOutcome {
    /// Outcome of a task observed in `status`; `None` while not terminal.
    #[must_use]
    pub const fn from_status(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Success => Some(Self::Success),
            TaskStatus::Failed => Some(Self::Failed),
            TaskStatus::Canceled => Some(Self::Canceled),
            TaskStatus::Pending | TaskStatus::InProgress => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters of `ce/activity`.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter<'a> {
    pub component: Option<&'a str>,
    pub task_type: Option<&'a str>,
    /// Statuses to include; empty means all of them.
    pub statuses: Vec<TaskStatus>,
    /// Only the most recent task of each component.
    pub only_currents: bool,
}

impl ActivityFilter<'_> {
    fn to_query(&self, version: Option<Version>) -> Query {
        let statuses: &[TaskStatus] = if self.statuses.is_empty() {
            &TaskStatus::ALL
        } else {
            &self.statuses
        };
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        let component_param = match version {
            Some(version) if version < COMPONENT_FILTER_VERSION => "q",
            _ => "component",
        };

        let mut query = Query::new()
            .list("status", &statuses)
            .opt("type", self.task_type)
            .opt(component_param, self.component);
        if self.only_currents {
            query.set("onlyCurrents", "true");
        }
        query
    }
}

#[derive(Deserialize)]
struct ActivityResponse {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskResponse {
    task: Value,
}

fn split_task(raw: Value) -> Result<Task, ClientError> {
    let details: TaskDetails = serde_json::from_value(raw.clone())?;
    let mut task: Task = serde_json::from_value(raw)?;
    task.details.set(details);
    Ok(task)
}

// ── Client ─────────────────────────────────────────────────────────

impl SonarClient {
    /// Fetch a task with its scanner context and error stack trace loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown id.
    pub async fn task(&self, id: &str) -> Result<Task, ClientError> {
        let query = Query::new()
            .param("id", id)
            .param("additionalFields", "scannerContext,stacktrace");
        let resp: TaskResponse = self.get_json("ce/task", &query).await?;
        split_task(resp.task)
    }

    /// Load the scanner context and stack trace of a task found through
    /// `ce/activity`. A task already loaded is not fetched again.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn load_task_details<'t>(
        &self,
        task: &'t mut Task,
    ) -> Result<&'t TaskDetails, ClientError> {
        if !task.details.is_loaded() {
            let fetched = self.task(&task.id).await?;
            task.details = fetched.details;
        }
        task.details
            .get()
            .ok_or_else(|| ClientError::Parse(format!("task {} returned no details", task.id)))
    }

    /// Tasks matching `filter`, most recent first.
    ///
    /// `version` selects how the component filter is sent; `None` assumes a
    /// recent server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn activity(
        &self,
        filter: &ActivityFilter<'_>,
        version: Option<Version>,
    ) -> Result<Vec<Task>, ClientError> {
        let resp: ActivityResponse = self.get_json("ce/activity", &filter.to_query(version)).await?;
        Ok(resp.tasks)
    }

    /// Most recent task of a component, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn last_task(
        &self,
        component: &str,
        version: Option<Version>,
    ) -> Result<Option<Task>, ClientError> {
        let filter = ActivityFilter {
            component: Some(component),
            only_currents: true,
            ..ActivityFilter::default()
        };
        Ok(self.activity(&filter, version).await?.into_iter().next())
    }

    /// Poll until `task` reaches a terminal status or the schedule times out.
    ///
    /// A task already terminal returns at once, without any request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if a poll fails; a timeout is not an error.
    pub async fn wait_for_completion(
        &self,
        task: &Task,
        version: Version,
        schedule: PollSchedule,
    ) -> Result<TaskOutcome, ClientError> {
        let filter = ActivityFilter {
            component: task.component_key.as_deref(),
            task_type: Some(&task.task_type),
            ..ActivityFilter::default()
        };

        let mut status = task.status;
        let mut interval = schedule.initial;
        let mut waited = Duration::ZERO;

        loop {
            if let Some(outcome) = TaskOutcome::from_status(status) {
                tracing::debug!(task = %task.id, %outcome, ?waited, "task completed");
                return Ok(outcome);
            }

            tokio::time::sleep(interval).await;
            waited += interval;
            interval = interval.saturating_mul(2);

            let tasks = self.activity(&filter, Some(version)).await?;
            match tasks.iter().find(|candidate| candidate.id == task.id) {
                Some(current) => status = current.status,
                None => tracing::debug!(task = %task.id, "task not in activity yet"),
            }
            tracing::debug!(task = %task.id, %status, ?waited, "polled task");

            if waited >= schedule.timeout && !status.is_terminal() {
                tracing::warn!(task = %task.id, %status, ?waited, "gave up waiting for task");
                return Ok(TaskOutcome::Timeout {
                    last_status: status,
                });
            }
        }
    }
}
