//! Issues: filtered search, the 10 000 result window, changelogs, and the
//! mutations used to replay a changelog onto another issue.

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::dates;
use sq_core::entities::{ChangelogEntry, Issue, IssueAction};

use crate::{ClientError, Query, Search, SonarClient};

/// Page size of issue searches.
pub const ISSUE_PAGE_SIZE: u32 = 500;

/// Number of results past which the server refuses to page.
pub const MAX_SEARCH_RESULTS: u64 = 10_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SEVERITIES: [&str; 5] = ["BLOCKER", "CRITICAL", "MAJOR", "MINOR", "INFO"];
const TYPES: [&str; 3] = ["BUG", "VULNERABILITY", "CODE_SMELL"];

/// Filters of `issues/search`. Empty lists and `None` mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub projects: Vec<String>,
    pub branch: Option<String>,
    pub pull_request: Option<String>,
    pub statuses: Vec<String>,
    pub resolutions: Vec<String>,
    pub severities: Vec<String>,
    pub types: Vec<String>,
    pub tags: Vec<String>,
    /// Directory paths, relative to the project root.
    pub directories: Vec<String>,
    /// Inclusive lower bound on creation date, in the server's time zone.
    pub created_after: Option<NaiveDate>,
    /// Exclusive upper bound on creation date, in the server's time zone.
    pub created_before: Option<NaiveDate>,
}

impl IssueFilter {
    /// Same filter restricted to one project.
    #[must_use]
    pub fn for_project(&self, project: &str) -> Self {
        Self {
            projects: vec![project.to_string()],
            ..self.clone()
        }
    }

    fn window(&self, after: NaiveDate, before: NaiveDate) -> Self {
        Self {
            created_after: Some(after),
            created_before: Some(before),
            ..self.clone()
        }
    }

    /// One filter per severity, then per type, narrowing whichever of the
    /// two does not yet pin a single value. `None` once both are pinned.
    fn facet_slices(&self) -> Option<(&'static str, Vec<Self>)> {
        if let Some(values) = unpinned(&self.severities, &SEVERITIES) {
            let slices = values
                .into_iter()
                .map(|severity| Self {
                    severities: vec![severity],
                    ..self.clone()
                })
                .collect();
            return Some(("severity", slices));
        }
        unpinned(&self.types, &TYPES).map(|values| {
            let slices = values
                .into_iter()
                .map(|issue_type| Self {
                    types: vec![issue_type],
                    ..self.clone()
                })
                .collect();
            ("type", slices)
        })
    }

    fn to_query(&self) -> Query {
        Query::new()
            .list("componentKeys", &self.projects)
            .opt("branch", self.branch.as_deref())
            .opt("pullRequest", self.pull_request.as_deref())
            .list("statuses", &self.statuses)
            .list("resolutions", &self.resolutions)
            .list("severities", &self.severities)
            .list("types", &self.types)
            .list("tags", &self.tags)
            .list("directories", &self.directories)
            .opt(
                "createdAfter",
                self.created_after.map(|d| d.format(DATE_FORMAT)),
            )
            .opt(
                "createdBefore",
                self.created_before.map(|d| d.format(DATE_FORMAT)),
            )
    }
}

/// Values to split a facet on: every known value when unfiltered, the
/// filtered ones when there are several, `None` when a single one is set.
fn unpinned(current: &[String], known: &[&str]) -> Option<Vec<String>> {
    match current {
        [_] => None,
        [] => Some(known.iter().map(|value| (*value).to_string()).collect()),
        several => Some(several.to_vec()),
    }
}

/// Split the days holding `slice`'s issues, `[oldest, newest]` inclusive,
/// into two half-open `[after, before)` windows, clamped to the window
/// `slice` already has. `None` when at most one day remains, so every half
/// is strictly smaller than the window it came from.
fn split_days(
    slice: &IssueFilter,
    oldest: NaiveDate,
    newest: NaiveDate,
) -> Option<[(NaiveDate, NaiveDate); 2]> {
    let after = slice.created_after.map_or(oldest, |lower| oldest.max(lower));
    let end = newest.checked_add_days(Days::new(1))?;
    let before = slice.created_before.map_or(end, |upper| end.min(upper));
    let span = u64::try_from((before - after).num_days()).ok()?;
    if span < 2 {
        return None;
    }
    let mid = after.checked_add_days(Days::new(span / 2))?;
    Some([(after, mid), (mid, before)])
}

#[derive(Deserialize)]
struct ChangelogResponse {
    changelog: Vec<ChangelogEntry>,
}

/// Only the creation date of the boundary issue, kept as sent so its
/// offset survives.
#[derive(Deserialize)]
struct BoundaryPage {
    issues: Vec<BoundaryIssue>,
}

#[derive(Deserialize)]
struct BoundaryIssue {
    #[serde(rename = "creationDate", default)]
    creation_date: Option<String>,
}

#[derive(Deserialize)]
struct FacetPage {
    #[serde(default)]
    facets: Vec<Facet>,
}

#[derive(Deserialize)]
struct Facet {
    property: String,
    #[serde(default)]
    values: Vec<FacetValue>,
}

#[derive(Deserialize)]
struct FacetValue {
    val: String,
    #[serde(default)]
    count: u64,
}

impl SonarClient {
    /// Issues matching `filter`, with comments.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TooManyResults`] when the filter matches more
    /// than [`MAX_SEARCH_RESULTS`] issues, or any page error.
    pub async fn search_issues(
        &self,
        filter: &IssueFilter,
    ) -> Result<KeyedCollection<Issue>, ClientError> {
        self.search_all(&Self::issue_search(filter).max_results(MAX_SEARCH_RESULTS))
            .await
    }

    fn issue_search(filter: &IssueFilter) -> Search {
        Search::new("issues/search", "issues")
            .query(filter.to_query())
            .param("additionalFields", "comments")
            .page_size(ISSUE_PAGE_SIZE)
    }

    /// Server-local creation day of the oldest (`ascending`) or newest
    /// matching issue.
    async fn boundary_day(
        &self,
        filter: &IssueFilter,
        ascending: bool,
    ) -> Result<Option<NaiveDate>, ClientError> {
        let query = filter
            .to_query()
            .param("s", "CREATION_DATE")
            .param("asc", ascending)
            .param("ps", 1);
        let page: BoundaryPage = self.get_json("issues/search", &query).await?;
        let Some(raw) = page.issues.into_iter().find_map(|issue| issue.creation_date) else {
            return Ok(None);
        };
        Ok(Some(dates::server_day(&raw)?))
    }

    async fn split_window(
        &self,
        slice: &IssueFilter,
    ) -> Result<Option<[(NaiveDate, NaiveDate); 2]>, ClientError> {
        let oldest = self.boundary_day(slice, true).await?;
        let newest = self.boundary_day(slice, false).await?;
        Ok(oldest
            .zip(newest)
            .and_then(|(oldest, newest)| split_days(slice, oldest, newest)))
    }

    /// One filter per directory holding issues of `slice`, from the
    /// `directories` facet. `None` when `slice` is already restricted to a
    /// single directory or the facet is empty.
    async fn directory_slices(
        &self,
        slice: &IssueFilter,
        total: u64,
    ) -> Result<Option<Vec<IssueFilter>>, ClientError> {
        if slice.directories.len() == 1 {
            return Ok(None);
        }
        let query = slice
            .to_query()
            .param("facets", "directories")
            .param("ps", 1);
        let page: FacetPage = self.get_json("issues/search", &query).await?;
        let values: Vec<FacetValue> = page
            .facets
            .into_iter()
            .filter(|facet| facet.property == "directories")
            .flat_map(|facet| facet.values)
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        let listed: u64 = values.iter().map(|value| value.count).sum();
        if listed < total {
            tracing::warn!(
                listed,
                total,
                "directory facet does not list every issue, some may be missing"
            );
        }
        Ok(Some(
            values
                .into_iter()
                .map(|value| IssueFilter {
                    directories: vec![value.val],
                    ..slice.clone()
                })
                .collect(),
        ))
    }

    /// All issues matching `filter`, working around the result window.
    ///
    /// A slice over the window is split by creation day until it covers a
    /// single day, then by severity, by type, and finally by directory. A
    /// slice that still exceeds the window after that is returned
    /// truncated, with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any request fails.
    pub async fn export_issues(
        &self,
        filter: &IssueFilter,
    ) -> Result<KeyedCollection<Issue>, ClientError> {
        let mut issues = KeyedCollection::new();
        let mut pending = vec![filter.clone()];

        while let Some(slice) = pending.pop() {
            let total = match self.search_issues(&slice).await {
                Ok(found) => {
                    issues.extend(found);
                    continue;
                }
                Err(ClientError::TooManyResults { total, .. }) => total,
                Err(other) => return Err(other),
            };

            // Popped last-in first-out: pushed in reverse to keep order.
            if let Some([first, second]) = self.split_window(&slice).await? {
                tracing::debug!(total, ?first, ?second, "splitting issue search by date");
                pending.push(slice.window(second.0, second.1));
                pending.push(slice.window(first.0, first.1));
            } else if let Some((facet, slices)) = slice.facet_slices() {
                tracing::debug!(total, facet, slices = slices.len(), "splitting single-day issue search");
                pending.extend(slices.into_iter().rev());
            } else if let Some(slices) = self.directory_slices(&slice, total).await? {
                tracing::debug!(total, slices = slices.len(), "splitting single-day issue search by directory");
                pending.extend(slices.into_iter().rev());
            } else {
                tracing::warn!(
                    total,
                    limit = MAX_SEARCH_RESULTS,
                    "too many issues in a single day, severity, type and directory, export is truncated"
                );
                let truncated = Self::issue_search(&slice).truncate_at(MAX_SEARCH_RESULTS);
                issues.extend(self.search_all::<Issue>(&truncated).await?);
            }
        }

        Ok(issues)
    }

    /// Changelog of an issue, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn changelog(&self, issue: &str) -> Result<Vec<ChangelogEntry>, ClientError> {
        let resp: ChangelogResponse = self
            .get_json("issues/changelog", &Query::new().param("issue", issue))
            .await?;
        Ok(resp.changelog)
    }

    /// Apply one manual change to an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the server refuses the change.
    pub async fn apply_issue_action(
        &self,
        issue: &str,
        action: &IssueAction,
    ) -> Result<(), ClientError> {
        let base = Query::new().param("issue", issue);
        let (api, query) = match action {
            IssueAction::SetSeverity(severity) => {
                ("issues/set_severity", base.param("severity", severity))
            }
            IssueAction::SetType(issue_type) => ("issues/set_type", base.param("type", issue_type)),
            IssueAction::Transition(transition) => {
                ("issues/do_transition", base.param("transition", transition))
            }
            IssueAction::Assign(login) => ("issues/assign", base.param("assignee", login)),
            IssueAction::SetTags(tags) => ("issues/set_tags", base.list("tags", tags)),
            IssueAction::AddComment(text) => ("issues/add_comment", base.param("text", text)),
        };
        self.post(api, &query).await?;
        tracing::debug!(issue, api, "issue updated");
        Ok(())
    }
}
