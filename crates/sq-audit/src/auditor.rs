//! Server-backed audit: fetches collections through the client and runs
//! the pure checks of the sibling modules over them.
//!
//! A failure to list a whole collection is returned as an error. A failure
//! on one object (its branches, its LoC, its tokens) is logged and only
//! that input is treated as absent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sq_client::{ClientError, SonarClient};
use sq_config::AuditConfig;
use sq_core::entities::{Project, ServerInfo};
use sq_core::{ConcernedObject, Problem};

use crate::error::AuditError;
use crate::exclusions::ExclusionPatterns;
use crate::{cardinality, profiles, projects, users};

// ── Scope ──────────────────────────────────────────────────────────

/// An object family that can be audited on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Projects,
    Profiles,
    Users,
    Groups,
    Portfolios,
    Applications,
}

impl Scope {
    pub const ALL: [Self; 6] = [
        Self::Projects,
        Self::Profiles,
        Self::Users,
        Self::Groups,
        Self::Portfolios,
        Self::Applications,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Profiles => "qualityprofiles",
            Self::Users => "users",
            Self::Groups => "groups",
            Self::Portfolios => "portfolios",
            Self::Applications => "applications",
        }
    }

    const fn enabled(self, config: &AuditConfig) -> bool {
        match self {
            Self::Projects => config.projects,
            Self::Profiles => config.profiles,
            Self::Users => config.users,
            Self::Groups => config.groups,
            Self::Portfolios => config.portfolios,
            Self::Applications => config.applications,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projects" => Ok(Self::Projects),
            "qualityprofiles" | "profiles" => Ok(Self::Profiles),
            "users" => Ok(Self::Users),
            "groups" => Ok(Self::Groups),
            "portfolios" => Ok(Self::Portfolios),
            "applications" | "apps" => Ok(Self::Applications),
            other => Err(format!("unknown audit scope '{other}'")),
        }
    }
}

/// Log a per-object failure and drop the value.
fn or_warn<T>(result: Result<T, ClientError>, what: &str, object: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(object, error = %e, "failed to fetch {what}, check skipped");
            None
        }
    }
}

// ── Auditor ────────────────────────────────────────────────────────

/// Runs audit checks against one server.
#[derive(Debug)]
pub struct Auditor<'a> {
    client: &'a SonarClient,
    server: ServerInfo,
    config: &'a AuditConfig,
    patterns: ExclusionPatterns,
    now: DateTime<Utc>,
}

impl<'a> Auditor<'a> {
    /// # Errors
    ///
    /// Returns [`AuditError::Pattern`] if an exclusion regex is invalid.
    pub fn new(
        client: &'a SonarClient,
        server: ServerInfo,
        config: &'a AuditConfig,
    ) -> Result<Self, AuditError> {
        Ok(Self {
            client,
            server,
            config,
            patterns: ExclusionPatterns::new(
                &config.suspicious_exclusions,
                &config.suspicious_exceptions,
            )?,
            now: Utc::now(),
        })
    }

    /// Measure ages against `now` instead of the current time.
    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Audit every enabled family among `scopes`.
    ///
    /// # Errors
    ///
    /// Returns the first collection-wide failure.
    pub async fn audit(&self, scopes: &[Scope]) -> Result<Vec<Problem>, AuditError> {
        let mut problems = Vec::new();
        for &scope in scopes {
            if !scope.enabled(self.config) {
                tracing::info!(%scope, "audit disabled by configuration");
                continue;
            }
            tracing::info!(%scope, "auditing");
            let found = match scope {
                Scope::Projects => self.audit_projects(&[]).await?,
                Scope::Profiles => self.audit_profiles().await?,
                Scope::Users => self.audit_users().await?,
                Scope::Groups => self.audit_groups().await?,
                Scope::Portfolios => self.audit_portfolios().await?,
                Scope::Applications => self.audit_applications().await?,
            };
            tracing::info!(%scope, problems = found.len(), "audit done");
            problems.extend(found);
        }
        Ok(problems)
    }

    /// Projects (all when `keys` is empty), with their branches and pull
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the project list cannot be fetched.
    pub async fn audit_projects(&self, keys: &[String]) -> Result<Vec<Problem>, AuditError> {
        let found = self.client.projects(keys).await?;
        let mut problems = Vec::new();
        for (i, project) in found.iter().enumerate() {
            problems.extend(self.audit_project(project).await);
            if (i + 1) % 50 == 0 {
                tracing::info!(audited = i + 1, total = found.len(), "projects audited");
            }
        }
        Ok(problems)
    }

    async fn audit_project(&self, project: &Project) -> Vec<Problem> {
        let config = self.config;
        let mut problems =
            projects::audit_project(project, self.now, config.project_max_last_analysis_age);

        if project.last_analysis_date.is_some() {
            let ncloc = or_warn(self.client.ncloc(&project.key, None).await, "LoC", &project.key);
            problems.extend(projects::audit_zero_loc(project, ncloc.flatten()));
        }

        if config.branches && self.server.edition.supports_branches() {
            if let Some(branches) =
                or_warn(self.client.branches(&project.key).await, "branches", &project.key)
            {
                for branch in &branches {
                    problems.extend(projects::audit_branch(
                        branch,
                        self.now,
                        config.branch_max_last_analysis_age,
                    ));
                }
            }
            if let Some(prs) = or_warn(
                self.client.pull_requests(&project.key).await,
                "pull requests",
                &project.key,
            ) {
                for pr in &prs {
                    problems.extend(projects::audit_pull_request(
                        pr,
                        self.now,
                        config.pull_request_max_last_analysis_age,
                    ));
                }
            }
        }

        if config.exclusions {
            problems.extend(self.audit_exclusions(project).await);
        }
        problems
    }

    async fn audit_exclusions(&self, project: &Project) -> Vec<Problem> {
        let last = self
            .client
            .last_task(&project.key, Some(self.server.version))
            .await;
        let Some(Some(mut task)) = or_warn(last, "last background task", &project.key) else {
            return Vec::new();
        };
        let Some(details) = or_warn(
            self.client.load_task_details(&mut task).await,
            "scanner context",
            &project.key,
        ) else {
            return Vec::new();
        };
        let object = ConcernedObject::Project {
            key: project.key.clone(),
            name: project.name.clone(),
        };
        self.patterns.audit(&object, details)
    }

    /// Quality profiles, one by one and per language.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the profiles cannot be listed.
    pub async fn audit_profiles(&self) -> Result<Vec<Problem>, AuditError> {
        let all = self.client.quality_profiles().await?;
        let rules = or_warn(self.client.rules_per_language().await, "rule counts", "rules")
            .unwrap_or_default();
        let mut problems: Vec<Problem> = all
            .iter()
            .flat_map(|profile| profiles::audit_profile(profile, &rules, self.now, self.config))
            .collect();
        problems.extend(profiles::audit_profiles_per_language(
            &all,
            self.config.profiles_max_per_language,
        ));
        Ok(problems)
    }

    /// Tokens of every user.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the users cannot be listed.
    pub async fn audit_tokens(&self) -> Result<Vec<Problem>, AuditError> {
        let accounts = self.client.users().await?;
        let mut problems = Vec::new();
        for user in &accounts {
            if users::tokens_never_expire(&user.login, self.config) {
                tracing::debug!(login = %user.login, "tokens never expire");
                continue;
            }
            let Some(tokens) =
                or_warn(self.client.user_tokens(&user.login).await, "tokens", &user.login)
            else {
                continue;
            };
            for token in &tokens {
                problems.extend(users::audit_token(token, self.now, self.config));
            }
        }
        Ok(problems)
    }

    /// Last login of every user.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the users cannot be listed.
    pub async fn audit_user_logins(&self) -> Result<Vec<Problem>, AuditError> {
        let accounts = self.client.users().await?;
        Ok(accounts
            .iter()
            .flat_map(|user| users::audit_user_login(user, self.now, self.config))
            .collect())
    }

    /// Tokens and last logins.
    ///
    /// # Errors
    ///
    /// Same as [`Self::audit_tokens`].
    pub async fn audit_users(&self) -> Result<Vec<Problem>, AuditError> {
        let mut problems = self.audit_tokens().await?;
        problems.extend(self.audit_user_logins().await?);
        Ok(problems)
    }

    /// Empty groups.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the groups cannot be listed.
    pub async fn audit_groups(&self) -> Result<Vec<Problem>, AuditError> {
        let groups = self.client.groups().await?;
        Ok(groups.iter().filter_map(cardinality::audit_group).collect())
    }

    /// Empty portfolios. Skipped below enterprise edition.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the portfolios cannot be listed.
    pub async fn audit_portfolios(&self) -> Result<Vec<Problem>, AuditError> {
        if !self.server.edition.supports_portfolios() {
            tracing::info!(edition = %self.server.edition, "no portfolios in this edition");
            return Ok(Vec::new());
        }
        let mut portfolios = self.client.portfolios(false).await?;
        let mut problems = Vec::new();
        for portfolio in portfolios.iter_mut() {
            let key = portfolio.key.clone();
            if or_warn(self.client.load_portfolio_size(portfolio).await, "size", &key).is_some() {
                problems.extend(cardinality::audit_portfolio(portfolio));
            }
        }
        Ok(problems)
    }

    /// Empty applications. Skipped on community edition.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the applications cannot be listed.
    pub async fn audit_applications(&self) -> Result<Vec<Problem>, AuditError> {
        if !self.server.edition.supports_applications() {
            tracing::info!(edition = %self.server.edition, "no applications in this edition");
            return Ok(Vec::new());
        }
        let mut applications = self.client.applications().await?;
        let mut problems = Vec::new();
        for application in applications.iter_mut() {
            let key = application.key.clone();
            if or_warn(self.client.load_application_size(application).await, "size", &key).is_some()
            {
                problems.extend(cardinality::audit_application(application));
            }
        }
        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_names_round_trip() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>(), Ok(scope));
        }
        assert_eq!("apps".parse::<Scope>(), Ok(Scope::Applications));
        assert!("webhooks".parse::<Scope>().is_err());
    }

    #[test]
    fn disabled_scopes() {
        let config = AuditConfig {
            groups: false,
            ..AuditConfig::default()
        };
        assert!(!Scope::Groups.enabled(&config));
        assert!(Scope::Users.enabled(&config));
    }
}
