//! Catalog of audit rules: each rule's problem type and severity.

use sq_core::Problem;
use sq_core::enums::{ProblemType, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    ProjectLastAnalysis,
    ProjectZeroLoc,
    ProjectSuspiciousExclusion,
    BranchLastAnalysis,
    BranchNeverAnalyzed,
    PullRequestLastAnalysis,
    ProfileLastChange,
    ProfileLastUsed,
    ProfileNotUsed,
    ProfileTooFewRules,
    ProfileDeprecatedRules,
    ProfileTooManyPerLanguage,
    TokenTooOld,
    TokenNeverUsed,
    TokenUnused,
    UserUnused,
    GroupEmpty,
    PortfolioEmpty,
    ApplicationEmpty,
    AppClusterNotHa,
    AppNodeUnofficialDistro,
    AppNodeNotGreen,
    BelowLts,
    AppNodesDifferentVersions,
    AppNodesDifferentPlugins,
}

impl RuleId {
    /// Stable identifier used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectLastAnalysis => "PROJ_LAST_ANALYSIS",
            Self::ProjectZeroLoc => "PROJ_ZERO_LOC",
            Self::ProjectSuspiciousExclusion => "PROJ_SUSPICIOUS_EXCLUSION",
            Self::BranchLastAnalysis => "BRANCH_LAST_ANALYSIS",
            Self::BranchNeverAnalyzed => "BRANCH_NEVER_ANALYZED",
            Self::PullRequestLastAnalysis => "PULL_REQUEST_LAST_ANALYSIS",
            Self::ProfileLastChange => "QP_LAST_CHANGE_DATE",
            Self::ProfileLastUsed => "QP_LAST_USED_DATE",
            Self::ProfileNotUsed => "QP_NOT_USED",
            Self::ProfileTooFewRules => "QP_TOO_FEW_RULES",
            Self::ProfileDeprecatedRules => "QP_USE_DEPRECATED_RULES",
            Self::ProfileTooManyPerLanguage => "QP_TOO_MANY_QP",
            Self::TokenTooOld => "TOKEN_TOO_OLD",
            Self::TokenNeverUsed => "TOKEN_NEVER_USED",
            Self::TokenUnused => "TOKEN_UNUSED",
            Self::UserUnused => "USER_UNUSED",
            Self::GroupEmpty => "GROUP_EMPTY",
            Self::PortfolioEmpty => "PORTFOLIO_EMPTY",
            Self::ApplicationEmpty => "APPLICATION_EMPTY",
            Self::AppClusterNotHa => "DCE_APP_CLUSTER_NOT_HA",
            Self::AppNodeUnofficialDistro => "DCE_APP_NODE_UNOFFICIAL_DISTRO",
            Self::AppNodeNotGreen => "DCE_APP_NODE_NOT_GREEN",
            Self::BelowLts => "BELOW_LTS",
            Self::AppNodesDifferentVersions => "DCE_DIFFERENT_APP_NODES_VERSIONS",
            Self::AppNodesDifferentPlugins => "DCE_DIFFERENT_APP_NODES_PLUGINS",
        }
    }

    #[must_use]
    pub const fn problem_type(self) -> ProblemType {
        match self {
            Self::ProjectLastAnalysis
            | Self::BranchLastAnalysis
            | Self::BranchNeverAnalyzed
            | Self::PullRequestLastAnalysis
            | Self::ProfileLastChange
            | Self::ProfileLastUsed
            | Self::ProfileNotUsed
            | Self::ProfileTooFewRules
            | Self::ProfileDeprecatedRules
            | Self::GroupEmpty
            | Self::PortfolioEmpty
            | Self::ApplicationEmpty => ProblemType::Governance,
            Self::ProjectZeroLoc | Self::ProjectSuspiciousExclusion | Self::ProfileTooManyPerLanguage => {
                ProblemType::BadPractice
            }
            Self::TokenTooOld | Self::TokenNeverUsed | Self::TokenUnused | Self::UserUnused => {
                ProblemType::Security
            }
            Self::AppClusterNotHa => ProblemType::Performance,
            Self::AppNodeUnofficialDistro
            | Self::AppNodeNotGreen
            | Self::BelowLts
            | Self::AppNodesDifferentVersions
            | Self::AppNodesDifferentPlugins => ProblemType::Operations,
        }
    }

    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::AppClusterNotHa
            | Self::AppNodeUnofficialDistro
            | Self::AppNodesDifferentVersions
            | Self::AppNodesDifferentPlugins => Severity::Critical,
            Self::ProjectSuspiciousExclusion
            | Self::ProfileTooFewRules
            | Self::TokenTooOld
            | Self::AppNodeNotGreen
            | Self::BelowLts => Severity::High,
            Self::ProjectLastAnalysis
            | Self::ProfileLastChange
            | Self::ProfileLastUsed
            | Self::ProfileDeprecatedRules
            | Self::TokenNeverUsed
            | Self::TokenUnused
            | Self::UserUnused
            | Self::ProjectZeroLoc => Severity::Medium,
            Self::BranchLastAnalysis
            | Self::BranchNeverAnalyzed
            | Self::PullRequestLastAnalysis
            | Self::ProfileNotUsed
            | Self::ProfileTooManyPerLanguage
            | Self::GroupEmpty
            | Self::PortfolioEmpty
            | Self::ApplicationEmpty => Severity::Low,
        }
    }

    /// A problem breaking this rule.
    #[must_use]
    pub fn problem(self, message: impl Into<String>) -> Problem {
        Problem::new(self.as_str(), self.problem_type(), self.severity(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_carries_rule_classification() {
        let problem = RuleId::TokenTooOld.problem("token 'ci' is 400 days old");
        assert_eq!(problem.rule, "TOKEN_TOO_OLD");
        assert_eq!(problem.problem_type, ProblemType::Security);
        assert_eq!(problem.severity, Severity::High);
        assert!(problem.concerned.is_none());
    }

    #[test]
    fn cluster_rules_are_operational() {
        assert_eq!(RuleId::BelowLts.problem_type(), ProblemType::Operations);
        assert_eq!(RuleId::AppClusterNotHa.severity(), Severity::Critical);
    }
}
