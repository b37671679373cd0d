//! Empty containers: groups without members, portfolios and applications
//! without projects.

use sq_core::entities::{Application, Group, Portfolio};
use sq_core::{ConcernedObject, Problem};

use crate::rules::RuleId;

/// A group whose member count is known to be zero.
#[must_use]
pub fn audit_group(group: &Group) -> Option<Problem> {
    if group.members_count != Some(0) {
        return None;
    }
    let object = ConcernedObject::Group {
        name: group.name.clone(),
    };
    Some(
        RuleId::GroupEmpty
            .problem(format!("{} is empty", object.describe()))
            .concerning(object),
    )
}

/// A portfolio whose project count is loaded and zero.
#[must_use]
pub fn audit_portfolio(portfolio: &Portfolio) -> Option<Problem> {
    if portfolio.nbr_projects.get() != Some(&0) {
        return None;
    }
    let object = ConcernedObject::Portfolio {
        key: portfolio.key.clone(),
        name: portfolio.name.clone(),
    };
    Some(
        RuleId::PortfolioEmpty
            .problem(format!("{} has no projects", object.describe()))
            .concerning(object),
    )
}

/// An application whose project count is loaded and zero.
#[must_use]
pub fn audit_application(application: &Application) -> Option<Problem> {
    if application.nbr_projects.get() != Some(&0) {
        return None;
    }
    let object = ConcernedObject::Application {
        key: application.key.clone(),
        name: application.name.clone(),
    };
    Some(
        RuleId::ApplicationEmpty
            .problem(format!("{} has no projects", object.describe()))
            .concerning(object),
    )
}
