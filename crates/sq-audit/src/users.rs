//! Token and login age checks.

use chrono::{DateTime, Utc};
use sq_config::AuditConfig;
use sq_core::dates::age_in_days;
use sq_core::entities::{User, UserToken};
use sq_core::{ConcernedObject, Problem};

use crate::rules::RuleId;

/// Whether tokens of `login` are exempt from expiry checks.
#[must_use]
pub fn tokens_never_expire(login: &str, config: &AuditConfig) -> bool {
    config.tokens_never_expire.iter().any(|exempt| exempt == login)
}

/// Age checks of one token.
#[must_use]
pub fn audit_token(token: &UserToken, now: DateTime<Utc>, config: &AuditConfig) -> Vec<Problem> {
    if tokens_never_expire(&token.login, config) {
        return Vec::new();
    }
    let object = ConcernedObject::UserToken {
        login: token.login.clone(),
        name: token.name.clone(),
    };
    let describe = object.describe();
    let mut problems = Vec::new();

    let created_age = token.created_at.map(|created| age_in_days(now, created));
    if let Some(age) = created_age
        && age > i64::from(config.token_max_age)
    {
        problems.push(
            RuleId::TokenTooOld
                .problem(format!("{describe} is {age} days old, it should be rotated"))
                .concerning(object.clone()),
        );
    }

    match token.last_connection_date {
        None => {
            if let Some(age) = created_age
                && age > i64::from(config.token_max_unused_age)
            {
                problems.push(
                    RuleId::TokenNeverUsed
                        .problem(format!("{describe} was created {age} days ago and never used"))
                        .concerning(object),
                );
            }
        }
        Some(used) => {
            let age = age_in_days(now, used);
            if age > i64::from(config.token_max_unused_age) {
                problems.push(
                    RuleId::TokenUnused
                        .problem(format!("{describe} has not been used for {age} days"))
                        .concerning(object),
                );
            }
        }
    }
    problems
}

/// Last login of a user. Users who never logged in are not reported.
#[must_use]
pub fn audit_user_login(user: &User, now: DateTime<Utc>, config: &AuditConfig) -> Vec<Problem> {
    let Some(last) = user.last_connection_date else {
        return Vec::new();
    };
    let age = age_in_days(now, last);
    if age <= i64::from(config.user_max_login_age) {
        return Vec::new();
    }
    let object = ConcernedObject::User {
        login: user.login.clone(),
    };
    vec![
        RuleId::UserUnused
            .problem(format!("{} has not logged in for {age} days", object.describe()))
            .concerning(object),
    ]
}
