//! Quality profile checks.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sq_config::AuditConfig;
use sq_core::dates::age_in_days;
use sq_core::entities::QualityProfile;
use sq_core::{ConcernedObject, Problem};

use crate::rules::RuleId;

fn profile_object(profile: &QualityProfile) -> ConcernedObject {
    ConcernedObject::QualityProfile {
        key: profile.key.clone(),
        name: profile.name.clone(),
        language: profile.language.clone(),
    }
}

/// Checks of a single profile. Built-in profiles are only checked for
/// deprecated rules.
#[must_use]
pub fn audit_profile(
    profile: &QualityProfile,
    rules_per_language: &HashMap<String, u64>,
    now: DateTime<Utc>,
    config: &AuditConfig,
) -> Vec<Problem> {
    let object = profile_object(profile);
    let describe = object.describe();
    let mut problems = Vec::new();

    if profile.active_deprecated_rule_count > 0 {
        problems.push(
            RuleId::ProfileDeprecatedRules
                .problem(format!(
                    "{describe} has {} deprecated rules",
                    profile.active_deprecated_rule_count
                ))
                .concerning(object.clone()),
        );
    }
    if profile.is_built_in {
        return problems;
    }

    if let Some(updated) = profile.rules_updated_at {
        let age = age_in_days(now, updated);
        if age > i64::from(config.profile_max_last_update_age) {
            problems.push(
                RuleId::ProfileLastChange
                    .problem(format!("{describe} has not been updated since {age} days"))
                    .concerning(object.clone()),
            );
        }
    }

    if profile.is_used() {
        if let Some(used) = profile.last_used {
            let age = age_in_days(now, used);
            if age > i64::from(config.profile_max_unused_age) {
                problems.push(
                    RuleId::ProfileLastUsed
                        .problem(format!("{describe} has not been used since {age} days"))
                        .concerning(object.clone()),
                );
            }
        }
    } else {
        problems.push(
            RuleId::ProfileNotUsed
                .problem(format!("{describe} is not used by any project"))
                .concerning(object.clone()),
        );
    }

    match rules_per_language.get(&profile.language) {
        Some(&available) if available > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let ratio = profile.active_rule_count as f64 / available as f64;
            if ratio < config.profile_min_rules_ratio {
                problems.push(
                    RuleId::ProfileTooFewRules
                        .problem(format!(
                            "{describe} has {} rules out of {available} available ({:.0}%)",
                            profile.active_rule_count,
                            ratio * 100.0
                        ))
                        .concerning(object),
                );
            }
        }
        _ => tracing::debug!(language = %profile.language, "no rule count for language"),
    }

    problems
}

/// One problem per language with more profiles than allowed.
#[must_use]
pub fn audit_profiles_per_language<'a>(
    profiles: impl IntoIterator<Item = &'a QualityProfile>,
    max_per_language: usize,
) -> Vec<Problem> {
    let mut per_language: BTreeMap<&str, usize> = BTreeMap::new();
    for profile in profiles {
        *per_language.entry(profile.language.as_str()).or_default() += 1;
    }
    per_language
        .into_iter()
        .filter(|&(_, count)| count > max_per_language)
        .map(|(language, count)| {
            RuleId::ProfileTooManyPerLanguage.problem(format!(
                "Language '{language}' has {count} quality profiles, more than {max_per_language}"
            ))
        })
        .collect()
}
