//! Quality profiles and rule counts per language.

use std::collections::HashMap;

use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::entities::QualityProfile;

use crate::{ClientError, Query, SonarClient};

#[derive(Deserialize)]
struct ProfileList {
    profiles: Vec<QualityProfile>,
}

#[derive(Deserialize)]
struct RulesFacets {
    #[serde(default)]
    facets: Vec<Facet>,
}

#[derive(Deserialize)]
struct Facet {
    property: String,
    values: Vec<FacetValue>,
}

#[derive(Deserialize)]
struct FacetValue {
    val: String,
    count: u64,
}

fn language_counts(facets: RulesFacets) -> HashMap<String, u64> {
    facets
        .facets
        .into_iter()
        .filter(|facet| facet.property == "languages")
        .flat_map(|facet| facet.values)
        .map(|value| (value.val, value.count))
        .collect()
}

impl SonarClient {
    /// All quality profiles of all languages.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn quality_profiles(&self) -> Result<KeyedCollection<QualityProfile>, ClientError> {
        let list: ProfileList = self.get_json("qualityprofiles/search", &Query::new()).await?;
        Ok(list.profiles.into_iter().collect())
    }

    /// Number of rules available per language.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn rules_per_language(&self) -> Result<HashMap<String, u64>, ClientError> {
        let query = Query::new().param("facets", "languages").param("ps", 1);
        let facets: RulesFacets = self.get_json("rules/search", &query).await?;
        Ok(language_counts(facets))
    }
}
