//! Measures: lines of code, aggregation sizes, last analysis dates.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sq_core::dates;
use sq_core::entities::{Application, Portfolio};

use crate::{ClientError, Query, SonarClient};

#[derive(Deserialize)]
struct MeasuresResponse {
    component: MeasuredComponent,
}

#[derive(Deserialize)]
struct MeasuredComponent {
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Deserialize)]
struct Measure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigationResponse {
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    analysis_date: Option<DateTime<Utc>>,
}

fn measure_value(resp: &MeasuresResponse, metric: &str) -> Result<Option<u64>, ClientError> {
    resp.component
        .measures
        .iter()
        .find(|m| m.metric == metric)
        .and_then(|m| m.value.as_deref())
        .map(|value| {
            value
                .parse::<u64>()
                .map_err(|_| ClientError::Parse(format!("{metric} value '{value}' is not a count")))
        })
        .transpose()
}

impl SonarClient {
    /// Integer value of `metric` on a component (and branch), `None` if the
    /// component has no such measure yet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the value is not an
    /// integer.
    pub async fn measure(
        &self,
        component: &str,
        branch: Option<&str>,
        metric: &str,
    ) -> Result<Option<u64>, ClientError> {
        let query = Query::new()
            .param("component", component)
            .param("metricKeys", metric)
            .opt("branch", branch);
        let resp: MeasuresResponse = self.get_json("measures/component", &query).await?;
        measure_value(&resp, metric)
    }

    /// Lines of code (`ncloc`) of a project, application or portfolio.
    ///
    /// # Errors
    ///
    /// Same as [`Self::measure`].
    pub async fn ncloc(&self, component: &str, branch: Option<&str>) -> Result<Option<u64>, ClientError> {
        self.measure(component, branch, "ncloc").await
    }

    /// Date of the last analysis of a component (and branch).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn last_analysis(
        &self,
        component: &str,
        branch: Option<&str>,
    ) -> Result<Option<DateTime<Utc>>, ClientError> {
        let query = Query::new()
            .param("component", component)
            .opt("branch", branch);
        let resp: NavigationResponse = self.get_json("navigation/component", &query).await?;
        Ok(resp.analysis_date)
    }

    /// Fill the lazily loaded project count of a portfolio.
    ///
    /// # Errors
    ///
    /// Same as [`Self::measure`].
    pub async fn load_portfolio_size(&self, portfolio: &mut Portfolio) -> Result<u64, ClientError> {
        let count = self.measure(&portfolio.key, None, "projects").await?.unwrap_or(0);
        Ok(*portfolio.nbr_projects.set(count))
    }

    /// Fill the lazily loaded project count of an application.
    ///
    /// # Errors
    ///
    /// Same as [`Self::measure`].
    pub async fn load_application_size(
        &self,
        application: &mut Application,
    ) -> Result<u64, ClientError> {
        let count = self.measure(&application.key, None, "projects").await?.unwrap_or(0);
        Ok(*application.nbr_projects.set(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "component": {
            "key": "my-app",
            "name": "My App",
            "qualifier": "TRK",
            "measures": [
                {"metric": "ncloc", "value": "12345"},
                {"metric": "coverage", "value": "81.2"}
            ]
        }
    }"#;

    #[test]
    fn reads_integer_measure() {
        let resp: MeasuresResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(measure_value(&resp, "ncloc").unwrap(), Some(12345));
        assert_eq!(measure_value(&resp, "projects").unwrap(), None);
    }

    #[test]
    fn non_integer_measure_is_parse_error() {
        let resp: MeasuresResponse = serde_json::from_str(FIXTURE).unwrap();
        assert!(matches!(
            measure_value(&resp, "coverage"),
            Err(ClientError::Parse(_))
        ));
    }

    #[test]
    fn never_analyzed_component() {
        let resp: MeasuresResponse =
            serde_json::from_str(r#"{"component": {"key": "new", "measures": []}}"#).unwrap();
        assert_eq!(measure_value(&resp, "ncloc").unwrap(), None);
    }
}
