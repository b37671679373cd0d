//! Generic paginated search.
//!
//! Pages are requested one after another (`p` = 1, 2, ...) until the number
//! of retrieved items reaches the total the server reports, or a page comes
//! back empty. Items land in a [`KeyedCollection`]; a key seen twice keeps
//! the later object and logs a warning.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sq_core::{Keyed, KeyedCollection};

use crate::{ClientError, Query, SonarClient};

/// Description of one search: endpoint, item field, filters and limits.
#[derive(Debug, Clone)]
pub struct Search {
    api: String,
    field: String,
    query: Query,
    page_size: Option<u32>,
    max_results: Option<u64>,
    truncate_at: Option<u64>,
}

impl Search {
    /// Search `api`, reading items from the top-level JSON array `field`.
    #[must_use]
    pub fn new(api: &str, field: &str) -> Self {
        Self {
            api: api.to_string(),
            field: field.to_string(),
            query: Query::new(),
            page_size: None,
            max_results: None,
            truncate_at: None,
        }
    }

    /// Add a filter parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.set(key, value);
        self
    }

    /// Replace all filter parameters.
    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Use this page size instead of the client default.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Fail with [`ClientError::TooManyResults`] when the server reports
    /// more than `limit` results.
    #[must_use]
    pub const fn max_results(mut self, limit: u64) -> Self {
        self.max_results = Some(limit);
        self
    }

    /// Stop after `limit` items even if the server reports more.
    #[must_use]
    pub const fn truncate_at(mut self, limit: u64) -> Self {
        self.truncate_at = Some(limit);
        self
    }
}

/// Server-reported total: `paging.total`, else top-level `total`.
fn page_total(page: &Value) -> Option<u64> {
    page.pointer("/paging/total")
        .or_else(|| page.get("total"))
        .and_then(Value::as_u64)
}

fn page_items<T: DeserializeOwned>(page: Value, field: &str) -> Result<Vec<T>, ClientError> {
    match page {
        Value::Object(mut map) => match map.remove(field) {
            Some(items) => Ok(serde_json::from_value(items)?),
            None => Ok(Vec::new()),
        },
        _ => Err(ClientError::Parse(format!(
            "expected a JSON object holding '{field}'"
        ))),
    }
}

impl SonarClient {
    /// Run a paginated search and collect every item.
    ///
    /// # Errors
    ///
    /// Any failing page aborts the search and its error is returned; items
    /// from earlier pages are discarded. Returns
    /// [`ClientError::TooManyResults`] if a `max_results` limit is exceeded.
    pub async fn search_all<T>(&self, search: &Search) -> Result<KeyedCollection<T>, ClientError>
    where
        T: DeserializeOwned + Keyed,
    {
        let page_size = search.page_size.unwrap_or(self.page_size);
        let mut collection = KeyedCollection::new();
        let mut retrieved: u64 = 0;
        let mut page_number: u32 = 1;

        loop {
            let mut query = search.query.clone();
            query.set("ps", page_size);
            query.set("p", page_number);
            let page: Value = self.get_json(&search.api, &query).await?;

            let total = page_total(&page);
            if let (Some(limit), Some(total)) = (search.max_results, total)
                && total > limit
            {
                return Err(ClientError::TooManyResults { total, limit });
            }

            let items: Vec<T> = page_items(page, &search.field)?;
            if items.is_empty() {
                break;
            }
            retrieved += items.len() as u64;
            for item in items {
                let key = item.key().to_string();
                if collection.insert(item).is_some() {
                    tracing::warn!(api = %search.api, %key, "duplicate key in search results, keeping the later one");
                }
            }
            tracing::debug!(api = %search.api, page = page_number, retrieved, ?total, "search page");

            let Some(total) = total else { break };
            if retrieved >= total {
                break;
            }
            if search.truncate_at.is_some_and(|limit| retrieved >= limit) {
                tracing::warn!(api = %search.api, retrieved, total, "search truncated");
                break;
            }
            page_number += 1;
        }

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        key: String,
    }

    #[test]
    fn total_from_paging_or_top_level() {
        assert_eq!(page_total(&json!({"paging": {"total": 7}})), Some(7));
        assert_eq!(page_total(&json!({"total": 3, "issues": []})), Some(3));
        assert_eq!(page_total(&json!({"branches": []})), None);
    }

    #[test]
    fn items_from_field() {
        let items: Vec<Item> =
            page_items(json!({"components": [{"key": "a"}, {"key": "b"}]}), "components").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].key, "b");

        let missing: Vec<Item> = page_items(json!({"paging": {}}), "components").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn non_object_page_is_a_parse_error() {
        let result: Result<Vec<Item>, _> = page_items(json!([1, 2]), "components");
        assert!(matches!(result, Err(ClientError::Parse(_))));
    }
}
