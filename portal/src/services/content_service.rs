//! Content business logic service.
//!
//! One service over the six public collections the site publishes and the
//! admin console edits: books, events, FAQs, scholars, services, and unit
//! libraries. The backend returns full collections, so search and
//! pagination happen here in memory.

use crate::api::common::{PaginationFilter, apply_pagination};
use crate::catalog::generate_catalog_url;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::backend_client::BackendClient;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The content collections managed through the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Books,
    Events,
    Faqs,
    Scholars,
    Services,
    UnitLibraries,
}

impl ResourceKind {
    /// Backend endpoint for this collection.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Books => "books.php",
            ResourceKind::Events => "events.php",
            ResourceKind::Faqs => "faqs.php",
            ResourceKind::Scholars => "scholars.php",
            ResourceKind::Services => "services.php",
            ResourceKind::UnitLibraries => "unit_libraries.php",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            ResourceKind::Books => "Book",
            ResourceKind::Events => "Event",
            ResourceKind::Faqs => "FAQ",
            ResourceKind::Scholars => "Scholar",
            ResourceKind::Services => "Service",
            ResourceKind::UnitLibraries => "Unit library",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Books => "books",
            ResourceKind::Events => "events",
            ResourceKind::Faqs => "faqs",
            ResourceKind::Scholars => "scholars",
            ResourceKind::Services => "services",
            ResourceKind::UnitLibraries => "unit-libraries",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "books" => Ok(ResourceKind::Books),
            "events" => Ok(ResourceKind::Events),
            "faqs" => Ok(ResourceKind::Faqs),
            "scholars" => Ok(ResourceKind::Scholars),
            "services" => Ok(ResourceKind::Services),
            "unit-libraries" => Ok(ResourceKind::UnitLibraries),
            _ => Err(format!("Unknown resource kind: {}", input)),
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ContentService<'a> {
    backend: &'a BackendClient,
}

impl<'a> ContentService<'a> {
    pub fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// List a collection with optional substring search and pagination.
    ///
    /// Returns the page of items plus the total count after filtering.
    pub async fn list(
        &self,
        kind: ResourceKind,
        query: Option<&str>,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Value>, u64)> {
        let data = self.backend.fetch(kind.path()).await?;
        let items = match data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            _ => {
                return Err(ServiceError::external_service(format!(
                    "{} list is not an array",
                    kind.entity()
                )));
            }
        };

        let filtered: Vec<Value> = match query.map(str::trim) {
            Some(needle) if !needle.is_empty() => items
                .into_iter()
                .filter(|item| matches_query(item, needle))
                .collect(),
            _ => items,
        };

        let total = filtered.len() as u64;
        Ok((apply_pagination(filtered, pagination), total))
    }

    /// Fetch a single record by id.
    pub async fn fetch_one(&self, kind: ResourceKind, id: i64) -> ServiceResult<Value> {
        let data = self
            .backend
            .fetch(&format!("{}?id={}", kind.path(), id))
            .await?;
        if data.is_null() {
            Err(ServiceError::not_found(kind.entity(), id.to_string()))
        } else {
            Ok(data)
        }
    }

    /// Create a record; the body is passed through to the backend untouched.
    pub async fn create(&self, kind: ResourceKind, body: Value) -> ServiceResult<Value> {
        if !body.is_object() {
            return Err(ServiceError::validation(format!(
                "{} payload must be a JSON object",
                kind.entity()
            )));
        }
        self.backend.create(kind.path(), &body).await
    }

    /// Update an existing record.
    pub async fn update(&self, kind: ResourceKind, id: i64, body: Value) -> ServiceResult<Value> {
        if !body.is_object() {
            return Err(ServiceError::validation(format!(
                "{} payload must be a JSON object",
                kind.entity()
            )));
        }
        self.backend
            .update(&format!("{}?id={}", kind.path(), id), &body)
            .await
    }

    /// Delete a record.
    pub async fn remove(&self, kind: ResourceKind, id: i64) -> ServiceResult<Value> {
        self.backend
            .delete(&format!("{}?id={}", kind.path(), id))
            .await
    }

    /// Resolve a book to its catalog deep link.
    ///
    /// Books without a catalog record produce a validation error the UI
    /// surfaces as a "try again" message; no navigation happens.
    pub async fn book_deep_link(&self, id: i64) -> ServiceResult<String> {
        let book = self.fetch_one(ResourceKind::Books, id).await?;
        let bib_id = book
            .get("bib_id")
            .and_then(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| ServiceError::validation("Book has no catalog record"))?;

        Ok(generate_catalog_url(&bib_id))
    }
}

/// Case-insensitive substring match against the record's top-level string
/// fields.
fn matches_query(item: &Value, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    match item {
        Value::Object(fields) => fields.values().any(|value| {
            value
                .as_str()
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false)
        }),
        Value::String(s) => s.to_lowercase().contains(&needle),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_kind_slugs_round_trip() {
        for kind in [
            ResourceKind::Books,
            ResourceKind::Events,
            ResourceKind::Faqs,
            ResourceKind::Scholars,
            ResourceKind::Services,
            ResourceKind::UnitLibraries,
        ] {
            assert_eq!(ResourceKind::from_str(kind.as_str()), Ok(kind));
        }
        assert!(ResourceKind::from_str("members").is_err());
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let book = json!({
            "id": 4,
            "title": "Noli Me Tangere",
            "author": "Jose Rizal",
            "bib_id": "305"
        });

        assert!(matches_query(&book, "noli"));
        assert!(matches_query(&book, "RIZAL"));
        assert!(!matches_query(&book, "ibong"));
        // Numeric fields are not searched
        assert!(!matches_query(&book, "4"));
    }
}
