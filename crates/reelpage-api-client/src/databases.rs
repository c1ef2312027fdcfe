//! Database query endpoint.

use crate::types::{Page, PaginatedList};
use crate::{segment, ApiClient};
use reelpage_core::AppResult;
use serde_json::{json, Value as JsonValue};

/// Page size used for database queries.
pub const QUERY_PAGE_SIZE: u32 = 100;

impl ApiClient {
    /// One page of `POST /databases/{id}/query`.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: &JsonValue,
        start_cursor: Option<&str>,
    ) -> AppResult<PaginatedList<Page>> {
        let mut body = json!({
            "filter": filter,
            "page_size": QUERY_PAGE_SIZE,
        });
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        self.post_json(&format!("/databases/{}/query", segment(database_id)), &body)
            .await
    }

    /// Every page matching `filter`, following `next_cursor`.
    pub async fn query_database_all(
        &self,
        database_id: &str,
        filter: &JsonValue,
    ) -> AppResult<Vec<Page>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let batch = self
                .query_database(database_id, filter, cursor.as_deref())
                .await?;
            pages.extend(batch.results);
            match batch.next_cursor {
                Some(next) if batch.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(pages)
    }
}

/// Filter matching rows whose checkbox `property` equals `value`.
pub fn checkbox_equals(property: &str, value: bool) -> JsonValue {
    json!({
        "property": property,
        "checkbox": { "equals": value }
    })
}
