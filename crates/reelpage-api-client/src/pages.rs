//! Page endpoints: property updates.

use crate::types::Page;
use crate::{segment, ApiClient};
use reelpage_core::AppResult;
use serde_json::{json, Value as JsonValue};

impl ApiClient {
    /// `PATCH /pages/{id}` with a `properties` object.
    pub async fn update_page_properties(
        &self,
        page_id: &str,
        properties: JsonValue,
    ) -> AppResult<Page> {
        self.patch_json(
            &format!("/pages/{}", segment(page_id)),
            &json!({ "properties": properties }),
        )
        .await
    }

    /// Replace the page title with a single plain-text run.
    pub async fn set_page_title(&self, page_id: &str, title: &str) -> AppResult<Page> {
        self.update_page_properties(
            page_id,
            json!({
                "title": {
                    "title": [{ "text": { "content": title } }]
                }
            }),
        )
        .await
    }

    /// Set a checkbox property.
    pub async fn set_page_checkbox(
        &self,
        page_id: &str,
        property: &str,
        checked: bool,
    ) -> AppResult<Page> {
        let mut properties = serde_json::Map::new();
        properties.insert(property.to_string(), json!({ "checkbox": checked }));
        self.update_page_properties(page_id, JsonValue::Object(properties))
            .await
    }
}
