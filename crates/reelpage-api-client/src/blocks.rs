//! Block endpoints: append children, list children, delete.

use crate::types::{BlockRef, PaginatedList};
use crate::{segment, ApiClient};
use reelpage_core::AppResult;
use serde_json::Value as JsonValue;

/// Page size used when listing children.
pub const LIST_PAGE_SIZE: u32 = 100;

impl ApiClient {
    /// `PATCH /blocks/{id}/children`; the new blocks become the last children.
    pub async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<JsonValue>,
    ) -> AppResult<PaginatedList<BlockRef>> {
        self.patch_json(
            &format!("/blocks/{}/children", segment(block_id)),
            &serde_json::json!({ "children": children }),
        )
        .await
    }

    /// One page of `GET /blocks/{id}/children`.
    pub async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<PaginatedList<BlockRef>> {
        let mut query = vec![("page_size", LIST_PAGE_SIZE.to_string())];
        if let Some(cursor) = start_cursor {
            query.push(("start_cursor", cursor.to_string()));
        }
        self.get(&format!("/blocks/{}/children", segment(block_id)), &query)
            .await
    }

    /// Every child of a block, following `next_cursor`.
    pub async fn list_all_block_children(&self, block_id: &str) -> AppResult<Vec<BlockRef>> {
        let mut children = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .list_block_children(block_id, cursor.as_deref())
                .await?;
            children.extend(page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(children)
    }

    /// `DELETE /blocks/{id}` (archives the block).
    pub async fn delete_block(&self, block_id: &str) -> AppResult<BlockRef> {
        self.delete(&format!("/blocks/{}", segment(block_id))).await
    }
}
