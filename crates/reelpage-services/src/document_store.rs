//! Document store: the Notion database rows the sync loop processes.

use async_trait::async_trait;
use reelpage_api_client::databases::checkbox_equals;
use reelpage_api_client::ApiClient;
use reelpage_core::{AppResult, Config, PendingItem};

/// Queries and mutations the sync loop needs from the datastore.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Items whose processed flag is not set.
    async fn find_pending(&self) -> AppResult<Vec<PendingItem>>;

    /// Remove every child block of the document.
    async fn clear_content(&self, document_id: &str) -> AppResult<()>;

    async fn set_title(&self, document_id: &str, title: &str) -> AppResult<()>;

    async fn set_processed_flag(&self, document_id: &str, processed: bool) -> AppResult<()>;
}

/// [`DocumentStore`] backed by a Notion database.
#[derive(Debug, Clone)]
pub struct NotionDocumentStore {
    client: ApiClient,
    database_id: String,
    processed_property: String,
    url_property: String,
}

impl NotionDocumentStore {
    pub fn new(
        client: ApiClient,
        database_id: impl Into<String>,
        processed_property: impl Into<String>,
        url_property: impl Into<String>,
    ) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            processed_property: processed_property.into(),
            url_property: url_property.into(),
        }
    }

    pub fn from_config(client: ApiClient, config: &Config, database_id: &str) -> Self {
        Self::new(
            client,
            database_id,
            config.processed_property.clone(),
            config.url_property.clone(),
        )
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }
}

#[async_trait]
impl DocumentStore for NotionDocumentStore {
    async fn find_pending(&self) -> AppResult<Vec<PendingItem>> {
        let filter = checkbox_equals(&self.processed_property, false);
        let pages = self
            .client
            .query_database_all(&self.database_id, &filter)
            .await?;

        tracing::debug!(
            database_id = %self.database_id,
            count = pages.len(),
            "Queried pending items"
        );

        Ok(pages
            .into_iter()
            .map(|page| PendingItem {
                url: page.url_property(&self.url_property),
                id: page.id,
            })
            .collect())
    }

    async fn clear_content(&self, document_id: &str) -> AppResult<()> {
        let children = self.client.list_all_block_children(document_id).await?;
        for child in &children {
            self.client.delete_block(&child.id).await?;
        }
        tracing::debug!(document_id, deleted = children.len(), "Cleared page content");
        Ok(())
    }

    async fn set_title(&self, document_id: &str, title: &str) -> AppResult<()> {
        self.client.set_page_title(document_id, title).await?;
        Ok(())
    }

    async fn set_processed_flag(&self, document_id: &str, processed: bool) -> AppResult<()> {
        self.client
            .set_page_checkbox(document_id, &self.processed_property, processed)
            .await?;
        Ok(())
    }
}
