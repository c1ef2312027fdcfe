//! reelpage: moves media linked from a Notion database into its pages.
//!
//! Set NOTION_TOKEN and NOTION_DATABASE_ID (a .env file is read).

use anyhow::Context;
use clap::Parser;
use reelpage_api_client::ApiClient;
use reelpage_cli::{print_json, upload_result_json, Cli, Commands};
use reelpage_core::Config;
use reelpage_infra::{init_telemetry, TelemetryOptions};
use reelpage_services::{
    DocumentStore, NotionDocumentStore, SyncService, UploadOrchestrator, YtDlpRetriever,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()
        .context("Failed to load configuration. Set NOTION_TOKEN (and NOTION_DATABASE_ID)")?;
    init_telemetry(&TelemetryOptions::from_config(&config))?;
    tracing::info!(environment = %config.environment, "reelpage starting");

    let client = ApiClient::from_config(&config).context("Failed to create Notion client")?;

    match cli.command() {
        Commands::Sync => {
            let database_id = config.require_database_id()?;
            let store = NotionDocumentStore::from_config(client.clone(), &config, database_id);
            let service = SyncService::new(
                Arc::new(store),
                Arc::new(YtDlpRetriever::from_config(&config)),
                UploadOrchestrator::new(Arc::new(client)),
            );
            let report = service
                .run()
                .await
                .context("Failed to query pending items")?;
            print_json(&report)?;
        }
        Commands::Pending => {
            let database_id = config.require_database_id()?;
            let store = NotionDocumentStore::from_config(client, &config, database_id);
            let items = store
                .find_pending()
                .await
                .context("Failed to query pending items")?;
            print_json(&items)?;
        }
        Commands::Upload { document_id, files } => {
            let orchestrator = UploadOrchestrator::new(Arc::new(client));
            let mut results = Vec::with_capacity(files.len());
            let mut failed = 0;
            for file in &files {
                let result = orchestrator.upload(&document_id, file).await;
                if result.is_err() {
                    failed += 1;
                }
                results.push(upload_result_json(file, &result));
            }
            print_json(&results)?;
            if failed > 0 {
                anyhow::bail!("{} of {} uploads failed", failed, files.len());
            }
        }
    }

    tracing::info!("reelpage finished");
    Ok(())
}
