//! Command-line definitions and output helpers for the `reelpage` binary.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelpage_services::{UploadError, UploadOutcome};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "reelpage",
    version,
    about = "Move linked videos from a Notion database into its pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Process every unprocessed item in the database (default)
    Sync,
    /// List unprocessed items without touching them
    Pending,
    /// Upload local files and attach them to a page
    Upload {
        /// Page ID that receives the attachments
        document_id: String,
        /// Files to upload, attached in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// The subcommand to run; `sync` when none is given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Sync)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// JSON line for one file handled by `reelpage upload`.
pub fn upload_result_json(file: &Path, result: &Result<UploadOutcome, UploadError>) -> JsonValue {
    match result {
        Ok(outcome) => json!({
            "file": file.display().to_string(),
            "success": true,
            "upload_id": outcome.upload_id,
            "kind": outcome.attachment_kind,
            "mode": outcome.mode.as_str(),
            "parts_sent": outcome.parts_sent,
        }),
        Err(e) => json!({
            "file": file.display().to_string(),
            "success": false,
            "phase": e.phase().as_str(),
            "status": e.upstream_status(),
            "error": e.to_string(),
        }),
    }
}
