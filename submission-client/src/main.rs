//! DNC list submission CLI
//!
//! # Usage
//!
//! ```bash
//! dnc-submit --email you@company.com file ./dnc.csv --confirm
//! dnc-submit --email you@company.com url https://files.example.com/dnc.csv --confirm
//! dnc-submit --email you@company.com single spam@example.com
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use common_types::SIGNED_CONTENT_TYPE;
use submission_client::{
    config::{DEFAULT_AIRTABLE_API_URL, DEFAULT_ISSUER_URL},
    AirtableConfig, ClientConfig, FormStatus, LocalFile, SubmissionClient, SubmissionForm,
};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};
use url::Url;

#[derive(Parser)]
#[command(name = "dnc-submit")]
#[command(version)]
#[command(about = "Submit a Do Not Contact list", long_about = None)]
struct Cli {
    /// Base URL of the upload-URL issuer
    #[arg(long, env = "DNC_ISSUER_URL", default_value = DEFAULT_ISSUER_URL)]
    issuer_url: Url,

    /// Airtable API root
    #[arg(long, env = "AIRTABLE_API_URL", default_value = DEFAULT_AIRTABLE_API_URL)]
    airtable_api_url: Url,

    /// Airtable personal access token
    #[arg(long, env = "AIRTABLE_API_KEY", hide_env_values = true)]
    airtable_api_key: String,

    /// Airtable base id
    #[arg(long, env = "AIRTABLE_BASE_ID")]
    airtable_base_id: String,

    /// Airtable table name
    #[arg(long, env = "AIRTABLE_TABLE_NAME")]
    airtable_table_name: String,

    /// Login email of the person submitting the list
    #[arg(long)]
    email: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a CSV list file
    ///
    /// Upload URLs are signed for `text/csv`; files of any other type, `.txt`
    /// included, are rejected by storage.
    File {
        /// Path of the `.csv` list file
        path: PathBuf,
        /// Confirm that the list contains only emails or domains
        #[arg(long)]
        confirm: bool,
    },
    /// Reference a list file already hosted elsewhere
    Url {
        /// URL of the list file
        url: String,
        /// Confirm that the list contains only emails or domains
        #[arg(long)]
        confirm: bool,
    },
    /// Add a single email address or domain
    Single {
        /// Email address or domain
        entry: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            issuer_url: self.issuer_url.clone(),
            airtable: AirtableConfig {
                api_url: self.airtable_api_url.clone(),
                api_key: self.airtable_api_key.clone(),
                base_id: self.airtable_base_id.clone(),
                table_name: self.airtable_table_name.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = SubmissionClient::from_config(&cli.client_config())?;
    let form = SubmissionForm::new(client);

    let file = match &cli.command {
        Command::File { path, .. } => {
            let file = LocalFile::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if file.content_type() != SIGNED_CONTENT_TYPE {
                tracing::warn!(
                    content_type = file.content_type(),
                    "storage only accepts {SIGNED_CONTENT_TYPE} uploads, expect the upload to be rejected"
                );
            }
            Some(file)
        }
        Command::Url { .. } | Command::Single { .. } => None,
    };

    form.edit(|draft| {
        draft.email.clone_from(&cli.email);
        match (&cli.command, file) {
            (Command::File { confirm, .. }, Some(file)) => {
                draft.set_file(file);
                draft.confirmed = *confirm;
            }
            (Command::Url { url, confirm }, _) => {
                draft.set_file_url(url.clone());
                draft.confirmed = *confirm;
            }
            (Command::Single { entry }, _) => draft.set_single_entry(entry.clone()),
            (Command::File { .. }, None) => {}
        }
    });

    let mut status = form.subscribe();
    let progress = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            match &*status.borrow_and_update() {
                FormStatus::Uploading => eprintln!("Uploading..."),
                FormStatus::Recording => eprintln!("Recording submission..."),
                FormStatus::Idle | FormStatus::Succeeded | FormStatus::Failed(_) => {}
            }
        }
    });

    let result = form.submit().await;
    progress.abort();

    let receipt = result.context("DNC list submission failed")?;

    if let Some(message) = form.success_message() {
        println!("{message}");
    }
    if let Some(file_url) = receipt.file_url {
        println!("File: {file_url}");
    }
    println!("Record: {}", receipt.record_id);

    Ok(())
}
