//! Quipdoc - Command-line access to remote documents and spreadsheets
//!
//! Reads the access token and base URL from the environment (or a `.env`
//! file) unless given on the command line.

mod commands;

use clap::{Parser, Subcommand};
use edit_engine::Format;
use remote_client::{ClientConfig, RemoteClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quipdoc-cli")]
#[command(about = "Read and edit remote documents and spreadsheets", long_about = None)]
pub struct Cli {
    /// Access token; defaults to QUIP_ACCESS_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Service base URL; defaults to QUIP_BASE_URL or the public platform
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a thread's identity fields and outline
    Show { thread_id: String },

    /// List the lists of a document and their item anchors
    Lists { thread_id: String },

    /// List the sheets of a spreadsheet and their columns
    Sheets { thread_id: String },

    /// Export a sheet as an .xlsx workbook, or as JSON with --json
    Export {
        thread_id: String,
        #[arg(long)]
        sheet: Option<String>,
        /// Directory the workbook is written to
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Append a row to a sheet
    AppendRow {
        thread_id: String,
        #[arg(long)]
        sheet: Option<String>,
        /// Cells in column order
        values: Vec<String>,
        /// `Header=value` cells placed by header; used instead of positional values
        #[arg(long = "field", value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Replace one cell, addressed as `Column:row`
    UpdateCell {
        thread_id: String,
        reference: String,
        value: String,
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Add content to the end of a document
    Append {
        thread_id: String,
        content: String,
        #[arg(long)]
        html: bool,
    },

    /// Search thread titles
    Search {
        query: String,
        #[arg(long)]
        count: Option<u32>,
        /// Match content as well as titles
        #[arg(long)]
        content: bool,
    },
}

impl Cli {
    fn client(&self) -> anyhow::Result<Arc<RemoteClient>> {
        let mut config = ClientConfig::from_env().with_accept_invalid_certs(self.insecure);
        if let Some(token) = &self.token {
            config = config.with_access_token(token);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if config.access_token.is_none() {
            tracing::warn!("No access token configured; requests will be anonymous");
        }
        Ok(Arc::new(RemoteClient::new(config)?))
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = cli.client()?;

    match cli.command {
        Commands::Show { thread_id } => commands::show(client, &thread_id),
        Commands::Lists { thread_id } => commands::lists(client, &thread_id),
        Commands::Sheets { thread_id } => commands::sheets(client, &thread_id),
        Commands::Export {
            thread_id,
            sheet,
            dir,
            json,
        } => commands::export(client, &thread_id, sheet.as_deref(), &dir, json),
        Commands::AppendRow {
            thread_id,
            sheet,
            values,
            fields,
        } => commands::append_row(client, &thread_id, sheet.as_deref(), values, fields),
        Commands::UpdateCell {
            thread_id,
            reference,
            value,
            sheet,
        } => commands::update_cell(client, &thread_id, sheet.as_deref(), &reference, value),
        Commands::Append {
            thread_id,
            content,
            html,
        } => {
            let format = if html { Format::Html } else { Format::Markdown };
            commands::append(client, &thread_id, &content, format)
        }
        Commands::Search {
            query,
            count,
            content,
        } => commands::search(&client, &query, content, count),
    }
}
