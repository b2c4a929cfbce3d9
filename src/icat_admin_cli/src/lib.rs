use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use icat_client::cmd::{DataPublicationTypeArgs, PublicAccessArgs};
use serde::Serialize;

pub mod service_management;

#[derive(Debug, Clone, Copy, ValueEnum, Default, Serialize)]
pub enum LogMode {
    Full,
    Json,
    #[default]
    Compact,
}

/// One-shot provisioning commands for a freshly deployed ICAT server
#[derive(Debug, Serialize, Parser, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Turn debugging information on (repeat for higher levels)
    #[arg(short, long, action = clap::ArgAction::Count, env = "ICAT_ADMIN_DEBUG")]
    pub debug: u8,

    #[command(subcommand)]
    pub command: CliCommands,

    /// Output logs in json format.
    #[clap(long, value_enum)]
    pub log_mode: Option<LogMode>,

    /// File for logs to be written to
    #[arg(long, value_parser)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Subcommand, Clone)]
pub enum CliCommands {
    /// register the "User-defined" data-publication type for a facility
    DataPublicationType(DataPublicationTypeArgs),
    /// seed public read rules and public-step declarations
    PublicAccess(PublicAccessArgs),
}

pub async fn execute(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        CliCommands::DataPublicationType(args) => args.execute().await,
        CliCommands::PublicAccess(args) => args.execute().await,
    }
}
