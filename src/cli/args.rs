use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve and manage HTML banners stored in a document collection",
    long_about = "Runs the banner web UI and REST API, or performs one-shot banner commands against the configured document store.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "BANNERFLOW_STORE_ENDPOINT",
        default_value = "sqlite://.bannerflow/",
        value_name = "ENDPOINT",
        help = "Document store endpoint: sqlite://<dir>, a directory path, or sqlite::memory:"
    )]
    pub store_endpoint: String,

    #[arg(
        long,
        env = "BANNERFLOW_DATABASE",
        default_value = "bannerflow",
        value_name = "NAME",
        help = "Database name inside the store endpoint"
    )]
    pub database: String,

    #[arg(
        long,
        env = "BANNERFLOW_COLLECTION",
        default_value = "banners",
        value_name = "NAME",
        help = "Collection holding banner documents"
    )]
    pub collection: String,

    #[arg(
        long = "log-file",
        env = "BANNERFLOW_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "BANNERFLOW_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080",
        help = "HTTP listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    if dotenvy::from_filename(&dotenv_path).is_ok() {
        log::debug!("loaded env from {}", dotenv_path);
    }
    Cli::parse()
}
