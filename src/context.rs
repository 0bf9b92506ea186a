use std::net::SocketAddr;
use std::path::PathBuf;

use crate::store::StoreConfig;

/// Resolved runtime configuration, decoupled from CLI parsing.
#[derive(Clone, Debug)]
pub struct Context {
    pub store: StoreConfig,
    pub api_listen: SocketAddr,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            store: StoreConfig::new(
                cli.store_endpoint.clone(),
                cli.database.clone(),
                cli.collection.clone(),
            ),
            api_listen: cli.api_listen,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
        }
    }
}
