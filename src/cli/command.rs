use clap::Subcommand;

use crate::cli::banner_cmd::BannerCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Banner management commands",
        long_about = "List, inspect, create, update or delete banners directly against the configured document store, without starting the HTTP server."
    )]
    Banner {
        #[command(subcommand)]
        cmd: BannerCmd,
    },
}
