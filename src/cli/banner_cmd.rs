use clap::Subcommand;

use crate::models::EntityId;

#[derive(Subcommand, Debug, Clone)]
pub enum BannerCmd {
    #[command(about = "Print every banner as JSON")]
    List,
    #[command(about = "Print one banner as JSON (null when absent)")]
    Get {
        #[arg(long, value_name = "ID")]
        id: EntityId,
    },
    #[command(
        about = "Create a banner",
        long_about = "Create a banner with a caller-chosen id. Fails when the id is taken or the html is not well formed."
    )]
    Create {
        #[arg(long, value_name = "ID")]
        id: EntityId,
        #[arg(long, value_name = "HTML")]
        html: String,
    },
    #[command(
        about = "Replace a banner's html",
        long_about = "Set the html of an existing banner and stamp its modified time. Does nothing when the id does not exist."
    )]
    Update {
        #[arg(long, value_name = "ID")]
        id: EntityId,
        #[arg(long, value_name = "HTML")]
        html: String,
    },
    #[command(about = "Delete a banner (no-op when absent)")]
    Delete {
        #[arg(long, value_name = "ID")]
        id: EntityId,
    },
}
