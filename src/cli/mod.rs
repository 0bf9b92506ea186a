mod args;
mod banner_cmd;
mod command;

pub use args::Cli;
pub use banner_cmd::BannerCmd;
pub use command::Command;

pub use args::parse;
