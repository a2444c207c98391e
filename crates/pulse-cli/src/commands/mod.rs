mod changes;
mod watchlist;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Changes(args) => changes::run(cli, args).await,
        Command::Watchlist => watchlist::run(cli),
    }
}
