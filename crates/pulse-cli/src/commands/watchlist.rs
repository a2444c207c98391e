use pulse_core::default_watchlist;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let watchlist = default_watchlist();

    match cli.format {
        OutputFormat::Table => output::render_watchlist_table(&watchlist),
        OutputFormat::Json => output::render_json(&watchlist, cli.pretty)?,
    }

    Ok(())
}
