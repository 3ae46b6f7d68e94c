use crate::opts::{Opts, Subcommand};
use crate::prelude::*;

mod cli;
mod garage;
mod helpers;
mod opts;
mod prelude;
mod store;
mod wargaming;
mod web;

#[tokio::main]
async fn main() -> Result {
    let opts = opts::parse();
    let _sentry_guard = helpers::tracing::init(opts.sentry_dsn.clone(), opts.traces_sample_rate)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting…");

    let start_instant = Instant::now();
    let result = run_subcommand(opts).await;
    if let Err(error) = &result {
        error!("failed: {:#}", error);
    } else {
        info!(elapsed = %format_elapsed(start_instant), "finished");
    }
    result
}

async fn run_subcommand(opts: Opts) -> Result {
    match opts.subcommand {
        Subcommand::Web(opts) => web::run(&opts).await,
        Subcommand::Pick(opts) => cli::pick(opts).await,
        Subcommand::List(opts) => cli::list(opts).await,
        Subcommand::Blacklist(opts) => cli::blacklist(opts),
        Subcommand::Clear(opts) => cli::clear(opts),
    }
}
