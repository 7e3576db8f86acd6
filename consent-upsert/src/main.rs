mod args;
mod psql;
mod consent_store;
mod upserter;

use std::env;
use std::process::ExitCode;
use clap::Parser;
use log::{debug, LevelFilter};
use crate::args::Args;
use crate::upserter::{CONFIRMATION, Outcome, run_upsert};

fn main() -> ExitCode {

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    match run_upsert(&args, |key| env::var(key).ok()) {
        Ok(Outcome::Updated) => {
            println!("{}", CONFIRMATION);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Previewed(rendered)) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("Upsert failed: {:?}", err.category());
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
