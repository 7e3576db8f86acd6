use std::path::PathBuf;
use clap::Parser;

/// Upsert a consent mapping into the consents table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// the person identifier, e.g. people/123. Rows are unique on this value
    #[arg(long)]
    pub person_name: String,
    /// Human-friendly name
    #[arg(long)]
    pub display_name: String,
    /// Email address
    #[arg(long)]
    pub email: String,
    /// Postgres connection string (defaults to DATABASE_URL env var)
    #[arg(long)]
    pub database_url: Option<String>,
    /// the psql executable to invoke
    #[arg(long, env = "PSQL_PATH", default_value = "psql")]
    pub psql_path: PathBuf,
    /// create the consents table first if it does not exist
    #[arg(long, default_value = "false")]
    pub create_table: bool,
    /// talk to postgres directly instead of going through psql
    #[arg(long, default_value = "false", conflicts_with = "dry_run")]
    pub native: bool,
    /// print the psql invocation instead of running it
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}
