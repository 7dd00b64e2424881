pub mod align;
pub mod check;
pub mod cli;
pub mod columns;
pub mod convert;
pub mod error;
pub mod export;
pub mod ingest;
pub mod io_utils;
pub mod order;
pub mod schema;
pub mod table;
pub mod text;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands},
    order::DeclaredColumnOrder,
    schema::SchemaDescription,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("survey_csv", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => columns::execute(&args),
        Commands::Sort(args) => handle_sort(&args),
        Commands::Align(args) => align::execute(&args),
        Commands::Check(args) => check::execute(&args),
    }
}

fn handle_sort(args: &cli::SortArgs) -> Result<()> {
    let schema = SchemaDescription::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    let order = DeclaredColumnOrder::new(&schema)?;
    let mut headers = args
        .headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect::<Vec<_>>();
    debug!("Sorting header(s): {:?}", headers);
    order.sort_headers(&mut headers);
    println!("{}", headers.iter().join(","));
    Ok(())
}
