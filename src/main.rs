//! Command line entry point for the collection drills.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use chrono::NaiveTime;
use clap::Parser;
use tracing::info;

use collection_drill::{
    config::{sample_pairs, OperationTargets},
    driver::{run_list_drill, run_map_drill, run_queue_drill, run_set_drill},
    times::{load_times, parse_time},
    KeyedMapStore, OrderedKey,
};

/// Drill search, sort, insert and delete operations over keyed maps and time-value collections.
#[derive(Parser, Debug)]
#[command(name = "collection-drill")]
#[command(version, about)]
struct Args {
    /// File of newline-delimited times for the list, set and queue drills
    #[arg(short, long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Time searched for in the list, set and queue drills
    #[arg(long, value_name = "TIME", default_value = "08:30", value_parser = parse_time)]
    find: NaiveTime,

    /// Key searched for and removed, as PRIMARY/SECONDARY
    #[arg(long, value_name = "KEY")]
    search_key: Option<OrderedKey>,

    /// Key inserted, as PRIMARY/SECONDARY
    #[arg(long, value_name = "KEY")]
    insert_key: Option<OrderedKey>,

    /// Value searched for and removed
    #[arg(long, value_name = "NAME")]
    search_value: Option<String>,

    /// Value inserted
    #[arg(long, value_name = "NAME")]
    insert_value: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    setup_tracing(args.verbose);

    let targets = OperationTargets::default().overlay(
        args.search_key,
        args.insert_key,
        args.search_value.as_deref(),
        args.insert_value.as_deref(),
    );
    info!(?targets, "starting collection drills");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut store = KeyedMapStore::from_pairs(sample_pairs());
    run_map_drill(&mut out, &mut store, &targets).context("failed to write report")?;

    let Some(path) = args.data else {
        info!("no data file given, skipping the time drills");
        return Ok(());
    };

    let values = load_times(&path)?;
    info!(path = %path.display(), count = values.len(), "loaded time values");

    writeln!(out, "\n")?;
    run_list_drill(&mut out, &values, args.find, &path).context("failed to write report")?;
    writeln!(out, "\n")?;
    run_set_drill(&mut out, &values, args.find, &path).context("failed to write report")?;
    writeln!(out, "\n")?;
    run_queue_drill(&mut out, &values, args.find, &path).context("failed to write report")?;

    Ok(())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("collection_drill=debug")
        } else {
            EnvFilter::new("collection_drill=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
