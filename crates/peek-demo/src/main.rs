#![forbid(unsafe_code)]

//! peek demo binary entry point.
//!
//! Builds an observable integer with a printing observer and an observable
//! tag list with a tracing observer, then reads and writes both.

mod cli;

use std::fmt::Display;

use peek_core::{ChangeObserver, ObservableConfig, ObservableValue, TracingObserver};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prints changes and equal writes to stdout. Reads are not reported.
struct PrintObserver;

impl<T: Display> ChangeObserver<T> for PrintObserver {
    fn on_set(&self, value: &T) {
        println!(">> OnSet: {value}");
    }

    fn on_change(&self, old: &T, new: &T) {
        println!(">> OnChange: {old} -> {new}");
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "peek_core=trace,peek_demo=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_tracing(opts.verbose);
    let config = ObservableConfig::new(opts.policy);
    info!(policy = %opts.policy, "starting demo");

    let mut counter = ObservableValue::with_config(11, PrintObserver, config.clone());
    println!("got: {}", counter.get());
    counter.set(3);
    println!("got: {}", counter.get());
    counter.set(3);
    println!("version: {}", counter.version());

    let mut tags = ObservableValue::with_config(
        vec!["alpha".to_string()],
        TracingObserver::new("tags"),
        config,
    );
    tags.update(|t| t.push("beta".to_string()));
    tags.set(vec!["alpha".to_string(), "beta".to_string()]);
    let count = tags.with(Vec::len);
    println!("tags: {count} (version {})", tags.version());

    info!("demo finished");
}
