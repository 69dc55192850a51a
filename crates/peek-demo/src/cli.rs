#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand. Environment variables with the `PEEK_DEMO_` prefix
//! provide defaults that command-line flags override.

use std::env;
use std::process;

use peek_core::{EqualWritePolicy, ParsePolicyError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
peek demo: an observable integer and an observable tag list

USAGE:
    peek-demo [OPTIONS]

OPTIONS:
    --policy=POLICY   Equal-write policy: 'notify' or 'replace' (default: notify)
    --verbose, -v     Log every hook through tracing at TRACE level
    --help, -h        Show this help message
    --version, -V     Show version

ENVIRONMENT VARIABLES:
    PEEK_DEMO_POLICY   Override --policy default
    PEEK_DEMO_VERBOSE  Enable --verbose (1/true/yes/on)
    RUST_LOG           tracing filter directives (takes precedence over --verbose)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Behavior of writes that repeat the stored value.
    pub policy: EqualWritePolicy,
    /// Emit trace-level hook logs.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            policy: EqualWritePolicy::Notify,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidPolicy {
        source: &'static str,
        error: ParsePolicyError,
    },
    UnknownArg(String),
}

fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Opts {
    /// Parse options from the process environment and arguments.
    ///
    /// Exits the process on `--help`, `--version` or invalid input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("peek-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidPolicy { source, error }) => {
                eprintln!("Invalid {source}: {error}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment defaults first
        if let Some(val) = get_env("PEEK_DEMO_POLICY") {
            opts.policy = val.parse().map_err(|error| ParseError::InvalidPolicy {
                source: "PEEK_DEMO_POLICY",
                error,
            })?;
        }
        if let Some(val) = get_env("PEEK_DEMO_VERBOSE") {
            opts.verbose = env_flag(&val);
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--verbose" | "-v" => opts.verbose = true,
                other => {
                    let Some(val) = other.strip_prefix("--policy=") else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    };
                    opts.policy = val.parse().map_err(|error| ParseError::InvalidPolicy {
                        source: "--policy",
                        error,
                    })?;
                }
            }
        }

        Ok(opts)
    }
}
