//! Command-line interface for unmangle
//! Rewrites an obfuscated script file into a human-readable equivalent.
//!
//! Usage:
//!   unmangle `<path>` [--output `<path>`] [--threshold `<n>`]   - Rewrite a source file
//!   unmangle `<path>` --rules                                  - Also apply the single-pass rule filter
//!   unmangle `<path>` --stats                                  - Print the rewrite report as JSON

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;
use unmangle::config::Loader;
use unmangle::loader::{write_atomic, SourceLoader};
use unmangle::rules::apply_rules;
use unmangle::SourceProcessor;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("unmangle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for rewriting obfuscated script source into readable form")
        .arg_required_else_help(true)
        .arg(Arg::new("path").help("Path to the obfuscated source file").required(true).index(1))
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the rewritten source to this file (default: stdout)"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .short('t')
                .value_parser(clap::value_parser!(i64))
                .help("Minimum array length (exclusive) for substitution"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("legacy-depth")
                .long("legacy-depth")
                .action(ArgAction::SetTrue)
                .help("Restore the historical unclamped depth decrement"),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .action(ArgAction::SetTrue)
                .help("Apply the single-pass rule filter after the rewrite"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .action(ArgAction::SetTrue)
                .help("Print the rewrite report as JSON to stderr"),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is required");

    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(threshold) = matches.get_one::<i64>("threshold") {
        loader = loader
            .set_override("rewrite.threshold", *threshold)
            .unwrap_or_else(|e| fail(&format!("invalid threshold: {}", e)));
    }
    if matches.get_flag("legacy-depth") {
        loader = loader
            .set_override("compat.legacy_depth", true)
            .unwrap_or_else(|e| fail(&format!("invalid override: {}", e)));
    }
    let config = loader
        .build()
        .unwrap_or_else(|e| fail(&format!("configuration error: {}", e)));

    let source = SourceLoader::from_path(path)
        .unwrap_or_else(|e| fail(&format!("cannot read {}: {}", path, e)));

    let rewrite = SourceProcessor::new(config)
        .process(source.source())
        .unwrap_or_else(|e| fail(&format!("rewrite failed: {}", e)));

    let mut output = rewrite.output;
    if matches.get_flag("rules") {
        output = apply_rules(&output);
    }

    if matches.get_flag("stats") {
        let report = serde_json::to_string_pretty(&rewrite.report)
            .unwrap_or_else(|e| fail(&format!("cannot serialize report: {}", e)));
        eprintln!("{}", report);
    }

    match matches.get_one::<String>("output") {
        Some(out_path) => {
            write_atomic(out_path, &output)
                .unwrap_or_else(|e| fail(&format!("cannot write {}: {}", out_path, e)));
        }
        None => print!("{}", output),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
