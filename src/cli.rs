use clap::{arg, command, ArgAction, ArgMatches};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::combiner::{self, CombineOptions, CombineReport, HeadingMode, OnError};
use crate::error::Result;

pub fn run() -> Result<()> {
    let matches = command!()
        .about("Concatenate every matching file in a directory into one file, with start/end markers around each")
        .arg(arg!([DIRECTORY] "Directory to scan for files").default_value("."))
        .arg(
            arg!(-p --pattern <GLOB> "Glob matched against file names in the directory")
                .default_value(combiner::DEFAULT_PATTERN),
        )
        .arg(
            arg!(-o --output <FILE> "Combined output file, relative to the directory")
                .default_value(combiner::OUTPUT_FILENAME),
        )
        .arg(
            arg!(--"on-error" <MODE> "What to do when a file cannot be read")
                .value_parser(["continue", "abort"])
                .default_value("continue"),
        )
        .arg(
            arg!(--"eager-headings" "Write each heading before reading the file, even if the read then fails")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging();

    let options = options_from_matches(&matches);
    let report = combiner::run(&options)?;
    print_summary(&report, &options);

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("combine_headings=info"));

    // A subscriber may already be installed by an embedding binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn options_from_matches(matches: &ArgMatches) -> CombineOptions {
    let directory = matches
        .get_one::<String>("DIRECTORY")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut options = CombineOptions::new(directory);

    if let Some(pattern) = matches.get_one::<String>("pattern") {
        options.pattern = pattern.clone();
    }
    if let Some(output) = matches.get_one::<String>("output") {
        options.output = PathBuf::from(output);
    }
    options.on_error = match matches.get_one::<String>("on-error").map(String::as_str) {
        Some("abort") => OnError::Abort,
        _ => OnError::Continue,
    };
    if matches.get_flag("eager-headings") {
        options.heading_mode = HeadingMode::Eager;
    }

    options
}

fn print_summary(report: &CombineReport, options: &CombineOptions) {
    println!(
        "Successfully combined {} files into {}",
        report.candidates,
        options.output.display()
    );

    if report.embedded != report.candidates {
        println!(
            "Embedded {} of {} candidate files ({} skipped)",
            report.embedded,
            report.candidates,
            report.skipped.len()
        );
    }
}
