//! fuzzysearch: build, update and query fuzzy search indexes from the terminal.

mod config;
mod corpus;
mod output;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use config::Config;
use fuzzysearch::{query_with_stats, Query, RecordId};
use fuzzysearch_telemetry::{timed_span, LogFormat, Timer};
use output::{format_count, format_duration, print_matches, print_stats, Status};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fuzzysearch")]
#[command(about = "Build and query n-gram fuzzy search indexes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./fuzzysearch.toml if present)
    #[arg(long, global = true, env = "FUZZYSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Log line format (compact or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a corpus file
    Build {
        /// Corpus: JSON array of {id, text} or one record per line
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the index
        #[arg(short, long)]
        output: PathBuf,
        /// Indent the index JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Query an index
    Query {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Query text
        text: String,
        /// Maximum number of matches
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Minimum score in [0, 1]
        #[arg(long)]
        min_score: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print pipeline counters and timing
        #[arg(long)]
        stats: bool,
    },
    /// Add a record to an index
    Add {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Record id
        #[arg(long)]
        id: RecordId,
        /// Record text
        text: String,
    },
    /// Replace the text of an existing record
    Replace {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Record id
        #[arg(long)]
        id: RecordId,
        /// New record text
        text: String,
    },
    /// Remove a record from an index
    Remove {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Record id
        #[arg(long)]
        id: RecordId,
    },
    /// Rebuild an index from its stored texts
    Rebuild {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Apply the config file's [index] section before rebuilding
        #[arg(long)]
        reconfigure: bool,
    },
    /// Show index statistics
    Stats {
        /// Index file
        #[arg(short, long)]
        index: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut telemetry = config.schema.log.clone();
    match cli.verbose {
        0 => {}
        1 => telemetry.log_level = "info".to_string(),
        2 => telemetry.log_level = "debug".to_string(),
        _ => telemetry.log_level = "trace".to_string(),
    }
    if let Some(format) = cli.log_format {
        telemetry.format = format;
    }
    fuzzysearch_telemetry::init_with_config(telemetry)?;

    if let Some(path) = &config.path {
        tracing::info!(path = %path.display(), "Loaded config");
    }

    match cli.command {
        Commands::Build { input, output, pretty } => {
            timed_span!("build");
            let records = corpus::read_corpus(&input)?;
            if records.is_empty() {
                Status::warning(&format!("{} contains no records", input.display()));
            }
            let index = fuzzysearch::build_with_config(config.schema.index, records)
                .with_context(|| format!("Failed to index {}", input.display()))?;
            corpus::save_index(&output, &index, pretty)?;
            Status::success(&format!(
                "Indexed {} ({}) into {}",
                format_count(index.len(), "record", "records"),
                format_count(index.gram_count(), "gram", "grams"),
                output.display()
            ));
        }

        Commands::Query { index, text, max_results, min_score, json, stats } => {
            let index = corpus::load_index(&index)?;
            let query = Query::new(text)
                .with_max_results(max_results.unwrap_or(config.schema.query.max_results))
                .with_min_score(min_score.unwrap_or(config.schema.query.min_score));

            let timer = Timer::start("query");
            let (matches, counters) = query_with_stats(&index, &query)?;
            let elapsed = timer.stop();

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                print_matches(&matches);
                if stats {
                    print_stats(&counters);
                    println!("{}", format_duration(elapsed));
                }
            }
        }

        Commands::Add { index: path, id, text } => {
            let mut index = corpus::load_index(&path)?;
            index.add(id, text)?;
            corpus::save_index(&path, &index, false)?;
            Status::success(&format!("Added record {}", id));
        }

        Commands::Replace { index: path, id, text } => {
            let mut index = corpus::load_index(&path)?;
            let previous = index.replace(id, text)?;
            corpus::save_index(&path, &index, false)?;
            Status::success(&format!("Replaced record {} (was {:?})", id, previous.text()));
        }

        Commands::Remove { index: path, id } => {
            let mut index = corpus::load_index(&path)?;
            index.remove(id)?;
            corpus::save_index(&path, &index, false)?;
            Status::success(&format!("Removed record {}", id));
        }

        Commands::Rebuild { index: path, reconfigure } => {
            timed_span!("rebuild");
            let mut index = corpus::load_index(&path)?;
            if reconfigure {
                index.reconfigure(config.schema.index)?;
            } else {
                index.rebuild();
            }
            corpus::save_index(&path, &index, false)?;
            Status::success(&format!(
                "Rebuilt {} with gram size {}",
                format_count(index.len(), "record", "records"),
                index.config().gram_size
            ));
        }

        Commands::Stats { index: path, json } => {
            let index = corpus::load_index(&path)?;
            let postings = index.gram_count();
            let entries: usize = index.records().map(|r| r.grams().len()).sum();
            if json {
                let report = serde_json::json!({
                    "records": index.len(),
                    "grams": postings,
                    "posting_entries": entries,
                    "config": index.config(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                Status::header(&path.display().to_string());
                println!("Records:         {}", index.len());
                println!("Distinct grams:  {}", postings);
                println!("Posting entries: {}", entries);
                println!("Gram size:       {}", index.config().gram_size);
                println!("Scorer:          {:?}", index.config().scorer);
            }
        }
    }

    Ok(())
}
