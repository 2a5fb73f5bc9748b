#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use isnad_core::timing;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "isnad: narrator citation network from hadith transmission chains",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by ISNAD_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors (overridden by ISNAD_LOG).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit per-stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build the narrator graph and export JSON artifacts",
        after_help = "EXAMPLES:\n    isnad build --hadiths all_hadiths_clean.csv --narrators all_rawis.csv\n    isnad build --top-n 200 --sample-size 500 --out dist/data"
    )]
    Build(cmd::build::BuildArgs),

    #[command(about = "Show network statistics and leaderboards")]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Show one narrator's details",
        after_help = "EXAMPLES:\n    isnad narrator 1234 --json"
    )]
    Narrator(cmd::narrator::NarratorArgs),

    #[command(
        about = "Search hadith text and collection names",
        after_help = "EXAMPLES:\n    isnad search intentions\n    isnad search \"Sahih Muslim\" --limit 5"
    )]
    Search(cmd::search::SearchArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_log_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose || env::var("DEBUG").is_ok() {
        "isnad=debug,info"
    } else {
        "isnad=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("ISNAD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose, quiet)));

    let format = env::var("ISNAD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable in JSON mode.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let cwd = env::current_dir()?;

    match &cli.command {
        Commands::Build(args) => {
            timing::timed("cmd.build", || cmd::build::run_build(args, output, &cwd))
        }
        Commands::Stats(args) => {
            timing::timed("cmd.stats", || cmd::stats::run_stats(args, output, &cwd))
        }
        Commands::Narrator(args) => timing::timed("cmd.narrator", || {
            cmd::narrator::run_narrator(args, output, &cwd)
        }),
        Commands::Search(args) => {
            timing::timed("cmd.search", || cmd::search::run_search(args, output, &cwd))
        }
        Commands::Completions(args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }),
    }
}

fn print_timing_report() -> anyhow::Result<()> {
    let report = timing::collect_report();
    if report.is_empty() {
        eprintln!("timing report: no samples recorded");
    } else {
        eprintln!("timing report:");
        eprintln!("{}", report.display_table());
        eprintln!("timing report (json):");
        eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let output = cli.output_mode();
    debug!(?output, "starting");

    let result = run(&cli, output);

    if timing_enabled && let Err(err) = print_timing_report() {
        eprintln!("timing report failed: {err:#}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let diagnostic = CliError::from_anyhow(&err);
            debug!(code = %diagnostic.error_code, "command failed");
            if render_error(output, &diagnostic).is_err() {
                eprintln!("error[{}]: {}", diagnostic.error_code, diagnostic.message);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["isnad", "--timing", "stats"]);
        assert!(cli.timing);
    }

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["isnad", "build", "--timing", "--top-n", "10"]);
        assert!(cli.timing);
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["isnad", "stats", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parsed() {
        let cli = Cli::parse_from(["isnad", "--format", "text", "stats"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["isnad", "-v", "-q", "stats"]).is_err());
    }

    #[test]
    fn build_overrides_parse() {
        let cli = Cli::parse_from([
            "isnad",
            "build",
            "--hadiths",
            "h.csv",
            "--narrators",
            "n.csv",
            "--max-hadiths",
            "100",
            "--damping",
            "0.9",
            "--sample-size",
            "50",
            "--compact",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.max_hadiths, Some(100));
        assert_eq!(args.sample_size, Some(50));
        assert!(args.compact);
    }

    #[test]
    fn narrator_requires_numeric_id() {
        assert!(Cli::try_parse_from(["isnad", "narrator", "abc"]).is_err());
        let cli = Cli::parse_from(["isnad", "narrator", "42"]);
        assert!(matches!(cli.command, Commands::Narrator(ref a) if a.id == 42));
    }

    #[test]
    fn search_defaults() {
        let cli = Cli::parse_from(["isnad", "search", "prayer"]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "prayer");
        assert_eq!(args.limit, 50);
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["isnad", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn log_filter_defaults() {
        assert_eq!(default_log_filter(false, true), "warn");
        assert_eq!(default_log_filter(true, false), "isnad=debug,info");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
