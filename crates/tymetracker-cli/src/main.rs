mod cmd_init;
mod cmd_project;
mod cmd_track;
mod usage;

use anyhow::Result;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tymetracker::{ErrorKind, PathResolver, Tracker, TrackerError};

#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(about = "Track time spent on projects")]
#[command(disable_help_subcommand = true, disable_help_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data file location (default: ~/.tymetracker.json)
    #[arg(long, global = true, env = tymetracker::DATA_FILE_ENV)]
    file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the command overview
    #[arg(short, long, global = true)]
    help: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new data file
    Init,
    /// List projects and their ids
    Lp,
    /// Add a new project
    Ap {
        /// Project name; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Delete a project and its history
    Dp { id: Option<String> },
    /// Start time tracking for a project
    Start { id: Option<String> },
    /// Stop the active time tracking
    Stop,
    /// Show tracked times for a project
    Show { id: Option<String> },
    /// Show a report for a project
    Rep { id: Option<String> },
    /// Show what is being tracked right now
    Status,
}

/// Lowercases the verb so `tt START 1` works like `tt start 1`.
fn normalize_verb(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut iter = args.into_iter();
    let mut out: Vec<OsString> = iter.next().into_iter().collect();
    let mut expect_value = false;
    let mut verb_seen = false;

    for arg in iter {
        if verb_seen || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("--file") => {
                expect_value = true;
                out.push(arg);
            }
            Some(s) if s.starts_with('-') => out.push(arg),
            Some(s) => {
                verb_seen = true;
                out.push(s.to_lowercase().into());
            }
            None => {
                verb_seen = true;
                out.push(arg);
            }
        }
    }
    out
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tymetracker=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    // stdout carries command output only
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Process exit status for a failure, distinct per kind.
fn exit_code(err: &anyhow::Error) -> u8 {
    let Some(err) = err.chain().find_map(|e| e.downcast_ref::<TrackerError>()) else {
        return 1;
    };
    match err {
        TrackerError::StoreNotFound(_) => 3,
        TrackerError::ProjectNotFound(_) => 12,
        TrackerError::NoHomeDirectory => 15,
        _ => match err.kind() {
            ErrorKind::AlreadyExists => 2,
            ErrorKind::Corrupt => 4,
            ErrorKind::Io => 5,
            ErrorKind::InvalidInput => 10,
            ErrorKind::AlreadyActive => 13,
            ErrorKind::NotActive => 14,
            ErrorKind::NotFound => 12,
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.filter(|_| !cli.help) else {
        usage::print();
        return Ok(());
    };

    let mut resolver = PathResolver::new();
    if let Some(file) = cli.file {
        resolver = resolver.with_data_file(file);
    }
    let tracker = Tracker::open(&resolver)?;
    tracing::debug!(path = %tracker.path().display(), "using data file");

    match command {
        Commands::Init => cmd_init::run(&tracker),
        Commands::Lp => cmd_project::run_list(&tracker, cli.json),
        Commands::Ap { name } => cmd_project::run_add(&tracker, &name, cli.json),
        Commands::Dp { id } => cmd_project::run_delete(&tracker, id.as_deref(), cli.json),
        Commands::Start { id } => cmd_track::run_start(&tracker, id.as_deref()),
        Commands::Stop => cmd_track::run_stop(&tracker, cli.json),
        Commands::Show { id } => cmd_track::run_show(&tracker, id.as_deref(), cli.json),
        Commands::Rep { id } => cmd_track::run_report(&tracker, id.as_deref(), cli.json),
        Commands::Status => cmd_track::run_status(&tracker, cli.json),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_verb(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ClapErrorKind::InvalidSubcommand => {
            usage::print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(10);
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tymetracker::ProjectId;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_normalize_verb_lowercases_first_positional() {
        assert_eq!(
            normalize_verb(os(&["tt", "START", "1"])),
            os(&["tt", "start", "1"])
        );
        assert_eq!(
            normalize_verb(os(&["tt", "--json", "Lp"])),
            os(&["tt", "--json", "lp"])
        );
    }

    #[test]
    fn test_normalize_verb_skips_file_value() {
        assert_eq!(
            normalize_verb(os(&["tt", "--file", "/Data/TT.json", "AP", "My", "Name"])),
            os(&["tt", "--file", "/Data/TT.json", "ap", "My", "Name"])
        );
    }

    #[test]
    fn test_normalize_verb_leaves_arguments() {
        assert_eq!(
            normalize_verb(os(&["tt", "ap", "Write", "SPEC"])),
            os(&["tt", "ap", "Write", "SPEC"])
        );
    }

    #[test]
    fn test_parse_add_joins_words() {
        let cli = Cli::try_parse_from(os(&["tt", "ap", "Write", "spec"])).unwrap();
        match cli.command {
            Some(Commands::Ap { name }) => assert_eq!(name, vec!["Write", "spec"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_keeps_flag_like_words() {
        for (args, expected) in [
            (&["tt", "ap", "-5", "degrees"][..], &["-5", "degrees"][..]),
            (&["tt", "ap", "Release", "--json"][..], &["Release", "--json"][..]),
            (&["tt", "ap", "Fix", "-v", "bug"][..], &["Fix", "-v", "bug"][..]),
            (&["tt", "ap", "Help", "-h"][..], &["Help", "-h"][..]),
        ] {
            let cli = Cli::try_parse_from(os(args)).unwrap();
            assert!(!cli.json && !cli.verbose && !cli.help);
            match cli.command {
                Some(Commands::Ap { name }) => assert_eq!(name, expected),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::try_parse_from(os(&["tt"])).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_unknown_verb() {
        let err = Cli::try_parse_from(os(&["tt", "frobnicate"])).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_exit_codes_distinct() {
        let errors = [
            TrackerError::AlreadyExists("/x".into()),
            TrackerError::StoreNotFound("/x".into()),
            TrackerError::corrupt("/x", "bad"),
            TrackerError::Io(std::io::Error::other("io")),
            TrackerError::InvalidInput("bad".into()),
            TrackerError::ProjectNotFound(ProjectId::new(1)),
            TrackerError::AlreadyActive(ProjectId::new(1)),
            TrackerError::NotActive,
            TrackerError::NoHomeDirectory,
        ];
        let mut codes: Vec<u8> = errors
            .into_iter()
            .map(|e| exit_code(&anyhow::Error::from(e)))
            .collect();
        assert!(codes.iter().all(|c| *c > 1));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 9);
    }

    #[test]
    fn test_exit_code_through_context() {
        let err = anyhow::Error::from(TrackerError::NotActive).context("stopping");
        assert_eq!(exit_code(&err), 14);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }
}
