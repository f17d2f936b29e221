//! Command line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use reachcheck_core::{DisplayPolicy, RunMode};

/// Check which servers in a list are reachable.
#[derive(Parser, Debug)]
#[command(name = "reachcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./reachcheck.ron when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output; repeat for debug and trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe every endpoint of a category (the default)
    Check(CheckArgs),
    /// List the configured categories
    Categories,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Category to check; falls back to the configured default
    pub category: Option<String>,

    /// Per-endpoint deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Probe one endpoint at a time or all at once
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Whether unreachable endpoints are listed
    #[arg(long, value_enum)]
    pub display: Option<DisplayArg>,

    /// Cancel the run once this much wall-clock time has passed
    #[arg(long)]
    pub run_budget_ms: Option<u64>,

    /// Run the check this many times in a row
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            category: None,
            timeout_ms: None,
            mode: None,
            display: None,
            run_budget_ms: None,
            repeat: 1,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Sequential,
    Parallel,
}

impl From<ModeArg> for RunMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Sequential => RunMode::Sequential,
            ModeArg::Parallel => RunMode::Parallel,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayArg {
    All,
    ReachableOnly,
}

impl From<DisplayArg> for DisplayPolicy {
    fn from(value: DisplayArg) -> Self {
        match value {
            DisplayArg::All => DisplayPolicy::All,
            DisplayArg::ReachableOnly => DisplayPolicy::ReachableOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, DisplayArg, ModeArg};
    use clap::Parser;

    #[test]
    fn check_flags_parse() {
        let cli = Cli::parse_from([
            "reachcheck",
            "-vv",
            "check",
            "bdix",
            "--timeout-ms",
            "1500",
            "--mode",
            "parallel",
            "--display",
            "reachable-only",
            "--repeat",
            "3",
        ]);

        assert_eq!(cli.verbose, 2);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("expected check subcommand");
        };
        assert_eq!(args.category.as_deref(), Some("bdix"));
        assert_eq!(args.timeout_ms, Some(1500));
        assert_eq!(args.mode, Some(ModeArg::Parallel));
        assert_eq!(args.display, Some(DisplayArg::ReachableOnly));
        assert_eq!(args.repeat, 3);
    }

    #[test]
    fn zero_repeat_is_rejected() {
        assert!(Cli::try_parse_from(["reachcheck", "check", "--repeat", "0"]).is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["reachcheck", "--quiet"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }
}
