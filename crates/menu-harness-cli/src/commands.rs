//! CLI command definitions using clap

use crate::config::{CliConfig, ColorChoice, Verbosity};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Menu Harness: check recorded menus against expectation suites
#[derive(Parser, Debug)]
#[command(name = "menu-harness")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration derived from the global flags
    #[must_use]
    pub fn config(&self) -> CliConfig {
        CliConfig::new()
            .with_verbosity(Verbosity::from_flags(self.verbose, self.quiet))
            .with_color(self.color.into())
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a menu snapshot against an expectation suite
    Check(CheckArgs),

    /// Print the item tree of a menu snapshot
    Dump(DumpArgs),

    /// Show effective match options
    Config(ConfigArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Menu snapshot (YAML)
    #[arg(short, long)]
    pub menu: PathBuf,

    /// Expectation suite (YAML)
    #[arg(short, long)]
    pub expect: PathBuf,

    /// Override the match deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Report format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable failure listing
    #[default]
    Text,
    /// JSON report
    Json,
}

/// Arguments for the dump command
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Menu snapshot (YAML)
    #[arg(short, long)]
    pub menu: PathBuf,

    /// Show every attribute instead of action and label only
    #[arg(short, long)]
    pub attributes: bool,

    /// Maximum nesting depth to print
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Options file (YAML) layered under environment overrides
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_check_command() {
            let cli = Cli::parse_from([
                "menu-harness",
                "check",
                "--menu",
                "menu.yaml",
                "--expect",
                "suite.yaml",
            ]);
            let Commands::Check(args) = cli.command else {
                panic!("expected check");
            };
            assert_eq!(args.menu, PathBuf::from("menu.yaml"));
            assert_eq!(args.expect, PathBuf::from("suite.yaml"));
            assert_eq!(args.format, ReportFormat::Text);
            assert!(args.timeout_ms.is_none());
        }

        #[test]
        fn test_parse_check_overrides() {
            let cli = Cli::parse_from([
                "menu-harness",
                "check",
                "-m",
                "a.yaml",
                "-e",
                "b.yaml",
                "--timeout-ms",
                "250",
                "--format",
                "json",
            ]);
            let Commands::Check(args) = cli.command else {
                panic!("expected check");
            };
            assert_eq!(args.timeout_ms, Some(250));
            assert_eq!(args.format, ReportFormat::Json);
        }

        #[test]
        fn test_check_requires_files() {
            assert!(Cli::try_parse_from(["menu-harness", "check"]).is_err());
        }

        #[test]
        fn test_parse_dump_command() {
            let cli = Cli::parse_from(["menu-harness", "dump", "--menu", "m.yaml", "-a"]);
            let Commands::Dump(args) = cli.command else {
                panic!("expected dump");
            };
            assert!(args.attributes);
            assert!(args.max_depth.is_none());
        }

        #[test]
        fn test_parse_config_command() {
            let cli = Cli::parse_from(["menu-harness", "config"]);
            assert!(matches!(cli.command, Commands::Config(ConfigArgs { file: None })));
        }
    }

    mod global_flag_tests {
        use super::*;

        #[test]
        fn test_verbose_count() {
            let cli = Cli::parse_from(["menu-harness", "-vv", "config"]);
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.config().verbosity, Verbosity::Debug);
        }

        #[test]
        fn test_quiet_after_subcommand() {
            let cli = Cli::parse_from(["menu-harness", "config", "-q"]);
            assert!(cli.config().verbosity.is_quiet());
        }

        #[test]
        fn test_color_flag() {
            let cli = Cli::parse_from(["menu-harness", "--color", "never", "config"]);
            assert_eq!(cli.config().color, ColorChoice::Never);
        }

        #[test]
        fn test_color_arg_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }
    }
}
