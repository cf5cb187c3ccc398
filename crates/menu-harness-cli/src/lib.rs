//! Menu Harness CLI Library
//!
//! Command-line front end that checks recorded menu snapshots against
//! expectation suites.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;
pub mod tree;

pub use commands::{CheckArgs, Cli, ColorArg, Commands, ConfigArgs, DumpArgs, ReportFormat};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult, EXIT_ERROR, EXIT_MISMATCH};
pub use logging::init_logging;
pub use output::{render_json_report, render_text_report, Reporter};
pub use tree::{build_tree, render_tree, MenuLink, MenuNode, TreeConfig};
