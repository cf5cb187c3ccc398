//! Menu Harness CLI: check recorded menus against expectations
//!
//! ## Usage
//!
//! ```bash
//! menu-harness check --menu sound.yaml --expect sound-suite.yaml
//! menu-harness check -m sound.yaml -e suite.yaml --format json
//! menu-harness dump --menu sound.yaml --attributes
//! menu-harness config --file options.yaml
//! ```

use clap::Parser;
use menu_harness_cli::handlers::{execute_check, execute_config, execute_dump};
use menu_harness_cli::{init_logging, Cli, CliConfig, CliResult, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();

    init_logging(config.verbosity);
    let color = config.color.should_color();
    console::set_colors_enabled(color);
    console::set_colors_enabled_stderr(color);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli, config: &CliConfig) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Check(args) => execute_check(config, args, &mut out),
        Commands::Dump(args) => execute_dump(config, args, &mut out),
        Commands::Config(args) => execute_config(config, args, &mut out),
    }
}
