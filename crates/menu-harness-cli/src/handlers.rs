//! Command handlers
//!
//! Each handler writes its primary output to `out` and status lines to
//! stderr through [`Reporter`].

use crate::commands::{CheckArgs, ConfigArgs, DumpArgs, ReportFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_json_report, render_text_report, Reporter};
use crate::tree::{build_tree, render_tree, TreeConfig};
use menu_harness::mock::MenuSnapshot;
use menu_harness::{ExpectationSuite, MatchOptions};
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

fn reporter(config: &CliConfig) -> Reporter {
    Reporter::new(config.color.should_color(), config.verbosity.is_quiet())
}

/// Match a snapshot against a suite and print the report
///
/// Options are layered: suite, then `MENU_HARNESS_*` variables, then
/// `--timeout-ms`. Returns [`CliError::Mismatch`] when the menu does not
/// match.
pub fn execute_check(config: &CliConfig, args: &CheckArgs, out: &mut dyn Write) -> CliResult<()> {
    let reporter = reporter(config);
    let snapshot = MenuSnapshot::from_file(&args.menu)?;
    let suite = ExpectationSuite::from_file(&args.expect)?;

    let mut options = suite.effective_options().with_env_overrides()?;
    if let Some(timeout_ms) = args.timeout_ms {
        options = options.with_timeout(timeout_ms);
    }
    debug!(?options, "effective match options");

    let params = &suite.parameters;
    if params.bus_name() != snapshot.bus_name {
        reporter.warning(&format!(
            "suite expects bus '{}' but the snapshot exports '{}'",
            params.bus_name(),
            snapshot.bus_name
        ));
    }
    if params.menu_object_path() != snapshot.menu_path {
        reporter.warning(&format!(
            "suite expects menu '{}' but the snapshot exports '{}'",
            params.menu_object_path(),
            snapshot.menu_path
        ));
    }

    let bus = snapshot.build_bus();
    let matcher = suite.build(&bus).with_options(options);
    let started = Instant::now();
    let result = matcher.match_menu();
    let elapsed = started.elapsed();
    info!(
        success = result.success(),
        failures = result.failure_count(),
        "check finished"
    );

    match args.format {
        ReportFormat::Json => writeln!(out, "{}", render_json_report(&result)?)?,
        ReportFormat::Text => {
            if !(result.success() && config.verbosity.is_quiet()) {
                out.write_all(
                    render_text_report(
                        &result,
                        params.menu_object_path(),
                        suite.expectation_count(),
                        elapsed,
                        config.color.should_color(),
                    )
                    .as_bytes(),
                )?;
            }
        }
    }

    if result.success() {
        Ok(())
    } else {
        Err(CliError::mismatch(result.failure_count()))
    }
}

/// Print the item tree of a snapshot
pub fn execute_dump(_config: &CliConfig, args: &DumpArgs, out: &mut dyn Write) -> CliResult<()> {
    let snapshot = MenuSnapshot::from_file(&args.menu)?;
    let menu = snapshot.to_menu();
    let tree_config = TreeConfig::default()
        .with_depth(args.max_depth)
        .with_attributes(args.attributes);
    let tree = build_tree(&menu, &tree_config);
    let title = format!("{} {}", snapshot.bus_name, snapshot.menu_path);
    out.write_all(render_tree(&title, &tree).as_bytes())?;
    Ok(())
}

/// Print the effective match options as YAML
pub fn execute_config(config: &CliConfig, args: &ConfigArgs, out: &mut dyn Write) -> CliResult<()> {
    let options = match &args.file {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config(format!(
                    "options file '{}' does not exist",
                    path.display()
                )));
            }
            MatchOptions::from_file(path)?
        }
        None => MatchOptions::default(),
    }
    .with_env_overrides()?;
    if config.verbosity.is_verbose() {
        reporter(config).info("options after MENU_HARNESS_* overrides");
    }
    out.write_all(options.to_yaml()?.as_bytes())?;
    Ok(())
}
