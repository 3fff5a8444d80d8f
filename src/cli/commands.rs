//! Command dispatch and the actions shared by subcommands and the menu

use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::BuildReport;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::console::{collect_flat_values, Console, InteractiveSource};
use crate::cli::error::{CliError, CliResult};
use crate::cli::menu::run_menu;
use crate::cli::output;
use crate::cli::timing::timed;
use crate::config::{global_config_path, Settings};
use crate::domain::ListSource;
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command line.
pub fn execute_command(
    cli: &Cli,
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
) -> CliResult<()> {
    let timings = ctx.settings.timings;
    match &cli.command {
        None | Some(Commands::Menu) => run_menu(ctx, console),
        Some(Commands::Inspect { file }) => {
            timed(timings, console, "inspect", |c| inspect(ctx, c, file))
        }
        Some(Commands::Max { file }) => timed(timings, console, "max", |c| max(ctx, c, file)),
        Some(Commands::Generate { nodes, file }) => timed(timings, console, "generate", |c| {
            generate(ctx, c, *nodes, file)
        }),
        Some(Commands::Input { nodes, file }) => {
            timed(timings, console, "input", |c| input(ctx, c, *nodes, file))
        }
        Some(Commands::List { nodes, from, file }) => timed(timings, console, "list", |c| {
            list(ctx, c, *nodes, from.as_deref(), file)
        }),
        Some(Commands::Convert { tree, text }) => {
            timed(timings, console, "convert", |c| convert(ctx, c, tree, text))
        }
        Some(Commands::Config { command }) => config_command(cli, ctx, console, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "bintree", console.out());
            Ok(())
        }
    }
}

fn format_max(max: f64) -> String {
    if max == f64::NEG_INFINITY {
        format!("{} (no internal nodes)", max)
    } else {
        max.to_string()
    }
}

/// Print the max of internal nodes, then the drawing or a size summary.
#[instrument(level = "debug", skip(ctx, console))]
pub fn inspect(ctx: &ServiceContainer, console: &mut Console<'_>, file: &Path) -> CliResult<()> {
    let inspection = ctx.trees.inspect(file)?;
    let out = console.out();
    output::action(out, "Max of internal nodes", &format_max(inspection.max_internal))?;
    match inspection.rendering {
        Some(drawing) => output::info(out, drawing.trim_end())?,
        None => output::detail(
            out,
            &format!(
                "{} nodes, too large to draw (limit {})",
                inspection.nodes, ctx.settings.display_limit
            ),
        )?,
    }
    Ok(())
}

pub fn max(ctx: &ServiceContainer, console: &mut Console<'_>, file: &Path) -> CliResult<()> {
    let max = ctx.trees.max_internal(file)?;
    output::action(console.out(), "Max of internal nodes", &format_max(max))?;
    Ok(())
}

fn report_build(console: &mut Console<'_>, report: &BuildReport) -> CliResult<()> {
    let out = console.out();
    if report.is_truncated() {
        output::warning(
            out,
            &format!(
                "values ran out: {} of {} nodes built",
                report.nodes, report.requested
            ),
        )?;
    }
    output::success(
        out,
        &format!(
            "Saved tree with {} nodes to {}",
            report.nodes,
            report.path.display()
        ),
    )?;
    Ok(())
}

/// Random tree of `nodes` values, saved and followed by its max.
pub fn generate(
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
    nodes: usize,
    file: &Path,
) -> CliResult<()> {
    let report = ctx.trees.generate_random(nodes, file)?;
    report_build(console, &report)?;
    max(ctx, console, file)
}

/// Keyboard-built tree; aborts without writing on invalid input.
pub fn input(
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
    nodes: usize,
    file: &Path,
) -> CliResult<()> {
    let limit = ctx.settings.interactive_limit;
    let mut source = InteractiveSource::new(console, limit);
    let report = ctx.trees.build(nodes, &mut source, file)?;
    report_build(console, &report)
}

/// Level-order tree from a flat list, prompted or imported from `from`.
pub fn list(
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
    nodes: Option<usize>,
    from: Option<&Path>,
    file: &Path,
) -> CliResult<()> {
    let values = match (from, nodes) {
        (Some(txt), _) => ctx.trees.import_values(txt)?,
        (None, Some(count)) => collect_flat_values(console, count)?,
        (None, None) => {
            return Err(CliError::InvalidArgs(
                "either --nodes or --from is required".into(),
            ))
        }
    };
    let count = nodes.unwrap_or(values.len());
    debug!(collected = values.len(), count, "building from list");
    let mut source = ListSource::new(values);
    let report = ctx.trees.build(count, &mut source, file)?;
    report_build(console, &report)
}

pub fn convert(
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
    tree: &Path,
    text: &Path,
) -> CliResult<()> {
    let lines = ctx.trees.convert(tree, text)?;
    output::success(
        console.out(),
        &format!("Wrote {} values to {}", lines, text.display()),
    )?;
    Ok(())
}

fn config_command(
    cli: &Cli,
    ctx: &ServiceContainer,
    console: &mut Console<'_>,
    command: &ConfigCommands,
) -> CliResult<()> {
    let out = console.out();
    match command {
        ConfigCommands::Show => {
            output::header(out, "Effective configuration")?;
            output::info(out, &ctx.settings.to_toml()?)?;
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if ctx.fs.exists(&path) { "" } else { " (not found)" };
                    output::action(out, "Global", &format!("{}{}", path.display(), state))?;
                }
                None => output::warning(out, "no config directory for this platform")?,
            }
            if let Some(path) = &cli.config {
                output::action(out, "Explicit", &path.display())?;
            }
        }
        ConfigCommands::Init { force } => {
            let target = match (&cli.config, global_config_path()) {
                (Some(path), _) => path.clone(),
                (None, Some(path)) => path,
                (None, None) => {
                    return Err(CliError::Usage(
                        "no config directory for this platform, pass --config <file>".into(),
                    ))
                }
            };
            if ctx.fs.exists(&target) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    target.display()
                )));
            }
            ctx.fs
                .ensure_parent(&target)
                .with_path_context("create config directory", &target)?;
            ctx.fs
                .write(&target, &Settings::template())
                .with_path_context("write config", &target)?;
            output::success(out, &format!("Created {}", target.display()))?;
        }
    }
    Ok(())
}
