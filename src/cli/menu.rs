//! Interactive menu
//!
//! Offers the five actions in a loop until the operator exits or input ends.
//! A failed action is reported and the menu continues.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::cli::commands;
use crate::cli::console::Console;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::timing::timed;
use crate::infrastructure::di::ServiceContainer;

const MENU: [&str; 5] = [
    "1. Show max of internal nodes and draw tree",
    "2. Generate random tree",
    "3. Convert tree file to text",
    "4. Build tree from keyboard input",
    "5. Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Inspect,
    Generate,
    Convert,
    Input,
    Exit,
}

impl Choice {
    fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Choice::Inspect),
            "2" => Some(Choice::Generate),
            "3" => Some(Choice::Convert),
            "4" => Some(Choice::Input),
            "5" => Some(Choice::Exit),
            _ => None,
        }
    }
}

fn ask_path(console: &mut Console<'_>, question: &str) -> CliResult<Option<PathBuf>> {
    Ok(console
        .ask(question)?
        .filter(|s| !s.is_empty())
        .map(PathBuf::from))
}

fn ask_count(console: &mut Console<'_>, question: &str) -> CliResult<Option<usize>> {
    let Some(answer) = console.ask(question)? else {
        return Ok(None);
    };
    match answer.parse::<usize>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            output::error(
                console.out(),
                &format!("invalid node count '{}': expected a whole number", answer),
            )?;
            Ok(None)
        }
    }
}

fn run_choice(ctx: &ServiceContainer, console: &mut Console<'_>, choice: Choice) -> CliResult<()> {
    let timings = ctx.settings.timings;
    match choice {
        Choice::Inspect => {
            let Some(file) = ask_path(console, "Tree file:")? else {
                return Ok(());
            };
            timed(timings, console, "inspect", |c| commands::inspect(ctx, c, &file))
        }
        Choice::Generate => {
            let Some(nodes) = ask_count(console, "Number of nodes:")? else {
                return Ok(());
            };
            let Some(file) = ask_path(console, "Save to file:")? else {
                return Ok(());
            };
            timed(timings, console, "generate", |c| {
                commands::generate(ctx, c, nodes, &file)
            })
        }
        Choice::Convert => {
            let Some(tree) = ask_path(console, "Tree file:")? else {
                return Ok(());
            };
            let Some(text) = ask_path(console, "Text file:")? else {
                return Ok(());
            };
            timed(timings, console, "convert", |c| {
                commands::convert(ctx, c, &tree, &text)
            })
        }
        Choice::Input => {
            let question = format!(
                "Number of nodes (at most {}):",
                ctx.settings.interactive_limit
            );
            let Some(nodes) = ask_count(console, &question)? else {
                return Ok(());
            };
            let Some(file) = ask_path(console, "Save to file:")? else {
                return Ok(());
            };
            timed(timings, console, "input", |c| {
                commands::input(ctx, c, nodes, &file)
            })
        }
        Choice::Exit => Ok(()),
    }
}

/// Run the menu until "Exit" or end of input.
pub fn run_menu(ctx: &ServiceContainer, console: &mut Console<'_>) -> CliResult<()> {
    loop {
        output::header(console.out(), "Menu")?;
        for line in MENU {
            output::info(console.out(), line)?;
        }
        let Some(answer) = console.ask("Choose an action:")? else {
            debug!("input closed, leaving menu");
            return Ok(());
        };
        let Some(choice) = Choice::parse(&answer) else {
            output::warning(
                console.out(),
                &format!("unknown action '{}', choose 1-5", answer),
            )?;
            continue;
        };
        if choice == Choice::Exit {
            return Ok(());
        }
        debug!(?choice, "menu action");
        if let Err(e) = run_choice(ctx, console, choice) {
            warn!(error = %e, "menu action failed");
            output::error(console.out(), &e)?;
        }
    }
}
