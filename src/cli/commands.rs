//! Command dispatch and handlers

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, TraversalArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{Named, NodeId, Order, Tree, TreeBuilder, TreeResult};

/// Execute the CLI command with the effective settings.
pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    if !settings.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Some(Commands::Generate {
            depth,
            children,
            traversal,
        }) => cmd_generate(*depth, *children, traversal, settings),
        Some(Commands::Traverse {
            file,
            traversal,
            json,
        }) => cmd_traverse(file, traversal, *json, settings),
        Some(Commands::Show { file, json }) => cmd_show(file, *json, settings),
        Some(Commands::Config { command }) => cmd_config(command, settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Names of the nodes visited from `start`, stopping after `stop_after` nodes.
pub fn traversal_names<T: Named>(
    tree: &Tree<T>,
    start: NodeId,
    order: Order,
    stop_after: Option<usize>,
) -> TreeResult<Vec<String>> {
    let mut names = Vec::new();
    tree.traverse(start, order, |node| {
        names.push(node.name().to_string());
        stop_after.map_or(true, |limit| names.len() < limit)
    })?;
    Ok(names)
}

/// Read and parse an outline file into a fresh tree.
pub fn load_outline(path: &Path, indent: usize) -> CliResult<(Tree<String>, NodeId)> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("read outline {}", path.display()), e))?;
    let mut tree = Tree::new();
    let root = TreeBuilder::with_indent(indent).from_outline(&mut tree, &text)?;
    debug!(nodes = tree.len(), "outline loaded");
    Ok((tree, root))
}

fn effective_order(args: &TraversalArgs, settings: &Settings) -> CliResult<Order> {
    if args.stop_after == Some(0) {
        return Err(CliError::InvalidArgs("--stop-after must be at least 1".into()));
    }
    Ok(args.order.unwrap_or(settings.order))
}

#[instrument(level = "debug", skip(settings))]
fn cmd_generate(
    depth: usize,
    children: usize,
    traversal: &TraversalArgs,
    settings: &Settings,
) -> CliResult<()> {
    let order = effective_order(traversal, settings)?;
    let mut tree: Tree<String> = Tree::new();
    let root = TreeBuilder::new().complete(&mut tree, depth, children)?;
    info!(nodes = tree.len(), %order, "generated complete tree");

    let names = traversal_names(&tree, root, order, traversal.stop_after)?;
    output::info(&names.iter().join(&settings.delimiter));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_traverse(
    file: &Path,
    traversal: &TraversalArgs,
    json: bool,
    settings: &Settings,
) -> CliResult<()> {
    let order = effective_order(traversal, settings)?;
    let (tree, root) = load_outline(file, settings.indent)?;

    let names = traversal_names(&tree, root, order, traversal.stop_after)?;
    if json {
        output::info(&serde_json::to_string(&names)?);
    } else {
        output::info(&names.iter().join(&settings.delimiter));
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_show(file: &Path, json: bool, settings: &Settings) -> CliResult<()> {
    let (tree, root) = load_outline(file, settings.indent)?;
    if json {
        let outline = tree.to_outline(root)?;
        output::info(&serde_json::to_string_pretty(&outline)?);
    } else {
        output::info(&tree.to_termtree(root)?);
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::toml_title("effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::note("no home directory, global config unavailable"),
        },
    }
    Ok(())
}
