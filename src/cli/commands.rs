//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::application::services::{AddInputs, Assembler};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{config_template, global_config_path, local_config_path, Settings};
use crate::domain::{EntityKind, Index, NodeArena, ToTermTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SaveOptions;

const TREE_EXTENSION: &str = "json";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };
    if let Commands::Completion { shell } = command {
        cmd_completion(*shell);
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    match command {
        Commands::Paths { inputs, pattern } => cmd_paths(&container, inputs, pattern.as_deref()),
        Commands::Show { inputs } => cmd_show(&container, inputs),
        Commands::Merge {
            inputs,
            group,
            output,
            pretty,
        } => cmd_merge(&container, inputs, group, output, *pretty),
        Commands::Zones { inputs } => cmd_zones(&container, inputs),
        Commands::Bases { inputs } => cmd_bases(&container, inputs),
        Commands::Node { source, path } => cmd_node(&container, source, path),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Expand directories into the stored trees below them, sorted.
fn collect_sources(settings: &Settings, inputs: &[PathBuf]) -> CliResult<Vec<String>> {
    let mut sources = Vec::new();
    for input in inputs {
        let path = settings.resolve_input(input);
        if !path.is_dir() {
            sources.push(path.to_string_lossy().into_owned());
            continue;
        }
        let mut found: Vec<String> = WalkDir::new(&path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == TREE_EXTENSION))
            .map(|e| e.path().to_string_lossy().into_owned())
            .collect();
        if found.is_empty() {
            return Err(CliError::InvalidArgs(format!(
                "no .{} trees in {}",
                TREE_EXTENSION,
                path.display()
            )));
        }
        found.sort();
        debug!("{} trees in {}", found.len(), path.display());
        sources.extend(found);
    }
    Ok(sources)
}

fn assemble(container: &ServiceContainer, inputs: &[PathBuf]) -> CliResult<(Assembler, NodeArena, Index)> {
    let sources = collect_sources(&container.settings, inputs)?;
    let assembler = container.assembler();
    let mut arena = NodeArena::new();
    let tree = assembler.load_many(&mut arena, &sources)?;
    Ok((assembler, arena, tree))
}

#[instrument(skip(container))]
fn cmd_paths(container: &ServiceContainer, inputs: &[PathBuf], pattern: Option<&str>) -> CliResult<()> {
    let pattern = pattern
        .map(|p| Regex::new(p).map_err(|e| CliError::InvalidArgs(format!("pattern {}: {}", p, e))))
        .transpose()?;
    let (_, arena, tree) = assemble(container, inputs)?;
    for path in arena.paths(tree)? {
        if pattern.as_ref().map_or(true, |re| re.is_match(&path)) {
            output::info(&path);
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, inputs: &[PathBuf]) -> CliResult<()> {
    let (_, arena, tree) = assemble(container, inputs)?;
    output::info(&arena.to_term_tree(tree)?);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_merge(
    container: &ServiceContainer,
    inputs: &[PathBuf],
    groups: &[String],
    destination: &Path,
    pretty: bool,
) -> CliResult<()> {
    if inputs.is_empty() && groups.is_empty() {
        return Err(CliError::Usage("nothing to merge, give inputs or --group".into()));
    }
    let assembler = container.assembler();
    let mut arena = NodeArena::new();
    let mut add = AddInputs::new();

    if !inputs.is_empty() {
        let sources = collect_sources(&container.settings, inputs)?;
        add = add.with(assembler.load_many(&mut arena, &sources)?);
    }
    for group in groups {
        let (base, file) = group
            .split_once('=')
            .filter(|(base, file)| !base.is_empty() && !file.is_empty())
            .ok_or_else(|| CliError::InvalidArgs(format!("group {} is not BASE=FILE", group)))?;
        let source = container.settings.resolve_input(Path::new(file));
        let loaded = assembler.load(&mut arena, &source.to_string_lossy())?;
        let zones: Vec<Index> = arena
            .iter_preorder(loaded)
            .filter(|(_, n)| n.data.kind.is_zone_like())
            .map(|(i, _)| i)
            .collect();
        add = add.with_group(base, zones);
    }

    let options = SaveOptions {
        pretty,
        links: Vec::new(),
    };
    let tree = assembler.save(&mut arena, add, &destination.to_string_lossy(), &options)?;
    output::success(&format!(
        "wrote {} nodes to {}",
        arena.iter_preorder(tree).count(),
        destination.display()
    ));
    Ok(())
}

fn print_matching(
    container: &ServiceContainer,
    inputs: &[PathBuf],
    select: impl Fn(&Assembler, &mut NodeArena, Index) -> Result<Vec<Index>, ApplicationError>,
) -> CliResult<()> {
    let (assembler, mut arena, tree) = assemble(container, inputs)?;
    let found = select(&assembler, &mut arena, tree)?;
    for idx in found {
        let kind = arena.kind(idx)?;
        match kind {
            EntityKind::Base => output::info(&arena.path_of(idx)?),
            _ => output::info(&format!("{} <{}>", arena.path_of(idx)?, kind)),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_zones(container: &ServiceContainer, inputs: &[PathBuf]) -> CliResult<()> {
    print_matching(container, inputs, |assembler, arena, tree| {
        assembler.get_zones(arena, tree)
    })
}

#[instrument(skip(container))]
fn cmd_bases(container: &ServiceContainer, inputs: &[PathBuf]) -> CliResult<()> {
    print_matching(container, inputs, |assembler, arena, tree| {
        assembler.get_bases(arena, tree)
    })
}

#[instrument(skip(container))]
fn cmd_node(container: &ServiceContainer, source: &Path, path: &str) -> CliResult<()> {
    let source = container.settings.resolve_input(source);
    let mut arena = NodeArena::new();
    let node = container
        .assembler()
        .read_node(&mut arena, &source.to_string_lossy(), path)?;
    output::info(&arena.to_term_tree(node)?);
    if let Some(value) = &arena.data(node)?.value {
        output::detail(value);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
            } else {
                local_config_path()
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!("{} already exists", path.display())));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, config_template()))
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("write {}", path.display()),
                    source: Box::new(e),
                })?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files");
            let mut paths: Vec<PathBuf> = global_config_path().into_iter().collect();
            paths.push(local_config_path());
            for path in paths {
                if container.fs.exists(&path) {
                    output::success_detail(&path.display());
                } else {
                    output::failure(&path.display());
                }
            }
            Ok(())
        }
    }
}
