use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::EditorService;
use crate::cli::args::{AttributeArgs, Cli, Commands, ConfigCommands, SettingsCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::ToTextTree;
use crate::config::{global_config_path, Settings};
use crate::domain::{DomainError, NodeAttributes, NodeId, TreeDocument, TreeSettings};
use crate::infrastructure::{FileSystem, InfraError, JsonFileStore, RealFileSystem};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        clap_complete::generate(*shell, &mut Cli::command(), "treedraw", &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    debug!("data file: {}", settings.data_file.display());

    match command {
        Commands::New { value } => _new(&settings, value.as_deref()),
        Commands::Show => _show(&settings),
        Commands::Add { parent, value } => _add(&settings, NodeId(*parent), value),
        Commands::Remove { id } => _remove(&settings, NodeId(*id)),
        Commands::Invert { id } => _invert(&settings, NodeId(*id)),
        Commands::ShiftLeft { id } => _shift(&settings, NodeId(*id), Shift::Left),
        Commands::ShiftRight { id } => _shift(&settings, NodeId(*id), Shift::Right),
        Commands::Update { id, attributes } => _update(&settings, NodeId(*id), attributes),
        Commands::Levels { id } => _levels(&settings, id.map(NodeId)),
        Commands::Random { size } => _random(&settings, *size),
        Commands::Export { output } => _export(&settings, output.as_deref()),
        Commands::Import { file } => _import(&settings, file),
        Commands::Settings { command } => _settings(&settings, command),
        Commands::Config { command } => _config(&settings, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Config layers plus the `--data-file` override.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_file) = &cli.data_file {
        settings.data_file = data_file.clone();
    }
    Ok(settings)
}

fn open_editor(settings: &Settings) -> CliResult<EditorService> {
    let store = JsonFileStore::new(Arc::new(RealFileSystem), &settings.data_file);
    Ok(EditorService::open(
        Arc::new(store),
        &settings.default_root_value,
    )?)
}

fn print_tree(editor: &EditorService, settings: &Settings) {
    output::info(&editor.tree().to_text_tree(settings.show_ids));
}

#[instrument(skip(settings))]
fn _new(settings: &Settings, value: Option<&str>) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    editor.reset(value.unwrap_or(&settings.default_root_value))?;
    output::success("Started a new tree");
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _show(settings: &Settings) -> CliResult<()> {
    let editor = open_editor(settings)?;
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _add(settings: &Settings, parent: NodeId, value: &str) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    let id = editor.add_node(parent, value)?;
    output::action("Added", &format!("node {} under {}", id, parent));
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _remove(settings: &Settings, id: NodeId) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    editor.remove_node(id)?;
    output::action("Removed", &format!("node {} and its subtree", id));
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _invert(settings: &Settings, id: NodeId) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    editor.invert_subtree(id)?;
    output::action("Inverted", &format!("subtree of {}", id));
    print_tree(&editor, settings);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Shift {
    Left,
    Right,
}

#[instrument(skip(settings))]
fn _shift(settings: &Settings, id: NodeId, direction: Shift) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    match direction {
        Shift::Left => editor.shift_left(id)?,
        Shift::Right => editor.shift_right(id)?,
    }
    print_tree(&editor, settings);
    Ok(())
}

/// Current attributes with the given overrides applied.
fn merge_attributes(mut attributes: NodeAttributes, args: &AttributeArgs) -> NodeAttributes {
    if let Some(value) = &args.value {
        attributes.value = value.clone();
    }
    if let Some(color) = &args.background_color {
        attributes.background_color = color.clone();
    }
    if let Some(color) = &args.text_color {
        attributes.text_color = color.clone();
    }
    if let Some(width) = args.width {
        attributes.node_width = width;
    }
    if let Some(height) = args.height {
        attributes.node_height = height;
    }
    let line = &mut attributes.line_attributes;
    if let Some(color) = &args.line_color {
        line.line_color = color.clone();
    }
    if let Some(dashed) = args.dashed {
        line.dashed_line = dashed;
    }
    if let Some(arrow) = args.arrow {
        line.arrow_type = arrow;
    }
    attributes
}

#[instrument(skip(settings, args))]
fn _update(settings: &Settings, id: NodeId, args: &AttributeArgs) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    let current = editor
        .tree()
        .get(id)
        .map(|node| node.attributes.clone())
        .ok_or_else(|| CliError::from(DomainError::NodeNotFound(id)))?;
    editor.update_node(id, merge_attributes(current, args))?;
    output::action("Updated", &format!("node {}", id));
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _levels(settings: &Settings, start: Option<NodeId>) -> CliResult<()> {
    let editor = open_editor(settings)?;
    let tree = editor.tree();
    let start = start.unwrap_or_else(|| tree.root_id());
    for (depth, level) in tree.bfs(start)?.iter().enumerate() {
        let labels = level
            .iter()
            .filter_map(|&id| tree.get(id))
            .map(|node| format!("{} [#{}]", node.attributes.value, node.id))
            .join("  ");
        output::info(&format!("{depth}: {labels}"));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _random(settings: &Settings, size: Option<usize>) -> CliResult<()> {
    let size = size.unwrap_or(settings.random_tree_size);
    if size == 0 {
        return Err(CliError::InvalidArgs("size must be at least 1".into()));
    }
    let mut editor = open_editor(settings)?;
    editor.generate_random(size)?;
    output::success(&format!("Generated a random tree with {} nodes", size));
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _export(settings: &Settings, output_path: Option<&Path>) -> CliResult<()> {
    let editor = open_editor(settings)?;
    let json = editor.document().to_json_pretty()?;
    match output_path {
        Some(path) => {
            RealFileSystem
                .write(path, &json)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Exported", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _import(settings: &Settings, file: &Path) -> CliResult<()> {
    let content = RealFileSystem
        .read_to_string(file)
        .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
    let doc = TreeDocument::from_json(&content)?;
    let mut editor = open_editor(settings)?;
    editor.import_document(doc)?;
    output::action("Imported", &file.display());
    print_tree(&editor, settings);
    Ok(())
}

#[instrument(skip(settings))]
fn _settings(settings: &Settings, command: &SettingsCommands) -> CliResult<()> {
    let mut editor = open_editor(settings)?;
    match command {
        SettingsCommands::Show => print_tree_settings(editor.settings()),
        SettingsCommands::Set {
            background_color,
            node_resize,
            level_height,
            sibling_space,
        } => {
            let mut next = editor.settings().clone();
            if let Some(color) = background_color {
                next.background_color = color.clone();
            }
            if let Some(resize) = node_resize {
                next.node_resize = *resize;
            }
            if let Some(height) = level_height {
                next.level_height = *height;
            }
            if let Some(space) = sibling_space {
                next.sibling_space = *space;
            }
            editor.update_settings(next)?;
            output::success("Updated tree settings");
            print_tree_settings(editor.settings());
        }
    }
    Ok(())
}

fn print_tree_settings(settings: &TreeSettings) {
    output::header("Tree settings");
    output::detail(&format!("background color: {}", settings.background_color));
    output::detail(&format!("node resize:      {}", settings.node_resize));
    output::detail(&format!("level height:     {}", settings.level_height));
    output::detail(&format!("sibling space:    {}", settings.sibling_space));
}

#[instrument(skip(settings))]
fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global config: {}", path.display())),
                None => output::detail("global config: (no config directory)"),
            }
            output::detail(&format!("data file:     {}", settings.data_file.display()));
        }
        ConfigCommands::Init { global: false } => output::info(&Settings::template()),
        ConfigCommands::Init { global: true } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            let fs = RealFileSystem;
            if fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .and_then(|_| fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}
