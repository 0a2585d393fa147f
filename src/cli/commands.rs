//! Command dispatch

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, DrawArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{config_template, global_config_path, local_config_path, Settings};
use crate::domain::{write_dot, Digraph};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Draw(args)) => cmd_draw(cli, args),
        Some(Commands::Source) => cmd_source(cli),
        Some(Commands::Tree) => cmd_tree(cli),
        None => cmd_draw(cli, &DrawArgs::default()),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("get current directory", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    let settings = Settings::load(Some(&dir))?;
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Apply `draw` flags on top of loaded settings.
pub fn apply_draw_args(mut settings: Settings, args: &DrawArgs) -> Settings {
    if let Some(output) = &args.output {
        settings.output.filename = output.clone();
    }
    if let Some(format) = &args.format {
        settings.output.format = format.clone();
    }
    if let Some(dir) = &args.out_dir {
        settings.output.directory = dir.clone();
    }
    settings
}

#[instrument(skip(cli))]
fn cmd_draw(cli: &Cli, args: &DrawArgs) -> CliResult<()> {
    let settings = apply_draw_args(load_settings(cli)?, args);
    let container = ServiceContainer::new(settings);
    let service = container.diagram_service();

    let rendered = service.draw(!args.no_view)?;
    output::success(&format!("Rendered {}", rendered.display()));
    Ok(())
}

fn cmd_source(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let graph = container.diagram_service().build()?;
    write_dot(&graph, &mut io::stdout().lock())
        .map_err(|e| InfraError::io("write DOT source to stdout", e))?;
    Ok(())
}

fn cmd_tree(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let graph = container.diagram_service().build()?;
    for tree in relation_trees(&graph) {
        output::info(&tree);
    }
    Ok(())
}

/// Build one display tree per root: a node that is nobody's child.
///
/// Each node is shown at most once, so a cyclic edge list still terminates.
pub fn relation_trees(graph: &Digraph) -> Vec<Tree<String>> {
    let relations: Vec<(&str, &str)> = graph.relations().collect();
    let children: HashSet<&str> = relations.iter().map(|&(_, c)| c).collect();

    let mut seen = HashSet::new();
    let mut trees = Vec::new();
    for node in graph.nodes() {
        if !children.contains(node.id.as_str()) {
            trees.push(subtree(&node.id, &relations, &mut seen));
        }
    }
    trees
}

fn subtree<'a>(
    id: &'a str,
    relations: &[(&'a str, &'a str)],
    seen: &mut HashSet<&'a str>,
) -> Tree<String> {
    let mut tree = Tree::new(id.to_string());
    if !seen.insert(id) {
        return tree;
    }
    for &(parent, child) in relations {
        if parent == id {
            tree.push(subtree(child, relations, seen));
        }
    }
    tree
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let dir = project_dir(cli)?;
            match global_config_path() {
                Some(path) => print_config_path("global", &path),
                None => output::action("global", &"(no config directory)"),
            }
            print_config_path("local", &local_config_path(&dir));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&project_dir(cli)?)
            };
            init_config(&path)?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn print_config_path(label: &str, path: &Path) {
    output::action(label, &path.display());
    if !path.exists() {
        output::detail(&"(not found)");
    }
}

/// Write the config template to `path`, refusing to overwrite.
pub fn init_config(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                InfraError::io(format!("create {}", parent.display()), e)
            })?;
        }
    }
    std::fs::write(path, config_template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{fenwick_diagram, DiagramStyle, EdgeDirection};
    use tempfile::TempDir;

    #[test]
    fn test_relation_trees_single_root() {
        let graph = fenwick_diagram(&DiagramStyle::default());

        let trees = relation_trees(&graph);

        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].root, "0");
        let top: Vec<_> = trees[0].leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(top, vec!["1", "2", "4", "8", "16"]);
    }

    #[test]
    fn test_relation_trees_ignore_edge_direction() {
        let style = DiagramStyle {
            edge_direction: EdgeDirection::ParentToChild,
            ..Default::default()
        };
        let a = relation_trees(&fenwick_diagram(&style));
        let b = relation_trees(&fenwick_diagram(&DiagramStyle::default()));

        assert_eq!(a[0].to_string(), b[0].to_string());
    }

    #[test]
    fn test_relation_trees_terminate_on_cycle() {
        let mut graph = Digraph::new();
        graph.add_node("r");
        graph.add_edge("r", "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");

        let trees = relation_trees(&graph);

        assert_eq!(trees.len(), 1);
    }

    #[test]
    fn test_apply_draw_args_overrides() {
        let args = DrawArgs {
            no_view: true,
            output: Some("tree".into()),
            format: Some("svg".into()),
            out_dir: Some(PathBuf::from("/tmp/out")),
        };

        let settings = apply_draw_args(Settings::default(), &args);

        assert_eq!(settings.output.filename, "tree");
        assert_eq!(settings.output.format, "svg");
        assert_eq!(settings.output.directory, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(".fenwick-diagram.toml");

        init_config(&path).unwrap();
        let second = init_config(&path);

        assert!(path.exists());
        assert!(matches!(second, Err(CliError::Usage(_))));
    }
}
