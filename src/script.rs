//! Replays a list of editor commands against an [`EditorSession`].
//!
//! Scripts refer to nodes by name, since ids are generated on creation.

use crate::editor::EditorSession;
use crate::graph::{LogicalGraph, Node};
use crate::history::SelectedObject;
use crate::node_types::{Category, DataType};
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScriptCommand {
    NewGraph {
        #[serde(default)]
        name: String,
    },
    Load {
        path: String,
    },
    Insert {
        path: String,
    },
    AddNode {
        name: String,
        #[serde(default)]
        category: Category,
        #[serde(default)]
        position: (f32, f32),
    },
    AddEdge {
        from: String,
        from_port: String,
        to: String,
        to_port: String,
    },
    Select {
        node: String,
        #[serde(default)]
        add: bool,
    },
    DeleteSelection,
    MoveNode {
        node: String,
        position: (f32, f32),
    },
    SetParent {
        node: String,
        parent: Option<String>,
    },
    EditField {
        node: String,
        field: String,
        value: String,
        #[serde(default)]
        data_type: DataType,
    },
    Rename {
        name: String,
    },
    Undo,
    Redo,
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptCommand>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Runs every command in order. Paths in `load`/`insert` are resolved against
/// `base_dir`. Undo and redo with no history available are not errors.
pub fn run_script(
    session: &mut EditorSession,
    commands: &[ScriptCommand],
    base_dir: &Path,
) -> anyhow::Result<()> {
    for (step, command) in commands.iter().enumerate() {
        log::debug!("Script step {}: {:?}", step + 1, command);
        run_command(session, command, base_dir)
            .with_context(|| format!("script step {} failed", step + 1))?;
    }
    Ok(())
}

fn run_command(
    session: &mut EditorSession,
    command: &ScriptCommand,
    base_dir: &Path,
) -> anyhow::Result<()> {
    match command {
        ScriptCommand::NewGraph { name } => session.new_graph(name),
        ScriptCommand::Load { path } => {
            let graph = LogicalGraph::load(&base_dir.join(path))?;
            session.load_graph(graph, path);
        }
        ScriptCommand::Insert { path } => {
            let graph = LogicalGraph::load(&base_dir.join(path))?;
            session.insert_graph(&graph, path);
        }
        ScriptCommand::AddNode {
            name,
            category,
            position,
        } => {
            session.add_node(Node::new(name.clone(), category.clone(), *position));
        }
        ScriptCommand::AddEdge {
            from,
            from_port,
            to,
            to_port,
        } => {
            let src = node_id(session, from)?;
            let dest = node_id(session, to)?;
            if session.add_edge(src, from_port, dest, to_port).is_none() {
                bail!("could not connect {} to {}", from, to);
            }
        }
        ScriptCommand::Select { node, add } => {
            let id = node_id(session, node)?;
            session.select(SelectedObject::Node(id), *add);
        }
        ScriptCommand::DeleteSelection => {
            session.delete_selection();
        }
        ScriptCommand::MoveNode { node, position } => {
            let id = node_id(session, node)?;
            session.move_node(id, *position);
        }
        ScriptCommand::SetParent { node, parent } => {
            let id = node_id(session, node)?;
            let parent = parent.as_deref().map(|p| node_id(session, p)).transpose()?;
            if !session.set_parent(id, parent) {
                log::warn!("Parent of {} left unchanged", node);
            }
        }
        ScriptCommand::EditField {
            node,
            field,
            value,
            data_type,
        } => {
            let id = node_id(session, node)?;
            session.edit_field(id, field, value, data_type.clone());
        }
        ScriptCommand::Rename { name } => {
            session.rename_graph(name);
        }
        ScriptCommand::Undo => {
            if let Err(e) = session.undo() {
                log::debug!("Undo skipped: {}", e);
            }
        }
        ScriptCommand::Redo => {
            if let Err(e) = session.redo() {
                log::debug!("Redo skipped: {}", e);
            }
        }
    }
    Ok(())
}

fn node_id(session: &EditorSession, name: &str) -> anyhow::Result<Uuid> {
    session
        .find_node_by_name(name)
        .with_context(|| format!("no node named '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<ScriptCommand> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_tagged_commands() {
        let commands = parse(
            r#"[
                { "command": "add_node", "name": "A", "category": "PythonApp", "position": [1.0, 2.0] },
                { "command": "select", "node": "A" },
                { "command": "undo" }
            ]"#,
        );
        assert_eq!(
            commands[0],
            ScriptCommand::AddNode {
                name: "A".into(),
                category: Category::PythonApp,
                position: (1.0, 2.0),
            }
        );
        assert_eq!(
            commands[1],
            ScriptCommand::Select {
                node: "A".into(),
                add: false
            }
        );
        assert_eq!(commands[2], ScriptCommand::Undo);
    }

    #[test]
    fn runs_edit_and_history_commands() {
        let commands = parse(
            r#"[
                { "command": "add_node", "name": "A" },
                { "command": "add_node", "name": "B" },
                { "command": "add_edge", "from": "A", "from_port": "out", "to": "B", "to_port": "in" },
                { "command": "undo" },
                { "command": "undo" },
                { "command": "redo" },
                { "command": "redo" },
                { "command": "redo" }
            ]"#,
        );
        let mut session = EditorSession::default();
        run_script(&mut session, &commands, Path::new(".")).unwrap();

        assert_eq!(session.graph().num_nodes(), 2);
        assert_eq!(session.graph().num_edges(), 1);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let commands = parse(r#"[ { "command": "select", "node": "missing" } ]"#);
        let mut session = EditorSession::default();
        let error = run_script(&mut session, &commands, Path::new(".")).unwrap_err();
        assert!(format!("{:#}", error).contains("no node named 'missing'"));
    }

    #[test]
    fn load_resolves_against_base_dir() {
        let dir = std::env::temp_dir().join(format!("graph_history_script_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut graph = LogicalGraph::new("saved");
        graph.add_node(Node::new("A", Category::File, (0.0, 0.0)));
        graph.save(&dir.join("saved.graph")).unwrap();

        let commands = parse(r#"[ { "command": "load", "path": "saved.graph" } ]"#);
        let mut session = EditorSession::default();
        run_script(&mut session, &commands, &dir).unwrap();

        assert_eq!(session.graph().name, "saved");
        assert_eq!(
            session.history().current_snapshot().unwrap().description(),
            "Loaded saved.graph"
        );
        std::fs::remove_dir_all(dir).ok();
    }
}
