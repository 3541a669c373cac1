//! Directory hierarchy rendered as a graph: one node per entry, folders
//! drawn with the `folder` shape and linked to each of their children.

use crate::attrs::Attributes;
use crate::builder::Builder;
use crate::graph::{Graph, GraphParams};
use crate::node::Node;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Entry names skipped when the caller gives no pattern of their own.
pub static DEFAULT_EXCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\.git|target|node_modules)$").unwrap());

pub fn default_params() -> GraphParams {
    GraphParams::new()
        .oriented(true)
        .node_defaults(Attributes::new().with("shape", "note"))
}

/// Walks `root` (entries sorted by name, symlinks not followed) and
/// returns the hierarchy graph.
pub fn file_tree(root: &Path, exclude: &Regex, params: GraphParams) -> Result<Graph> {
    let builder = Builder::new();
    let mut graph = builder.graph().set_params(params);
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    visit(&builder, &mut graph, root, name, exclude)?;
    Ok(graph)
}

fn visit(
    builder: &Builder,
    graph: &mut Graph,
    path: &Path,
    name: String,
    exclude: &Regex,
) -> Result<Node> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?;
    if !meta.is_dir() {
        let node = builder.node(name);
        graph.push(node.clone());
        return Ok(node);
    }

    let node = builder.node(name).set_attributes([("shape", "folder")]);
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory {}", path.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let child_name = entry.file_name().to_string_lossy().into_owned();
        if exclude.is_match(&child_name) {
            tracing::debug!(path = %entry.path().display(), "excluded");
            continue;
        }
        let child = visit(builder, graph, &entry.path(), child_name, exclude)?;
        graph.push(builder.edge(&node, &child));
    }
    graph.push(node.clone());
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_folders_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("lib.rs"), "").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let graph = file_tree(dir.path(), &DEFAULT_EXCLUDE, default_params()).unwrap();
        let out = graph.serialize();
        let root_name = dir.path().file_name().unwrap().to_string_lossy().into_owned();

        assert!(out.starts_with("digraph \"0\" {\n  node [shape = \"note\"];\n"));
        assert!(out.contains("2 [label = \"Cargo.toml\"];"));
        assert!(out.contains("4 [label = \"lib.rs\"];"));
        assert!(out.contains("3 [shape = \"folder\"; label = \"src\"];"));
        assert!(out.contains("\"3\" -> \"4\";"));
        assert!(out.contains(&format!("1 [shape = \"folder\"; label = \"{root_name}\"];")));
        assert!(out.contains("\"1\" -> \"2\";"));
        assert!(out.contains("\"1\" -> \"3\";"));
        assert!(!out.contains(".git"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(file_tree(&missing, &DEFAULT_EXCLUDE, default_params()).is_err());
    }
}
