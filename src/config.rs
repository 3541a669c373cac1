use crate::graph::GraphParams;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// One level of statement indentation.
    pub indent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn indentation(&self, level: usize) -> String {
        self.indent.repeat(level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub render: RenderConfig,
    /// Params applied to every root graph the CLI builds.
    pub graph: GraphParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    indent: Option<String>,
    indent_width: Option<usize>,
    graph: Option<GraphParams>,
}

/// Parses strict JSON first and falls back to JSON5 for hand-written files.
pub fn parse_relaxed<T: serde::de::DeserializeOwned>(contents: &str) -> anyhow::Result<T> {
    match serde_json::from_str(contents) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str(contents)
            .with_context(|| format!("not valid JSON ({json_err}) nor JSON5")),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let parsed: ConfigFile = parse_relaxed(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    if let Some(width) = parsed.indent_width {
        config.render.indent = " ".repeat(width);
    }
    if let Some(indent) = parsed.indent {
        config.render.indent = indent;
    }
    if let Some(graph) = parsed.graph {
        config.graph.merge(graph);
    }
    Ok(config)
}
