//! Declarative graph descriptions (JSON / JSON5) turned into a [`Graph`].
//!
//! Entities are declared with a caller-chosen key; edges refer to those
//! keys. `record.field` addresses one field of a record, and a subgraph key
//! resolves to the subgraph's anchor node. Edges may refer to entities
//! declared anywhere in the document, before or after them.
//!
//! ```json
//! {
//!   "params": { "isOriented": true },
//!   "items": [
//!     { "node": "a", "label": "hello" },
//!     { "record": "r", "fields": [{ "key": "x", "label": "x" }, "y"] },
//!     { "edge": ["a", "r.x"] }
//!   ]
//! }
//! ```

use crate::attrs::Attributes;
use crate::edge::{Edge, Endpoint};
use crate::error::{DotError, Result};
use crate::graph::{Graph, GraphParams, Item, Subgraph};
use crate::ids::{Id, IdAllocator};
use crate::node::Node;
use crate::record::{Cell, Field, LabelCell, Port, Record};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphDesc {
    pub label: String,
    pub params: GraphParams,
    pub attributes: Attributes,
    pub items: Vec<ItemDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemDesc {
    Node(NodeDesc),
    Record(RecordDesc),
    Edge(EdgeDesc),
    Subgraph(SubgraphDesc),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDesc {
    pub node: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordDesc {
    pub record: String,
    pub fields: Vec<FieldDesc>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldDesc {
    Text(String),
    Cell {
        cell: Vec<FieldDesc>,
        #[serde(default)]
        key: Option<String>,
    },
    Label {
        label: String,
        #[serde(default)]
        key: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDesc {
    pub edge: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubgraphDesc {
    pub subgraph: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub params: GraphParams,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub items: Vec<ItemDesc>,
}

/// Items are built first and edges resolved once every key is known.
enum Staged {
    Ready(Item),
    Edge(EdgeDesc),
    Subgraph(Subgraph, Vec<Staged>),
}

struct Resolver {
    ids: IdAllocator,
    keys: HashMap<String, Endpoint>,
}

impl Resolver {
    fn declare(&mut self, key: &str, endpoint: Endpoint) -> Result<()> {
        if self.keys.insert(key.to_string(), endpoint).is_some() {
            return Err(DotError::DuplicateKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn stage_items(&mut self, items: Vec<ItemDesc>) -> Result<Vec<Staged>> {
        items.into_iter().map(|item| self.stage(item)).collect()
    }

    fn stage(&mut self, item: ItemDesc) -> Result<Staged> {
        match item {
            ItemDesc::Node(desc) => {
                let id = self.ids.allocate();
                self.declare(&desc.node, Endpoint::Node(id))?;
                let label = desc.label.unwrap_or_else(|| desc.node.clone());
                let node = Node::with_id(id, label).set_attributes(desc.attributes);
                Ok(Staged::Ready(node.into()))
            }
            ItemDesc::Record(desc) => {
                let id = self.ids.allocate();
                self.declare(&desc.record, Endpoint::Node(id))?;
                let mut fields = Vec::with_capacity(desc.fields.len());
                for field in desc.fields {
                    fields.push(self.field(&desc.record, id, field)?);
                }
                let record = Record::with_id(id, fields).set_attributes(desc.attributes);
                Ok(Staged::Ready(record.into()))
            }
            ItemDesc::Edge(desc) => Ok(Staged::Edge(desc)),
            ItemDesc::Subgraph(desc) => {
                let id = self.ids.allocate();
                let subgraph = Subgraph::with_ids(id, self.ids.allocate())
                    .set_label(desc.label)
                    .set_params(desc.params)
                    .set_attributes(desc.attributes);
                self.declare(&desc.subgraph, Endpoint::from(&subgraph))?;
                let items = self.stage_items(desc.items)?;
                Ok(Staged::Subgraph(subgraph, items))
            }
        }
    }

    fn field(&mut self, record_key: &str, record: Id, desc: FieldDesc) -> Result<Field> {
        let id = self.ids.allocate();
        let key = match &desc {
            FieldDesc::Text(_) => None,
            FieldDesc::Cell { key, .. } | FieldDesc::Label { key, .. } => key.clone(),
        };
        if let Some(key) = key {
            let port = Port { node: record, field: id };
            self.declare(&format!("{record_key}.{key}"), port.into())?;
        }
        match desc {
            FieldDesc::Text(label) | FieldDesc::Label { label, .. } => {
                Ok(LabelCell::with_id(id, label).into())
            }
            FieldDesc::Cell { cell, .. } => {
                let mut children = Vec::with_capacity(cell.len());
                for child in cell {
                    children.push(self.field(record_key, record, child)?);
                }
                Ok(Cell::with_id(id, children).into())
            }
        }
    }

    fn endpoint(&self, key: &str) -> Result<Endpoint> {
        self.keys
            .get(key)
            .copied()
            .ok_or_else(|| DotError::UnknownKey {
                key: key.to_string(),
            })
    }

    fn finish(&self, staged: Staged) -> Result<Item> {
        match staged {
            Staged::Ready(item) => Ok(item),
            Staged::Edge(desc) => {
                let endpoints = desc
                    .edge
                    .iter()
                    .map(|key| self.endpoint(key))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Edge::chain(endpoints)?
                    .set_attributes(desc.attributes)
                    .into())
            }
            Staged::Subgraph(mut subgraph, items) => {
                for item in items {
                    subgraph.push(self.finish(item)?);
                }
                Ok(subgraph.into())
            }
        }
    }
}

/// Builds the described document. Identifiers are numbered from 0 in
/// declaration order, the root graph first.
pub fn build(desc: GraphDesc) -> Result<Graph> {
    let mut resolver = Resolver {
        ids: IdAllocator::new(),
        keys: HashMap::new(),
    };
    let mut graph = Graph::with_id(resolver.ids.allocate())
        .set_label(desc.label)
        .set_params(desc.params)
        .set_attributes(desc.attributes);
    let staged = resolver.stage_items(desc.items)?;
    for item in staged {
        graph.push(resolver.finish(item)?);
    }
    tracing::debug!(keys = resolver.keys.len(), "built described graph");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GraphDesc {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_nodes_and_forward_referencing_edges() {
        let desc = parse(
            r#"{
                "params": {"isOriented": true},
                "items": [
                    {"edge": ["a", "b"], "attributes": {"color": "red"}},
                    {"node": "a", "label": "hello"},
                    {"node": "b"}
                ]
            }"#,
        );
        let out = build(desc).unwrap().serialize();
        assert_eq!(
            out,
            "digraph \"0\" {\n  \"1\" -> \"2\" [color = \"red\"];\n  1 [label = \"hello\"];\n  2 [label = \"b\"];\n}"
        );
    }

    #[test]
    fn record_fields_resolve_to_ports() {
        let desc = parse(
            r#"{"items": [
                {"record": "r", "fields": [{"label": "a", "key": "a"}, {"cell": ["b", {"label": "c", "key": "c"}]}]},
                {"node": "n"},
                {"edge": ["n", "r.c"]}
            ]}"#,
        );
        let out = build(desc).unwrap().serialize();
        assert!(out.contains("1 [label = \"{<2> a|{<4> b|<5> c}}\"; shape = \"record\"];"));
        assert!(out.contains("\"6\" -- \"1:5\";"));
    }

    #[test]
    fn subgraph_key_targets_its_anchor() {
        let desc = parse(
            r#"{"items": [
                {"subgraph": "s", "params": {"isCluster": true}, "items": [{"node": "inner"}]},
                {"node": "out"},
                {"edge": ["out", "s"]}
            ]}"#,
        );
        let out = build(desc).unwrap().serialize();
        assert!(out.contains("subgraph \"cluster1\" {"));
        assert!(out.contains("\"4\" -- \"2\";"));
    }

    #[test]
    fn reports_unknown_and_duplicate_keys() {
        let unknown = parse(r#"{"items": [{"node": "a"}, {"edge": ["a", "ghost"]}]}"#);
        assert_eq!(
            build(unknown).unwrap_err(),
            DotError::UnknownKey {
                key: "ghost".to_string()
            }
        );
        let duplicate = parse(r#"{"items": [{"node": "a"}, {"node": "a"}]}"#);
        assert_eq!(
            build(duplicate).unwrap_err(),
            DotError::DuplicateKey {
                key: "a".to_string()
            }
        );
        let short = parse(r#"{"items": [{"node": "a"}, {"edge": ["a"]}]}"#);
        assert_eq!(
            build(short).unwrap_err(),
            DotError::TooFewEndpoints { count: 1 }
        );
    }
}
