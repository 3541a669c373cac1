//! Graph containers and the recursive serializer.
//!
//! Orientation is resolved once by the outermost container being rendered
//! and threaded down through [`RenderContext`], so an edge's arrow style
//! always follows its root graph and rendering never mutates the model.

use crate::attrs::{AttrValue, Attributes, ElementKind, format_statements, format_typed};
use crate::config::RenderConfig;
use crate::edge::{Edge, Endpoint};
use crate::ids::{self, Id};
use crate::node::Node;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container params. `None` means "not set"; merging only overrides the
/// keys present in the patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphParams {
    pub is_oriented: Option<bool>,
    pub is_strict: Option<bool>,
    pub is_cluster: Option<bool>,
    pub graph: Option<Attributes>,
    pub node: Option<Attributes>,
    pub edge: Option<Attributes>,
}

impl GraphParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn oriented(mut self, value: bool) -> Self {
        self.is_oriented = Some(value);
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.is_strict = Some(value);
        self
    }

    pub fn cluster(mut self, value: bool) -> Self {
        self.is_cluster = Some(value);
        self
    }

    pub fn graph_defaults(mut self, attrs: impl Into<Attributes>) -> Self {
        self.graph = Some(attrs.into());
        self
    }

    pub fn node_defaults(mut self, attrs: impl Into<Attributes>) -> Self {
        self.node = Some(attrs.into());
        self
    }

    pub fn edge_defaults(mut self, attrs: impl Into<Attributes>) -> Self {
        self.edge = Some(attrs.into());
        self
    }

    /// Shallow merge: a default-attribute map in the patch replaces the
    /// previous map wholesale.
    pub fn merge(&mut self, patch: GraphParams) {
        if patch.is_oriented.is_some() {
            self.is_oriented = patch.is_oriented;
        }
        if patch.is_strict.is_some() {
            self.is_strict = patch.is_strict;
        }
        if patch.is_cluster.is_some() {
            self.is_cluster = patch.is_cluster;
        }
        if patch.graph.is_some() {
            self.graph = patch.graph;
        }
        if patch.node.is_some() {
            self.node = patch.node;
        }
        if patch.edge.is_some() {
            self.edge = patch.edge;
        }
    }

    pub fn is_oriented(&self) -> bool {
        self.is_oriented.unwrap_or(false)
    }

    pub fn is_strict(&self) -> bool {
        self.is_strict.unwrap_or(false)
    }

    pub fn is_cluster(&self) -> bool {
        self.is_cluster.unwrap_or(false)
    }

    fn defaults(&self, kind: ElementKind) -> Option<&Attributes> {
        match kind {
            ElementKind::Graph => self.graph.as_ref(),
            ElementKind::Node => self.node.as_ref(),
            ElementKind::Edge => self.edge.as_ref(),
        }
    }
}

/// Anything a graph or subgraph can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Node(Node),
    Edge(Edge),
    Record(Record),
    Subgraph(Subgraph),
}

impl From<Node> for Item {
    fn from(value: Node) -> Self {
        Item::Node(value)
    }
}

impl From<Edge> for Item {
    fn from(value: Edge) -> Self {
        Item::Edge(value)
    }
}

impl From<Record> for Item {
    fn from(value: Record) -> Self {
        Item::Record(value)
    }
}

impl From<Subgraph> for Item {
    fn from(value: Subgraph) -> Self {
        Item::Subgraph(value)
    }
}

impl Item {
    fn render(&self, ctx: &RenderContext<'_>, level: usize) -> String {
        match self {
            Item::Node(node) => node.serialize(),
            Item::Edge(edge) => edge.serialize_oriented(ctx.oriented),
            Item::Record(record) => record.serialize(),
            Item::Subgraph(subgraph) => subgraph.render_nested(ctx, level),
        }
    }
}

/// Read-only state shared by one serialization pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub oriented: bool,
    pub config: &'a RenderConfig,
}

/// State shared by [`Graph`] and [`Subgraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaseGraph {
    id: Id,
    label: String,
    attributes: Attributes,
    params: GraphParams,
    items: Vec<Item>,
}

impl BaseGraph {
    fn new(id: Id) -> Self {
        Self {
            id,
            label: String::new(),
            attributes: Attributes::new(),
            params: GraphParams::default(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn statements(&self, ctx: &RenderContext<'_>, level: usize) -> Vec<String> {
        let mut attributes = self.attributes.clone();
        attributes.set("label", self.label.as_str());
        let mut lines = format_statements(&attributes);

        for kind in [ElementKind::Graph, ElementKind::Node, ElementKind::Edge] {
            if let Some(defaults) = self.params.defaults(kind) {
                let statement = format_typed(kind, defaults);
                if !statement.is_empty() {
                    lines.push(statement);
                }
            }
        }

        lines.extend(self.items.iter().map(|item| item.render(ctx, level)));
        lines
    }

    /// `{ ... }` with every statement on its own line one level deeper
    /// than the closing brace.
    fn render_body(&self, ctx: &RenderContext<'_>, level: usize) -> String {
        let inner = ctx.config.indentation(level + 1);
        let mut out = String::from("{\n");
        for line in self.statements(ctx, level + 1) {
            out.push_str(&inner);
            out.push_str(&line);
            out.push_str(";\n");
        }
        out.push_str(&ctx.config.indentation(level));
        out.push('}');
        out
    }
}

macro_rules! container_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn id(&self) -> Id {
                self.base.id
            }

            pub fn label(&self) -> &str {
                &self.base.label
            }

            pub fn base(&self) -> &BaseGraph {
                &self.base
            }

            pub fn items(&self) -> &[Item] {
                &self.base.items
            }

            pub fn params(&self) -> &GraphParams {
                &self.base.params
            }

            pub fn attributes(&self) -> &Attributes {
                &self.base.attributes
            }

            pub fn attributes_mut(&mut self) -> &mut Attributes {
                &mut self.base.attributes
            }

            pub fn set_label(mut self, label: impl Into<String>) -> Self {
                self.base.label = label.into();
                self
            }

            pub fn set_attributes<I, K, V>(mut self, attrs: I) -> Self
            where
                I: IntoIterator<Item = (K, V)>,
                K: Into<String>,
                V: Into<AttrValue>,
            {
                self.base.attributes.merge(attrs);
                self
            }

            pub fn set_params(mut self, params: GraphParams) -> Self {
                self.base.params.merge(params);
                self
            }

            pub fn merge_params(&mut self, params: GraphParams) -> &mut Self {
                self.base.params.merge(params);
                self
            }

            pub fn add(mut self, item: impl Into<Item>) -> Self {
                self.push(item);
                self
            }

            /// Appends in place. Containment is by value, so a container
            /// can never end up inside itself.
            pub fn push(&mut self, item: impl Into<Item>) -> &mut Self {
                self.base.items.push(item.into());
                self
            }

            pub fn extend<I, T>(mut self, items: I) -> Self
            where
                I: IntoIterator<Item = T>,
                T: Into<Item>,
            {
                self.base.items.extend(items.into_iter().map(Into::into));
                self
            }

            pub fn serialize(&self) -> String {
                self.render(&RenderConfig::default(), 0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.serialize())
            }
        }
    };
}

/// Document root.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    base: BaseGraph,
}

impl Graph {
    pub fn new() -> Self {
        Self::with_id(ids::next())
    }

    pub fn with_id(id: Id) -> Self {
        Self {
            base: BaseGraph::new(id),
        }
    }

    pub fn render(&self, config: &RenderConfig, level: usize) -> String {
        let ctx = RenderContext {
            oriented: self.base.params.is_oriented(),
            config,
        };
        let strict = if self.base.params.is_strict() {
            "strict "
        } else {
            ""
        };
        let keyword = if ctx.oriented { "digraph" } else { "graph" };
        let out = format!(
            "{strict}{keyword} \"{}\" {}",
            self.base.id,
            self.base.render_body(&ctx, level)
        );
        tracing::debug!(
            graph = %self.base.id,
            items = self.base.items.len(),
            bytes = out.len(),
            "serialized graph"
        );
        out
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

container_builders!(Graph);

/// Attributes of the invisible anchor node every subgraph starts with.
fn anchor_attributes() -> Attributes {
    Attributes::new()
        .with("fontsize", 0)
        .with("style", "invis")
        .with("area", 0)
        .with("margin", "0,0")
        .with("fixedsize", true)
        .with("width", 0)
        .with("height", 0)
}

/// Nested container; rendered as a cluster when `is_cluster` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    base: BaseGraph,
    anchor: Id,
}

impl Subgraph {
    pub fn new() -> Self {
        let id = ids::next();
        Self::with_ids(id, ids::next())
    }

    /// `anchor` becomes the id of the invisible first node.
    pub fn with_ids(id: Id, anchor: Id) -> Self {
        let mut base = BaseGraph::new(id);
        let anchor_node = Node::with_id(anchor, " ").set_attributes(anchor_attributes());
        base.items.push(Item::Node(anchor_node));
        Self { base, anchor }
    }

    /// Id of the invisible anchor node, usable as an edge endpoint.
    pub fn anchor(&self) -> Id {
        self.anchor
    }

    /// Effective id, `cluster`-prefixed for clusters.
    pub fn name(&self) -> String {
        if self.base.params.is_cluster() {
            format!("cluster{}", self.base.id)
        } else {
            self.base.id.to_string()
        }
    }

    /// Standalone rendering uses the subgraph's own orientation.
    pub fn render(&self, config: &RenderConfig, level: usize) -> String {
        let ctx = RenderContext {
            oriented: self.base.params.is_oriented(),
            config,
        };
        self.render_nested(&ctx, level)
    }

    fn render_nested(&self, ctx: &RenderContext<'_>, level: usize) -> String {
        format!("subgraph \"{}\" {}", self.name(), self.base.render_body(ctx, level))
    }
}

impl Default for Subgraph {
    fn default() -> Self {
        Self::new()
    }
}

container_builders!(Subgraph);

impl From<&Subgraph> for Endpoint {
    fn from(value: &Subgraph) -> Self {
        Endpoint::Node(value.anchor)
    }
}
