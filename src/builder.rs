//! Construction surface.
//!
//! The free functions draw identifiers from the process-wide counter.
//! [`Builder`] owns its own allocator so each document numbers its
//! entities from 0, which keeps output reproducible across runs.
//!
//! Containers come in two flavors: [`graph`] and [`subgraph`] start
//! unlabeled, [`labeled_graph`] and [`labeled_subgraph`] set the
//! container's `label` statement up front.

use crate::edge::{Edge, Endpoint};
use crate::graph::{Graph, Subgraph};
use crate::ids::IdAllocator;
use crate::node::Node;
use crate::record::{Cell, Field, LabelCell, Record};

pub fn node(label: impl Into<String>) -> Node {
    Node::new(label)
}

pub fn edge(from: impl Into<Endpoint>, to: impl Into<Endpoint>) -> Edge {
    Edge::new(from, to)
}

pub fn record<I, F>(cells: I) -> Record
where
    I: IntoIterator<Item = F>,
    F: Into<Field>,
{
    Record::new(cells)
}

pub fn cell<I, F>(cells: I) -> Cell
where
    I: IntoIterator<Item = F>,
    F: Into<Field>,
{
    Cell::new(cells)
}

pub fn label_cell(label: impl Into<String>) -> LabelCell {
    LabelCell::new(label)
}

pub fn graph() -> Graph {
    Graph::new()
}

pub fn subgraph() -> Subgraph {
    Subgraph::new()
}

pub fn labeled_graph(label: impl Into<String>) -> Graph {
    Graph::new().set_label(label)
}

pub fn labeled_subgraph(label: impl Into<String>) -> Subgraph {
    Subgraph::new().set_label(label)
}

/// Factory with a document-scoped identifier space.
///
/// Entities from two different builders may share identifiers; keep each
/// document's entities to a single builder.
#[derive(Debug, Default)]
pub struct Builder {
    ids: IdAllocator,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, label: impl Into<String>) -> Node {
        Node::with_id(self.ids.allocate(), label)
    }

    pub fn edge(&self, from: impl Into<Endpoint>, to: impl Into<Endpoint>) -> Edge {
        Edge::new(from, to)
    }

    pub fn record<I, F>(&self, cells: I) -> Record
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        Record::with_id(self.ids.allocate(), cells)
    }

    pub fn cell<I, F>(&self, cells: I) -> Cell
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        Cell::with_id(self.ids.allocate(), cells)
    }

    pub fn label_cell(&self, label: impl Into<String>) -> LabelCell {
        LabelCell::with_id(self.ids.allocate(), label)
    }

    pub fn graph(&self) -> Graph {
        Graph::with_id(self.ids.allocate())
    }

    pub fn subgraph(&self) -> Subgraph {
        let id = self.ids.allocate();
        Subgraph::with_ids(id, self.ids.allocate())
    }

    pub fn labeled_graph(&self, label: impl Into<String>) -> Graph {
        self.graph().set_label(label)
    }

    pub fn labeled_subgraph(&self, label: impl Into<String>) -> Subgraph {
        self.subgraph().set_label(label)
    }
}
