//! Programmatic builder and serializer for Graphviz DOT documents.
//!
//! ```
//! use dotgen::{Builder, GraphParams};
//!
//! let b = Builder::new();
//! let graph = b.graph().set_params(GraphParams::new().oriented(true));
//! let hello = b.node("hello");
//! let world = b.node("world");
//! let edge = b.edge(&hello, &world);
//! let dot = graph.add(hello).add(world).add(edge).serialize();
//! assert!(dot.contains("\"1\" -> \"2\";"));
//! ```

pub mod attrs;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod describe;
pub mod edge;
pub mod error;
pub mod graph;
pub mod ids;
pub mod node;
pub mod record;
pub mod tree;

pub use attrs::{AttrValue, Attributes, ElementKind, format_attr_list, format_typed};
pub use builder::{
    Builder, cell, edge, graph, label_cell, labeled_graph, labeled_subgraph, node, record,
    subgraph,
};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use edge::{Edge, EdgeParams, Endpoint};
pub use error::{DotError, Result};
pub use graph::{BaseGraph, Graph, GraphParams, Item, Subgraph};
pub use ids::{Id, IdAllocator};
pub use node::Node;
pub use record::{Cell, Field, LabelCell, Port, Record};
