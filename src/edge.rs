use crate::attrs::{AttrValue, Attributes, format_attr_list};
use crate::error::{DotError, Result};
use crate::ids::Id;
use crate::node::Node;
use crate::record::{Cell, Field, LabelCell, Port, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something an edge can attach to: a whole node or one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(Id),
    Port(Port),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Node(id) => write!(f, "\"{id}\""),
            Endpoint::Port(port) => write!(f, "\"{port}\""),
        }
    }
}

impl From<&Node> for Endpoint {
    fn from(value: &Node) -> Self {
        Endpoint::Node(value.id())
    }
}

impl From<&Record> for Endpoint {
    fn from(value: &Record) -> Self {
        Endpoint::Node(value.id())
    }
}

impl From<Port> for Endpoint {
    fn from(value: Port) -> Self {
        Endpoint::Port(value)
    }
}

impl From<Id> for Endpoint {
    fn from(value: Id) -> Self {
        Endpoint::Node(value)
    }
}

impl TryFrom<&LabelCell> for Endpoint {
    type Error = DotError;

    fn try_from(value: &LabelCell) -> Result<Self> {
        value.address().map(Endpoint::Port)
    }
}

impl TryFrom<&Cell> for Endpoint {
    type Error = DotError;

    fn try_from(value: &Cell) -> Result<Self> {
        value.address().map(Endpoint::Port)
    }
}

impl TryFrom<&Field> for Endpoint {
    type Error = DotError;

    fn try_from(value: &Field) -> Result<Self> {
        value.address().map(Endpoint::Port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeParams {
    pub is_oriented: Option<bool>,
}

impl EdgeParams {
    pub fn oriented(is_oriented: bool) -> Self {
        Self {
            is_oriented: Some(is_oriented),
        }
    }

    pub fn merge(&mut self, patch: EdgeParams) {
        if patch.is_oriented.is_some() {
            self.is_oriented = patch.is_oriented;
        }
    }
}

/// An edge, or a chain of edges when it has more than two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    endpoints: Vec<Endpoint>,
    params: EdgeParams,
    attributes: Attributes,
}

impl Edge {
    pub fn new(from: impl Into<Endpoint>, to: impl Into<Endpoint>) -> Self {
        Self {
            endpoints: vec![from.into(), to.into()],
            params: EdgeParams::default(),
            attributes: Attributes::new(),
        }
    }

    /// `a -- b -- c` style chain over every endpoint in order.
    pub fn chain<I, E>(endpoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        let endpoints: Vec<Endpoint> = endpoints.into_iter().map(Into::into).collect();
        if endpoints.len() < 2 {
            return Err(DotError::TooFewEndpoints {
                count: endpoints.len(),
            });
        }
        Ok(Self {
            endpoints,
            params: EdgeParams::default(),
            attributes: Attributes::new(),
        })
    }

    /// Extends the chain by one more endpoint.
    pub fn then(mut self, next: impl Into<Endpoint>) -> Self {
        self.endpoints.push(next.into());
        self
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn params(&self) -> EdgeParams {
        self.params
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn set_attributes<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.attributes.merge(attrs);
        self
    }

    pub fn set_params(mut self, params: EdgeParams) -> Self {
        self.params.merge(params);
        self
    }

    /// Renders with the edge's own orientation; undirected unless set.
    pub fn serialize(&self) -> String {
        self.serialize_oriented(self.params.is_oriented.unwrap_or(false))
    }

    pub(crate) fn serialize_oriented(&self, oriented: bool) -> String {
        let separator = if oriented { " -> " } else { " -- " };
        let chain = self
            .endpoints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        let list = format_attr_list(&self.attributes);
        if list.is_empty() {
            chain
        } else {
            format!("{chain} {list}")
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
