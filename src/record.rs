//! Record-shaped nodes: a tree of label fields rendered with the `record`
//! shape, where every field can be targeted by an edge through its port.
//!
//! Field text is escaped so that `|`, `{`, `}`, `<` and `>` show up
//! literally instead of changing the partition structure. Other backslash
//! sequences such as `\l` pass through to the renderer.

use crate::attrs::{AttrValue, Attributes, format_attr_list};
use crate::error::{DotError, Result};
use crate::ids::{self, Id};
use std::fmt;

/// Port-level address of a record field, rendered as `<node>:<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port {
    pub node: Id,
    pub field: Id,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.field)
    }
}

/// Backslash-escapes the characters that carry record structure. A trailing
/// backslash is doubled so it cannot escape the separator that follows.
fn escape_field_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '|' | '{' | '}' | '<' | '>' => {
                out.push('\\');
                out.push(ch);
            }
            '\\' if chars.peek().is_none() => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

fn resolve_port(cell: Id, node_id: Option<Id>) -> Result<Port> {
    match node_id {
        Some(node) => Ok(Port { node, field: cell }),
        None => {
            tracing::warn!(%cell, "cell address read before the cell was attached");
            Err(DotError::UnattachedCell { cell })
        }
    }
}

/// Leaf field of a record label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCell {
    id: Id,
    label: String,
    node_id: Option<Id>,
}

impl LabelCell {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(ids::next(), label)
    }

    pub fn with_id(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            node_id: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node_id(&self) -> Option<Id> {
        self.node_id
    }

    pub fn address(&self) -> Result<Port> {
        resolve_port(self.id, self.node_id)
    }

    pub fn serialize(&self) -> String {
        format!("<{}> {}", self.id, escape_field_text(&self.label))
    }
}

impl fmt::Display for LabelCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Partition of a record label; children are laid out perpendicular to
/// the enclosing partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: Id,
    node_id: Option<Id>,
    children: Vec<Field>,
}

impl Cell {
    pub fn new<I, F>(children: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        Self::with_id(ids::next(), children)
    }

    pub fn with_id<I, F>(id: Id, children: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        let mut cell = Self {
            id,
            node_id: None,
            children: Vec::new(),
        };
        for child in children {
            cell.push(child);
        }
        cell
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn node_id(&self) -> Option<Id> {
        self.node_id
    }

    pub fn children(&self) -> &[Field] {
        &self.children
    }

    pub fn address(&self) -> Result<Port> {
        resolve_port(self.id, self.node_id)
    }

    pub fn add(mut self, child: impl Into<Field>) -> Self {
        self.push(child);
        self
    }

    /// Appends a child, handing it this cell's current node id. Children
    /// added before the cell is attached get their id when it is.
    pub fn push(&mut self, child: impl Into<Field>) -> &mut Self {
        let mut child = child.into();
        child.assign_node_id(self.node_id);
        self.children.push(child);
        self
    }

    fn assign_node_id(&mut self, node_id: Option<Id>) {
        self.node_id = node_id;
        for child in &mut self.children {
            child.assign_node_id(node_id);
        }
    }

    fn find(&self, field: Id) -> Option<&Field> {
        self.children.iter().find_map(|child| child.find(field))
    }

    /// A childless cell stays addressable as an empty field; otherwise
    /// children are always wrapped in braces, a single child included.
    pub fn serialize(&self) -> String {
        if self.children.is_empty() {
            return format!("<{}> ", self.id);
        }
        format!("{{{}}}", join_fields(&self.children))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// A record label field: a leaf or a nested partition.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Label(LabelCell),
    Cell(Cell),
}

impl Field {
    pub fn id(&self) -> Id {
        match self {
            Field::Label(cell) => cell.id,
            Field::Cell(cell) => cell.id,
        }
    }

    pub fn address(&self) -> Result<Port> {
        match self {
            Field::Label(cell) => cell.address(),
            Field::Cell(cell) => cell.address(),
        }
    }

    pub fn serialize(&self) -> String {
        match self {
            Field::Label(cell) => cell.serialize(),
            Field::Cell(cell) => cell.serialize(),
        }
    }

    fn assign_node_id(&mut self, node_id: Option<Id>) {
        match self {
            Field::Label(cell) => cell.node_id = node_id,
            Field::Cell(cell) => cell.assign_node_id(node_id),
        }
    }

    fn find(&self, field: Id) -> Option<&Field> {
        if self.id() == field {
            return Some(self);
        }
        match self {
            Field::Label(_) => None,
            Field::Cell(cell) => cell.find(field),
        }
    }
}

impl From<LabelCell> for Field {
    fn from(value: LabelCell) -> Self {
        Field::Label(value)
    }
}

impl From<Cell> for Field {
    fn from(value: Cell) -> Self {
        Field::Cell(value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::serialize)
        .collect::<Vec<_>>()
        .join("|")
}

/// Root of a label-partition tree. The record is the addressable node;
/// its fields resolve to ports on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Id,
    attributes: Attributes,
    children: Vec<Field>,
}

impl Record {
    pub fn new<I, F>(children: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        Self::with_id(ids::next(), children)
    }

    pub fn with_id<I, F>(id: Id, children: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        let mut record = Self {
            id,
            attributes: Attributes::new(),
            children: Vec::new(),
        };
        for child in children {
            record.push(child);
        }
        record
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn fields(&self) -> &[Field] {
        &self.children
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

    pub fn add(mut self, child: impl Into<Field>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<Field>) -> &mut Self {
        let mut child = child.into();
        child.assign_node_id(Some(self.id));
        self.children.push(child);
        self
    }

    /// Resolves any field in this record's tree to its port.
    pub fn port(&self, field: Id) -> Result<Port> {
        self.children
            .iter()
            .find_map(|child| child.find(field))
            .map(|_| Port {
                node: self.id,
                field,
            })
            .ok_or(DotError::UnknownField {
                record: self.id,
                field,
            })
    }

    pub fn label(&self) -> String {
        match self.children.as_slice() {
            [] => String::new(),
            [only] => only.serialize(),
            many => format!("{{{}}}", join_fields(many)),
        }
    }

    pub fn serialize(&self) -> String {
        let mut attributes = self.attributes.clone();
        attributes.set("label", self.label());
        attributes.set("shape", "record");
        let list = format_attr_list(&attributes);
        format!("{} {list}", self.id)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
