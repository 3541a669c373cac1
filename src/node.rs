use crate::attrs::{AttrValue, Attributes, format_attr_list};
use crate::ids::{self, Id};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    attributes: Attributes,
}

impl Node {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(ids::next(), label)
    }

    pub fn with_id(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            attributes: Attributes::new(),
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

    /// The node label always replaces a `label` attribute set by hand.
    pub fn serialize(&self) -> String {
        let mut attributes = self.attributes.clone();
        attributes.set("label", self.label.as_str());
        let list = format_attr_list(&attributes);
        if list.is_empty() {
            self.id.to_string()
        } else {
            format!("{} {list}", self.id)
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
