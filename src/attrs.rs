use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute value as accepted by the builder. Values are passed through
/// opaquely and only stringified at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Absent,
}

impl AttrValue {
    /// Absent values and empty strings never reach the output.
    pub fn is_renderable(&self) -> bool {
        match self {
            AttrValue::Absent => false,
            AttrValue::Str(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Str(v) => f.write_str(v),
            AttrValue::Absent => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Str(value.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(f64::from(value))
    }
}

macro_rules! int_attr_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_attr_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(v) => AttrValue::Int(v),
            Err(_) => AttrValue::Str(value.to_string()),
        }
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Absent)
    }
}

/// Insertion-ordered attribute set. Re-setting a key keeps its original
/// position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Shallow merge, later entries win per key.
    pub fn merge<I, K, V>(&mut self, patch: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        for (name, value) in patch {
            self.set(name, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn renderable(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.iter().filter(|(_, value)| value.is_renderable())
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        attrs.merge(iter);
        attrs
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttrValue);
    type IntoIter = indexmap::map::IntoIter<String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = indexmap::map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The three element kinds that accept default-attribute statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Graph,
    Node,
    Edge,
}

impl ElementKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ElementKind::Graph => "graph",
            ElementKind::Node => "node",
            ElementKind::Edge => "edge",
        }
    }
}

/// Escapes a value for use inside a double-quoted DOT string. A run of
/// backslashes is doubled only when it ends right before a `"` or the end
/// of the value, where it would otherwise swallow the quote. Renderer
/// escapes like `\l` survive untouched.
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let mut run = 1;
                while chars.next_if_eq(&'\\').is_some() {
                    run += 1;
                }
                if matches!(chars.peek(), None | Some('"')) {
                    run *= 2;
                }
                out.extend(std::iter::repeat_n('\\', run));
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

fn format_entry(name: &str, value: &AttrValue) -> String {
    format!("{name} = \"{}\"", escape_quoted(&value.to_string()))
}

/// `[a = "x"; b = "y"]`, or an empty string when nothing survives filtering.
pub fn format_attr_list(attrs: &Attributes) -> String {
    let entries: Vec<String> = attrs
        .renderable()
        .map(|(name, value)| format_entry(name, value))
        .collect();
    if entries.is_empty() {
        return String::new();
    }
    format!("[{}]", entries.join("; "))
}

/// Default-attribute statement such as `node [shape = "note"]`.
pub fn format_typed(kind: ElementKind, attrs: &Attributes) -> String {
    let list = format_attr_list(attrs);
    if list.is_empty() {
        return list;
    }
    format!("{} {list}", kind.keyword())
}

/// One bare `name = "value"` statement per surviving entry.
pub fn format_statements(attrs: &Attributes) -> Vec<String> {
    attrs
        .renderable()
        .map(|(name, value)| format_entry(name, value))
        .collect()
}
