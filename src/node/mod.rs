//! Document tree model.
//!
//! A parsed document is a tree of [`Node`]s with single ownership: every
//! node except the root sits in exactly one container. Mutation happens
//! through concrete locations ([`Spath`]) rather than parent links.

mod convert;
mod error;

pub use convert::new_node;
pub use error::NodeError;

use crate::path::{Segment, Spath};

/// The literal type of a scalar, kept so a quoted `"1"` stays a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarTag {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scalar {
    pub value: String,
    pub tag: ScalarTag,
}

impl Scalar {
    pub fn new(value: impl Into<String>, tag: ScalarTag) -> Self {
        Scalar {
            value: value.into(),
            tag,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Scalar::new(value, ScalarTag::Str)
    }

    pub fn null() -> Self {
        Scalar::new("null", ScalarTag::Null)
    }

    pub fn is_null(&self) -> bool {
        self.tag == ScalarTag::Null
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    /// Key/value entries in document order. Lookup is by key text.
    Mapping(Vec<(Scalar, Node)>),
    Sequence(Vec<Node>),
    /// Wrapper around a document's root value.
    Document(Box<Node>),
}

impl Node {
    pub fn document(root: Node) -> Self {
        Node::Document(Box::new(root))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(value))
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::null())
    }

    pub fn is_null(&self) -> bool {
        matches!(self.as_unwrapped(), Node::Scalar(scalar) if scalar.is_null())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.as_unwrapped(), Node::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.as_unwrapped(), Node::Mapping(_))
    }

    /// Strips every `Document` wrapper.
    pub fn into_unwrapped(self) -> Node {
        match self {
            Node::Document(root) => root.into_unwrapped(),
            other => other,
        }
    }

    pub fn as_unwrapped(&self) -> &Node {
        match self {
            Node::Document(root) => root.as_unwrapped(),
            other => other,
        }
    }

    pub fn as_unwrapped_mut(&mut self) -> &mut Node {
        match self {
            Node::Document(root) => root.as_unwrapped_mut(),
            other => other,
        }
    }

    /// Structural equality ignoring document wrappers.
    pub fn same_value(&self, other: &Node) -> bool {
        self.as_unwrapped() == other.as_unwrapped()
    }

    /// Direct child addressed by `segment`, without unwrapping it.
    pub fn child(&self, segment: &Segment) -> Option<&Node> {
        match (self.as_unwrapped(), segment) {
            (Node::Mapping(entries), segment) => {
                let position = key_position(entries, &segment.name())?;
                Some(&entries[position].1)
            }
            (Node::Sequence(items), Segment::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, segment: &Segment) -> Option<&mut Node> {
        match (self.as_unwrapped_mut(), segment) {
            (Node::Mapping(entries), segment) => {
                let position = key_position(entries, &segment.name())?;
                Some(&mut entries[position].1)
            }
            (Node::Sequence(items), Segment::Index(index)) => items.get_mut(*index),
            _ => None,
        }
    }

    /// Node at a concrete location; `Document` wrappers are skipped.
    pub fn get(&self, path: &Spath) -> Option<&Node> {
        let mut current = self.as_unwrapped();
        for segment in path {
            current = current.child(segment)?.as_unwrapped();
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &Spath) -> Option<&mut Node> {
        let mut current = self.as_unwrapped_mut();
        for segment in path {
            current = current.child_mut(segment)?.as_unwrapped_mut();
        }
        Some(current)
    }

    pub fn kind_desc(&self) -> String {
        match self {
            Node::Scalar(scalar) => match scalar.tag {
                ScalarTag::Null => "null".to_string(),
                ScalarTag::Bool => format!("boolean({})", scalar.value),
                ScalarTag::Int => format!("int({})", scalar.value),
                ScalarTag::Float => format!("float({})", scalar.value),
                ScalarTag::Str => format!("string({:?})", scalar.value),
            },
            Node::Mapping(_) => "mapping".to_string(),
            Node::Sequence(_) => "sequence".to_string(),
            Node::Document(_) => "document".to_string(),
        }
    }
}

pub(crate) fn key_position(entries: &[(Scalar, Node)], key: &str) -> Option<usize> {
    entries.iter().position(|(k, _)| k.value == key)
}

/// Overwrites the value of an existing key in place, or appends a new entry.
pub(crate) fn set_entry(entries: &mut Vec<(Scalar, Node)>, key: Scalar, value: Node) {
    match key_position(entries, &key.value) {
        Some(position) => entries[position].1 = value,
        None => entries.push((key, value)),
    }
}
