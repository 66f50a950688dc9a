use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::{Node, NodeError, Scalar, ScalarTag};

/// Builds a document node from any serializable value.
///
/// The result is always wrapped in [`Node::Document`], the same shape the
/// parser produces, so callers can treat parsed and built values alike.
pub fn new_node<T>(value: &T) -> Result<Node, NodeError>
where
    T: Serialize + ?Sized,
{
    let value = serde_yaml::to_value(value)?;
    Ok(Node::document(Node::try_from(value)?))
}

impl TryFrom<Value> for Node {
    type Error = NodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Node::Scalar(Scalar::null())),
            Value::Bool(b) => Ok(Node::Scalar(Scalar::new(b.to_string(), ScalarTag::Bool))),
            Value::Number(n) => {
                let tag = if n.is_f64() {
                    ScalarTag::Float
                } else {
                    ScalarTag::Int
                };
                Ok(Node::Scalar(Scalar::new(n.to_string(), tag)))
            }
            Value::String(s) => Ok(Node::Scalar(Scalar::string(s))),
            Value::Sequence(items) => items
                .into_iter()
                .map(Node::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Sequence),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let key = match Node::try_from(key)? {
                        Node::Scalar(scalar) => scalar,
                        other => return Err(NodeError::non_scalar_key(&other.kind_desc())),
                    };
                    entries.push((key, Node::try_from(value)?));
                }
                Ok(Node::Mapping(entries))
            }
            // custom tags carry no meaning for patching, keep the tagged value
            Value::Tagged(tagged) => Node::try_from(tagged.value),
        }
    }
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self.tag {
            ScalarTag::Null => Value::Null,
            ScalarTag::Str => Value::String(self.value.clone()),
            ScalarTag::Bool | ScalarTag::Int | ScalarTag::Float => {
                match serde_yaml::from_str::<Value>(&self.value) {
                    Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
                    _ => Value::String(self.value.clone()),
                }
            }
        }
    }
}

impl Node {
    /// Parses YAML (or JSON) text into a document node.
    pub fn from_yaml_str(input: &str) -> Result<Node, NodeError> {
        let value: Value = serde_yaml::from_str(input)?;
        Ok(Node::document(Node::try_from(value)?))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(scalar) => scalar.to_value(),
            Node::Mapping(entries) => {
                let mut map = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.to_value(), value.to_value());
                }
                Value::Mapping(map)
            }
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
            Node::Document(root) => root.to_value(),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, NodeError> {
        Ok(serde_yaml::to_string(&self.to_value())?)
    }

    pub fn to_json_string(&self) -> Result<String, NodeError> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }
}
