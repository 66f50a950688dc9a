//! Conditions gating a patch on a candidate match.
//!
//! A condition points at zero or more nodes, either from the document root,
//! from the candidate, or from the candidate's parent, and asserts something
//! about them. All conditions of a patch must hold.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    navigate,
    node::{Node, NodeError, new_node},
    path::{PathError, Spath},
    resolve::{ResolveError, resolve},
};

#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    #[error("Failed to resolve condition path: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Failed to build comparison value: {0}")]
    Value(#[from] NodeError),
}

/// Where a condition starts looking.
///
/// Written as text: `""` is the candidate, `.spec` is relative to the
/// candidate, `..kind` is relative to the candidate's parent, and anything
/// else is resolved from the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConditionPath {
    Candidate(Spath),
    Parent(Spath),
    Absolute(Spath),
}

impl Default for ConditionPath {
    fn default() -> Self {
        ConditionPath::Candidate(Spath::root())
    }
}

impl FromStr for ConditionPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("..") {
            Ok(ConditionPath::Parent(rest.parse()?))
        } else if let Some(rest) = s.strip_prefix('.') {
            Ok(ConditionPath::Candidate(rest.parse()?))
        } else if s.is_empty() {
            Ok(ConditionPath::default())
        } else {
            Ok(ConditionPath::Absolute(s.parse()?))
        }
    }
}

impl TryFrom<String> for ConditionPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ConditionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionPath::Candidate(path) if path.is_empty() => Ok(()),
            ConditionPath::Candidate(path) => write!(f, ".{path}"),
            ConditionPath::Parent(path) => write!(f, "..{path}"),
            ConditionPath::Absolute(path) => write!(f, "{path}"),
        }
    }
}

impl From<ConditionPath> for String {
    fn from(value: ConditionPath) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Condition {
    #[serde(default)]
    pub path: ConditionPath,

    /// Resolved again from every node `path` points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<Spath>,

    /// Every referenced node equals this value, and there is at least one.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub equal: Option<serde_yaml::Value>,

    /// No referenced node equals this value.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_equal: Option<serde_yaml::Value>,

    /// `true`: nothing is referenced. `false`: something is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
}

/// Keeps an explicit `null` as `Some(Null)` instead of collapsing it to `None`.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Condition {
    pub fn new(path: ConditionPath) -> Self {
        Condition {
            path,
            ..Condition::default()
        }
    }

    pub fn with_sub_path(mut self, sub_path: Spath) -> Self {
        self.sub_path = Some(sub_path);
        self
    }

    pub fn equal(mut self, value: impl Into<serde_yaml::Value>) -> Self {
        self.equal = Some(value.into());
        self
    }

    pub fn not_equal(mut self, value: impl Into<serde_yaml::Value>) -> Self {
        self.not_equal = Some(value.into());
        self
    }

    pub fn empty(mut self, empty: bool) -> Self {
        self.empty = Some(empty);
        self
    }

    pub fn evaluate(&self, doc: &Node, candidate: Option<&Node>) -> Result<bool, ConditionError> {
        let nodes = self.referenced_nodes(doc, candidate)?;

        if let Some(empty) = self.empty
            && nodes.is_empty() != empty
        {
            return Ok(false);
        }

        if let Some(expected) = &self.equal {
            let expected = new_node(expected)?;
            if nodes.is_empty() || !nodes.iter().all(|node| node.same_value(&expected)) {
                return Ok(false);
            }
        }

        if let Some(unexpected) = &self.not_equal {
            let unexpected = new_node(unexpected)?;
            if nodes.iter().any(|node| node.same_value(&unexpected)) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Nodes the condition talks about. Candidate- and parent-relative paths
    /// reference nothing when there is no candidate.
    fn referenced_nodes<'a>(
        &self,
        doc: &'a Node,
        candidate: Option<&'a Node>,
    ) -> Result<Vec<&'a Node>, ConditionError> {
        let bases = match &self.path {
            ConditionPath::Absolute(path) => nodes_at(doc, path)?,
            ConditionPath::Candidate(path) => match candidate {
                Some(candidate) => nodes_at(candidate, path)?,
                None => Vec::new(),
            },
            ConditionPath::Parent(path) => {
                match candidate.and_then(|candidate| navigate::parent_of(doc, candidate)) {
                    Some(parent) => nodes_at(parent, path)?,
                    None => Vec::new(),
                }
            }
        };

        let Some(sub_path) = &self.sub_path else {
            return Ok(bases);
        };

        let mut nodes = Vec::new();
        for base in bases {
            nodes.extend(nodes_at(base, sub_path)?);
        }
        Ok(nodes)
    }
}

fn nodes_at<'a>(base: &'a Node, path: &Spath) -> Result<Vec<&'a Node>, ResolveError> {
    Ok(resolve(base, path)?
        .iter()
        .filter_map(|location| base.get(location))
        .collect())
}

/// Evaluates `conditions` conjunctively against `candidate`, stopping at the
/// first one that does not hold. `candidate` is `None` when the patch path
/// matched nothing.
pub fn validate_all(
    doc: &Node,
    candidate: Option<&Node>,
    conditions: &[Condition],
) -> Result<bool, ConditionError> {
    for condition in conditions {
        if !condition.evaluate(doc, candidate)? {
            log::trace!(target: "nodepatch::condition", "condition not met: {condition:?}");
            return Ok(false);
        }
    }
    Ok(true)
}
