use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{
    condition::{Condition, deserialize_some},
    node::{Node, NodeError, new_node},
    path::Spath,
    resolver::NAME_GROUP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verb {
    Add,
    Remove,
    Replace,
    CopyFromObject,
    RewriteName,
    RewriteLabelSelector,
    RewriteLabelExpressionsSelector,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Add => "add",
            Verb::Remove => "remove",
            Verb::Replace => "replace",
            Verb::CopyFromObject => "copyFromObject",
            Verb::RewriteName => "rewriteName",
            Verb::RewriteLabelSelector => "rewriteLabelSelector",
            Verb::RewriteLabelExpressionsSelector => "rewriteLabelExpressionsSelector",
        }
    }

    fn takes_value(&self) -> bool {
        matches!(self, Verb::Add | Verb::Replace)
    }

    fn reads_from_path(&self) -> bool {
        matches!(self, Verb::CopyFromObject | Verb::RewriteName)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single patch: a verb, the path it targets and everything the verb needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Patch {
    pub op: Verb,

    pub path: Spath,

    /// Where copy and rename verbs read from. Defaults to `path`.
    #[serde(default)]
    pub from_path: Option<Spath>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub value: Option<serde_yaml::Value>,

    /// Name pattern for `rewriteName`, with `NAME` and optional `NAMESPACE` groups.
    #[serde(default, rename = "regex", deserialize_with = "deserialize_regex")]
    pub pattern: Option<Regex>,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;
    Regex::new(&pattern).map(Some).map_err(de::Error::custom)
}

impl Patch {
    pub fn new(op: Verb, path: Spath) -> Self {
        Patch {
            op,
            path,
            from_path: None,
            value: None,
            pattern: None,
            conditions: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<serde_yaml::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_from_path(mut self, from_path: Spath) -> Self {
        self.from_path = Some(from_path);
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// `from_path`, falling back to `path`.
    pub fn source_path(&self) -> &Spath {
        self.from_path.as_ref().unwrap_or(&self.path)
    }

    /// The patch value as a document node; a missing value is `null`.
    pub fn value_node(&self) -> Result<Node, NodeError> {
        match &self.value {
            Some(value) => new_node(value),
            None => Ok(Node::document(Node::null())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl PatchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.patches.is_empty() {
            issues.push(ValidationIssue::EmptyPatchList);
        }

        for (index, patch) in self.patches.iter().enumerate() {
            let verb = patch.op;

            if verb.takes_value() && patch.value.is_none() {
                issues.push(ValidationIssue::MissingField {
                    index,
                    verb,
                    field: "value",
                });
            }
            if !verb.takes_value() && patch.value.is_some() {
                issues.push(ValidationIssue::UnusedField {
                    index,
                    verb,
                    field: "value",
                });
            }
            if !verb.reads_from_path() && patch.from_path.is_some() {
                issues.push(ValidationIssue::UnusedField {
                    index,
                    verb,
                    field: "fromPath",
                });
            }

            if let Some(pattern) = &patch.pattern {
                if verb != Verb::RewriteName {
                    issues.push(ValidationIssue::UnusedField {
                        index,
                        verb,
                        field: "regex",
                    });
                }
                if !pattern
                    .capture_names()
                    .any(|name| name == Some(NAME_GROUP))
                {
                    issues.push(ValidationIssue::InvalidPattern {
                        index,
                        message: format!("missing '{NAME_GROUP}' capture group in '{pattern}'"),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", display_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn display_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("patch config contains no patches")]
    EmptyPatchList,

    #[error("patch #{index} ({verb}) missing required field '{field}'")]
    MissingField {
        index: usize,
        verb: Verb,
        field: &'static str,
    },

    #[error("patch #{index} ({verb}) sets '{field}', which this verb ignores")]
    UnusedField {
        index: usize,
        verb: Verb,
        field: &'static str,
    },

    #[error("patch #{index} has an invalid regex: {message}")]
    InvalidPattern { index: usize, message: String },
}
