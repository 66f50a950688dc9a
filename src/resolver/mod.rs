//! Name translation capability consumed by the rewrite verbs.
//!
//! The patch engine never decides how a name maps between naming domains.
//! It hands raw names and selectors to a [`NameResolver`] and splices the
//! result back into the tree.

mod labels;
mod suffix;

use regex::Regex;

pub use labels::{LabelSelector, LabelSelectorOperator, LabelSelectorRequirement, Labels};
pub use suffix::SuffixResolver;

use crate::path::Spath;

/// Capture group holding the name part of a value matched by a rewrite pattern.
pub const NAME_GROUP: &str = "NAME";

/// Capture group holding the namespace part of a value matched by a rewrite pattern.
pub const NAMESPACE_GROUP: &str = "NAMESPACE";

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ResolverError {
    pub fn msg(message: impl Into<String>) -> Self {
        ResolverError::Message(message.into())
    }
}

pub trait NameResolver {
    /// Translates a single name. `pattern`, when given, carries `NAME` and
    /// optionally `NAMESPACE` capture groups locating the parts to translate.
    fn translate_name(
        &self,
        name: &str,
        pattern: Option<&Regex>,
        from_path: Option<&Spath>,
    ) -> Result<String, ResolverError>;

    fn translate_label_selector(&self, selector: Labels) -> Result<Labels, ResolverError>;

    fn translate_label_expressions_selector(
        &self,
        selector: LabelSelector,
    ) -> Result<LabelSelector, ResolverError>;
}
