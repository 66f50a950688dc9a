use crate::{
    condition::ConditionError,
    config::Verb,
    node::NodeError,
    path::{Segment, Spath},
    resolve::ResolveError,
    resolver::ResolverError,
};

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("Failed to resolve path: {0}")]
    ResolveError(#[from] ResolveError),

    #[error("Failed to evaluate conditions: {0}")]
    Condition(#[from] ConditionError),

    #[error("Failed to build node from value: {0}")]
    Node(#[from] NodeError),

    #[error("More than 1 match found for source path '{path}' ({count} matches)")]
    AmbiguousSource { path: Spath, count: usize },

    #[error("Failed to decode {target} at '{path}': {source}")]
    Decode {
        target: &'static str,
        path: Spath,
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("'{verb}' requires a name resolver")]
    MissingResolver { verb: Verb },

    #[error("Cannot remove the root of the document")]
    CannotRemoveRoot,

    #[error("Expected a mapping or sequence, found {actual}")]
    NotAContainer { actual: String },

    #[error("Expected a {expected} value, found {actual}")]
    IncompatibleValue {
        expected: &'static str,
        actual: String,
    },

    #[error("No child '{segment}' in the target container")]
    ChildNotFound { segment: String },
}

impl PatchError {
    pub fn ambiguous_source(path: &Spath, count: usize) -> Self {
        PatchError::AmbiguousSource {
            path: path.clone(),
            count,
        }
    }

    pub fn decode(target: &'static str, path: &Spath, source: serde_yaml::Error) -> Self {
        PatchError::Decode {
            target,
            path: path.clone(),
            source,
        }
    }

    pub fn not_a_container(actual: &str) -> Self {
        PatchError::NotAContainer {
            actual: actual.to_string(),
        }
    }

    pub fn incompatible_value(expected: &'static str, actual: &str) -> Self {
        PatchError::IncompatibleValue {
            expected,
            actual: actual.to_string(),
        }
    }

    pub fn child_not_found(segment: &Segment) -> Self {
        PatchError::ChildNotFound {
            segment: segment.name(),
        }
    }
}

/// A patch that failed while applying a patch list, with the verb and path
/// it was working on.
#[derive(Debug, thiserror::Error)]
#[error("patch #{index} ({verb} '{path}') failed: {source}")]
pub struct ApplyError {
    pub index: usize,
    pub verb: Verb,
    pub path: Spath,
    #[source]
    pub source: PatchError,
}
