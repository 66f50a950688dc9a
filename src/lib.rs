//! Path-addressed patching of YAML/JSON document trees.
//!
//! A document is parsed into a [`Node`] tree, patches select nodes with a
//! dotted [`Spath`], and verbs such as `add`, `replace` or `rewriteName`
//! edit the matches in place, optionally gated by conditions.

pub mod condition;
pub mod config;
pub mod navigate;
pub mod node;
pub mod patch;
pub mod path;
pub mod resolve;
pub mod resolver;

pub use config::{Patch, PatchConfig, Verb};
pub use node::Node;
pub use patch::{ApplyError, PatchContext, PatchError, apply, apply_all};
pub use path::Spath;
pub use resolver::{NameResolver, SuffixResolver};
