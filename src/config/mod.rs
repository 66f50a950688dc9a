mod loader;
mod schema;

pub use loader::{ConfigError, load_from_path, load_from_str};
pub use schema::{Patch, PatchConfig, ValidationError, ValidationIssue, Verb};
