#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Mapping keys must be scalars, found {found}")]
    NonScalarKey { found: String },

    #[error("YAML conversion failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    pub fn non_scalar_key(found: &str) -> Self {
        NodeError::NonScalarKey {
            found: found.to_string(),
        }
    }
}
