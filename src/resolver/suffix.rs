use regex::Regex;

use crate::path::Spath;

use super::{
    LabelSelector, LabelSelectorOperator, Labels, NAME_GROUP, NAMESPACE_GROUP, NameResolver,
    ResolverError,
};

/// Scopes names into a flat target namespace by appending the source
/// namespace: `name` in `ns` becomes `name-x-ns`, or `name-x-ns-x-suffix`
/// when a suffix is configured.
#[derive(Debug, Clone)]
pub struct SuffixResolver {
    namespace: String,
    suffix: Option<String>,
    target_namespace: Option<String>,
}

impl SuffixResolver {
    pub fn new(namespace: impl Into<String>) -> Self {
        SuffixResolver {
            namespace: namespace.into(),
            suffix: None,
            target_namespace: None,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into()).filter(|s| !s.is_empty());
        self
    }

    /// Namespace written over a pattern's `NAMESPACE` group. Without it the
    /// namespace part of a matched value is left as is.
    pub fn with_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = Some(namespace.into());
        self
    }

    pub fn physical_name(&self, name: &str, namespace: &str) -> String {
        match &self.suffix {
            Some(suffix) => format!("{name}-x-{namespace}-x-{suffix}"),
            None => format!("{name}-x-{namespace}"),
        }
    }

    fn translate_with_pattern(
        &self,
        value: &str,
        pattern: &Regex,
    ) -> Result<String, ResolverError> {
        let Some(captures) = pattern.captures(value) else {
            log::debug!(
                target: "nodepatch::resolver",
                "'{value}' does not match {pattern}, leaving it untouched"
            );
            return Ok(value.to_string());
        };

        let name = captures.name(NAME_GROUP).ok_or_else(|| {
            ResolverError::msg(format!(
                "pattern '{pattern}' has no '{NAME_GROUP}' capture group"
            ))
        })?;
        let namespace = captures.name(NAMESPACE_GROUP);
        let source_namespace = namespace.map_or(self.namespace.as_str(), |m| m.as_str());

        let renamed = self.physical_name(name.as_str(), source_namespace);
        let mut replacements = vec![(name.range(), renamed)];
        if let (Some(namespace), Some(target)) = (namespace, &self.target_namespace) {
            replacements.push((namespace.range(), target.clone()));
        }
        // splice from the back so earlier ranges stay valid
        replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));

        let mut translated = value.to_string();
        for (range, replacement) in replacements {
            translated.replace_range(range, &replacement);
        }
        Ok(translated)
    }
}

impl NameResolver for SuffixResolver {
    fn translate_name(
        &self,
        name: &str,
        pattern: Option<&Regex>,
        from_path: Option<&Spath>,
    ) -> Result<String, ResolverError> {
        log::trace!(
            target: "nodepatch::resolver",
            "translating '{name}' (from path: {})",
            from_path.map(Spath::to_string).unwrap_or_default()
        );
        match pattern {
            Some(pattern) => self.translate_with_pattern(name, pattern),
            None => Ok(self.physical_name(name, &self.namespace)),
        }
    }

    fn translate_label_selector(&self, mut selector: Labels) -> Result<Labels, ResolverError> {
        for value in selector.values_mut() {
            *value = self.physical_name(value, &self.namespace);
        }
        Ok(selector)
    }

    fn translate_label_expressions_selector(
        &self,
        selector: LabelSelector,
    ) -> Result<LabelSelector, ResolverError> {
        let mut selector = LabelSelector {
            match_labels: self.translate_label_selector(selector.match_labels)?,
            match_expressions: selector.match_expressions,
        };
        for requirement in &mut selector.match_expressions {
            if matches!(
                requirement.operator,
                LabelSelectorOperator::In | LabelSelectorOperator::NotIn
            ) {
                for value in &mut requirement.values {
                    *value = self.physical_name(value, &self.namespace);
                }
            }
        }
        Ok(selector)
    }
}
