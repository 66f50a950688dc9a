use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::Patch,
    node::{Node, new_node},
    patch::{conditions_hold, error::PatchError, primitives::replace_node},
    path::Spath,
    resolve::resolve,
    resolver::{LabelSelector, Labels, NameResolver, ResolverError},
};

/// The "rewriteName" verb passes every matched scalar through
/// [`NameResolver::translate_name`] and stores the result as a string.
///
/// Matches that are not scalars are left untouched.
pub fn rewrite_name(
    doc: &mut Node,
    patch: &Patch,
    resolver: &dyn NameResolver,
) -> Result<(), PatchError> {
    for location in &resolve(doc, &patch.path)? {
        if !conditions_hold(doc, location, patch)? {
            continue;
        }

        let Some(Node::Scalar(scalar)) = doc.get(location) else {
            log::debug!(
                target: "nodepatch::patch",
                "'{location}' is not a scalar, not renaming it"
            );
            continue;
        };
        let name = scalar.value.clone();

        let translated =
            resolver.translate_name(&name, patch.pattern.as_ref(), patch.from_path.as_ref())?;
        log::trace!(
            target: "nodepatch::patch",
            "renamed '{name}' to '{translated}' at '{location}'"
        );
        replace_node(doc, location, Node::string(translated))?;
    }
    Ok(())
}

/// The "rewriteLabelSelector" verb decodes every matched mapping as a flat
/// label map, translates it and writes the result back.
pub fn rewrite_label_selector(
    doc: &mut Node,
    patch: &Patch,
    resolver: &dyn NameResolver,
) -> Result<(), PatchError> {
    rewrite_mappings(doc, patch, "label selector", |labels: Labels| {
        resolver.translate_label_selector(labels)
    })
}

/// The "rewriteLabelExpressionsSelector" verb decodes every matched mapping
/// as a `matchLabels`/`matchExpressions` selector, translates it and writes
/// the result back.
pub fn rewrite_label_expressions_selector(
    doc: &mut Node,
    patch: &Patch,
    resolver: &dyn NameResolver,
) -> Result<(), PatchError> {
    rewrite_mappings(
        doc,
        patch,
        "label expressions selector",
        |selector: LabelSelector| resolver.translate_label_expressions_selector(selector),
    )
}

/// Decodes, translates and writes back every mapping match whose conditions
/// hold. Matches skipped by their conditions are never decoded.
fn rewrite_mappings<T, F>(
    doc: &mut Node,
    patch: &Patch,
    target: &'static str,
    translate: F,
) -> Result<(), PatchError>
where
    T: DeserializeOwned + Serialize,
    F: Fn(T) -> Result<T, ResolverError>,
{
    for location in &resolve(doc, &patch.path)? {
        if !conditions_hold(doc, location, patch)? {
            continue;
        }

        let Some(node) = doc.get(location).filter(|node| node.is_mapping()) else {
            log::debug!(
                target: "nodepatch::patch",
                "'{location}' is not a mapping, not rewriting it"
            );
            continue;
        };
        let decoded: T = decode_strict(node, location, target)?;

        let translated = translate(decoded)?;
        replace_node(doc, location, new_node(&translated)?)?;
    }
    Ok(())
}

/// Decodes `node` into `T`, rejecting fields `T` does not know.
fn decode_strict<T: DeserializeOwned>(
    node: &Node,
    location: &Spath,
    target: &'static str,
) -> Result<T, PatchError> {
    let text = node.to_yaml_string()?;
    serde_yaml::from_str(&text).map_err(|source| PatchError::decode(target, location, source))
}
