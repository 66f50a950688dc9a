use crate::{
    condition::validate_all,
    config::Patch,
    node::Node,
    patch::{conditions_hold, error::PatchError, primitives::add_node, synth::create_path},
    resolve::resolve,
};

/// The "add" verb puts the patch value into the document.
///
/// o  Every match of `path` whose conditions hold receives the value: a
///    mapping merges the value's keys, a sequence gets it appended, a
///    scalar gets it as its next sibling.
///
/// o  If `path` matches nothing, the path is created and the value placed
///    at its end, provided the conditions hold with no candidate.
///
/// For example, adding `nginx` at `spec.containers.0.name` to
///
/// spec: {}
///
/// yields
///
/// spec:
///   containers:
///     - name: nginx
pub fn add(doc: &mut Node, patch: &Patch) -> Result<(), PatchError> {
    let value = patch.value_node()?;
    let matches = resolve(doc, &patch.path)?;

    if matches.is_empty() {
        if !validate_all(doc, None, &patch.conditions)? {
            log::debug!(
                target: "nodepatch::patch",
                "conditions not met for missing '{}', skipping",
                patch.path
            );
            return Ok(());
        }
        return create_path(doc, &patch.path, value);
    }

    for location in &matches {
        if conditions_hold(doc, location, patch)? {
            add_node(doc, location, value.clone())?;
        }
    }
    Ok(())
}
