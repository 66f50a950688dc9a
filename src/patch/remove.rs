use crate::{
    config::Patch,
    node::Node,
    patch::{conditions_hold, error::PatchError, primitives::remove_node},
    resolve::resolve,
};

/// The "remove" verb deletes every match of `path` whose conditions hold.
///
/// A path that matches nothing leaves the document untouched.
pub fn remove(doc: &mut Node, patch: &Patch) -> Result<(), PatchError> {
    let matches = resolve(doc, &patch.path)?;
    if matches.is_empty() {
        log::debug!(target: "nodepatch::patch", "nothing to remove at '{}'", patch.path);
    }

    // Back to front, so sequence indexes of earlier matches stay valid.
    for location in matches.iter().rev() {
        if conditions_hold(doc, location, patch)? {
            remove_node(doc, location)?;
        }
    }
    Ok(())
}
