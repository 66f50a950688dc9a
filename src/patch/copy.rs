use crate::{
    condition::validate_all,
    config::Patch,
    node::Node,
    patch::{
        conditions_hold,
        error::PatchError,
        primitives::{remove_node, replace_node},
        synth::create_path,
    },
    path::Spath,
    resolve::resolve,
};

/// The "copyFromObject" verb mirrors a value of the source document into
/// the target document.
///
/// The value is read from `fromPath` (or `path`) in `source` and written to
/// `path` in `doc`:
///
/// o  If the source has the value and the target matches, every matching
///    target node whose conditions hold is replaced by a copy of it.
///
/// o  If the source has the value and the target matches nothing, the
///    target path is created, provided the conditions hold with no
///    candidate.
///
/// o  If the source lacks the value, every matching target node whose
///    conditions hold is removed.
///
/// Without a source document the verb does nothing.
pub fn copy_from_object(
    doc: &mut Node,
    source: Option<&Node>,
    patch: &Patch,
) -> Result<(), PatchError> {
    let Some(source) = source else {
        log::debug!(
            target: "nodepatch::patch",
            "no source document, skipping copy to '{}'",
            patch.path
        );
        return Ok(());
    };

    let from_matches = resolve(source, patch.source_path())?;
    copy_matches(doc, source, &from_matches, patch)
}

/// Copies from already resolved source locations. More than one location is
/// rejected before `doc` is touched.
fn copy_matches(
    doc: &mut Node,
    source: &Node,
    from_matches: &[Spath],
    patch: &Patch,
) -> Result<(), PatchError> {
    let value = match single_source(patch.source_path(), from_matches)? {
        Some(location) => source.get(location).cloned(),
        None => None,
    };

    let matches = resolve(doc, &patch.path)?;

    if matches.is_empty() {
        let Some(value) = value else {
            return Ok(());
        };
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

    for location in matches.iter().rev() {
        if !conditions_hold(doc, location, patch)? {
            continue;
        }
        match &value {
            Some(value) => replace_node(doc, location, value.clone())?,
            None => remove_node(doc, location)?,
        }
    }
    Ok(())
}

fn single_source<'a>(
    from_path: &Spath,
    matches: &'a [Spath],
) -> Result<Option<&'a Spath>, PatchError> {
    match matches {
        [] => Ok(None),
        [location] => Ok(Some(location)),
        _ => Err(PatchError::ambiguous_source(from_path, matches.len())),
    }
}
