use crate::{
    navigate::{add_child_at_index, remove_child, remove_property},
    node::{Node, set_entry},
    patch::error::PatchError,
    path::{Segment, Spath},
};

pub(super) fn node_at_mut<'a>(
    doc: &'a mut Node,
    location: &Spath,
) -> Result<&'a mut Node, PatchError> {
    doc.get_mut(location).ok_or_else(|| PatchError::ChildNotFound {
        segment: location.to_string(),
    })
}

/// Adds `value` into the node at `location`.
///
/// o  A mapping absorbs the entries of a mapping value; keys that already
///    exist get the new value, new keys are appended.
///
/// o  A sequence gets the value appended as one element.
///
/// o  An explicit `null` is an empty slot and becomes the value, the same
///    way path synthesis fills a `null` parent.
///
/// o  Any other scalar gets the value inserted as its next sibling in the
///    parent container.
pub fn add_node(doc: &mut Node, location: &Spath, value: Node) -> Result<(), PatchError> {
    let value = value.into_unwrapped();

    if doc.get(location).is_some_and(Node::is_null) {
        return replace_node(doc, location, value);
    }

    if doc.get(location).is_some_and(Node::is_scalar) {
        let Some(after) = location.last_segment() else {
            return Err(PatchError::not_a_container("scalar document root"));
        };
        let parent = node_at_mut(doc, &location.parent_path())?;
        return add_child_at_index(parent, after, value);
    }

    match node_at_mut(doc, location)? {
        Node::Mapping(entries) => {
            let new_entries = match value {
                Node::Mapping(new_entries) => new_entries,
                other => {
                    return Err(PatchError::incompatible_value(
                        "mapping",
                        &other.kind_desc(),
                    ));
                }
            };
            for (key, value) in new_entries {
                set_entry(entries, key, value);
            }
            Ok(())
        }
        Node::Sequence(items) => {
            items.push(value);
            Ok(())
        }
        other => Err(PatchError::not_a_container(&other.kind_desc())),
    }
}

/// Substitutes the node at `location` with `value`.
pub fn replace_node(doc: &mut Node, location: &Spath, value: Node) -> Result<(), PatchError> {
    *node_at_mut(doc, location)? = value.into_unwrapped();
    Ok(())
}

/// Removes the node at `location` from its parent. A mapping parent loses
/// the whole key/value entry, a sequence parent the element.
pub fn remove_node(doc: &mut Node, location: &Spath) -> Result<(), PatchError> {
    let Some(last) = location.last_segment() else {
        return Err(PatchError::CannotRemoveRoot);
    };

    let parent = node_at_mut(doc, &location.parent_path())?;
    if parent.is_mapping() {
        remove_property(parent, &last.name())?;
    } else {
        match last {
            Segment::Index(index) => remove_child(parent, *index)?,
            Segment::Key(_) => return Err(PatchError::child_not_found(last)),
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn doc(yaml: &str) -> Node {
        Node::from_yaml_str(yaml).unwrap()
    }

    fn path(p: &str) -> Spath {
        p.try_into().unwrap()
    }

    #[test]
    fn add_node_merges_mappings() {
        let mut doc = doc("labels:\n  app: web\n  tier: a\n");

        add_node(&mut doc, &path("labels"), self::doc("tier: b\nzone: x\n")).unwrap();

        check!(doc == self::doc("labels:\n  app: web\n  tier: b\n  zone: x\n"));
    }

    #[test]
    fn add_node_appends_to_sequence() {
        let mut doc = doc("args: [a]\n");

        add_node(&mut doc, &path("args"), Node::string("b")).unwrap();

        check!(doc == self::doc("args: [a, b]\n"));
    }

    #[test]
    fn add_node_appends_sequence_value_as_one_element() {
        let mut doc = doc("args: [a]\n");

        add_node(&mut doc, &path("args"), self::doc("[b, c]")).unwrap();

        check!(doc == self::doc("args: [a, [b, c]]\n"));
    }

    #[test]
    fn add_node_next_to_scalar_in_sequence() {
        let mut doc = doc("args: [a, c]\n");

        add_node(&mut doc, &path("args.0"), Node::string("b")).unwrap();

        check!(doc == self::doc("args: [a, b, c]\n"));
    }

    #[test]
    fn add_node_to_mapping_with_scalar_value_fails() {
        let mut doc = doc("labels: {}\n");

        let_assert!(
            Err(PatchError::IncompatibleValue { expected, .. }) =
                add_node(&mut doc, &path("labels"), Node::string("x"))
        );
        check!(expected == "mapping");
    }

    #[test]
    fn add_node_to_scalar_root_fails() {
        let mut doc = doc("just text");

        let_assert!(
            Err(PatchError::NotAContainer { .. }) =
                add_node(&mut doc, &Spath::root(), Node::string("x"))
        );
    }

    #[test]
    fn add_node_fills_null() {
        let mut doc = doc("metadata:\n  labels: ~\n");

        add_node(&mut doc, &path("metadata.labels"), self::doc("app: web")).unwrap();

        check!(doc == self::doc("metadata:\n  labels:\n    app: web\n"));
    }

    #[test]
    fn replace_node_at_root_keeps_document_wrapper() {
        let mut doc = doc("a: 1");

        replace_node(&mut doc, &Spath::root(), self::doc("b: 2")).unwrap();

        check!(doc == self::doc("b: 2"));
    }

    #[test]
    fn remove_node_from_mapping_removes_entry() {
        let mut doc = doc("a: 1\nb: 2\n");

        remove_node(&mut doc, &path("a")).unwrap();

        check!(doc == self::doc("b: 2"));
    }

    #[test]
    fn remove_root_fails() {
        let mut doc = doc("a: 1");

        let_assert!(Err(PatchError::CannotRemoveRoot) = remove_node(&mut doc, &Spath::root()));
    }
}
