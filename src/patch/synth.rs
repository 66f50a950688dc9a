use crate::{
    navigate::add_child_at_index,
    node::{Node, Scalar, set_entry},
    patch::{error::PatchError, primitives::node_at_mut},
    path::{Segment, Spath},
    resolve::get_parents,
};

/// Materializes `path` in `doc` and places `value` at its end.
///
/// Walks up from the target until an existing ancestor is found, wrapping
/// the value one level per missing segment: a sequence for an index
/// segment, a mapping for anything else. The wrapped value is then spliced
/// into every existing ancestor.
pub fn create_path(doc: &mut Node, path: &Spath, value: Node) -> Result<(), PatchError> {
    let value = value.into_unwrapped();

    let Some(child) = path.last_segment() else {
        log::debug!(
            target: "nodepatch::patch",
            "no existing ancestor to create a path in, skipping"
        );
        return Ok(());
    };

    let parents = get_parents(doc, path)?;
    if parents.is_empty() {
        log::trace!(
            target: "nodepatch::patch",
            "'{}' is missing, wrapping the value in '{child}'",
            path.parent_path()
        );
        return create_path(doc, &path.parent_path(), wrap(child, value));
    }

    for parent in &parents {
        splice(doc, parent, child, value.clone())?;
    }
    Ok(())
}

fn wrap(child: &Segment, value: Node) -> Node {
    match child {
        Segment::Index(_) => Node::Sequence(vec![value]),
        Segment::Key(key) => Node::Mapping(vec![(Scalar::string(key.as_str()), value)]),
    }
}

fn splice(
    doc: &mut Node,
    location: &Spath,
    child: &Segment,
    value: Node,
) -> Result<(), PatchError> {
    let parent = node_at_mut(doc, location)?;
    if parent.is_null() {
        *parent = wrap(child, value);
        return Ok(());
    }

    match parent {
        Node::Mapping(entries) => {
            set_entry(entries, Scalar::string(child.name()), value);
            Ok(())
        }
        Node::Sequence(items) => {
            items.push(value);
            Ok(())
        }
        other => {
            let actual = other.kind_desc();
            let Some(after) = location.last_segment() else {
                return Err(PatchError::not_a_container(&actual));
            };
            let grandparent = node_at_mut(doc, &location.parent_path())?;
            add_child_at_index(grandparent, after, wrap(child, value))
        }
    }
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
    fn creates_missing_mappings() {
        let mut doc = doc("{}");

        create_path(&mut doc, &path("metadata.labels.app"), Node::string("web")).unwrap();

        check!(doc == self::doc("metadata:\n  labels:\n    app: web\n"));
    }

    #[test]
    fn index_segment_creates_sequence() {
        let mut doc = doc("spec: {}\n");

        create_path(&mut doc, &path("spec.containers.0.name"), Node::string("nginx")).unwrap();

        check!(doc == self::doc("spec:\n  containers:\n    - name: nginx\n"));
    }

    #[test]
    fn splices_into_existing_mapping() {
        let mut doc = doc("metadata:\n  name: a\n");

        create_path(&mut doc, &path("metadata.namespace"), Node::string("ns")).unwrap();

        check!(doc == self::doc("metadata:\n  name: a\n  namespace: ns\n"));
    }

    #[test]
    fn appends_to_existing_sequence() {
        let mut doc = doc("args: [a]\n");

        create_path(&mut doc, &path("args.5"), Node::string("b")).unwrap();

        check!(doc == self::doc("args: [a, b]\n"));
    }

    #[test]
    fn null_parent_becomes_container() {
        let mut doc = doc("spec:\n  template: ~\n");

        create_path(&mut doc, &path("spec.template.name"), Node::string("web")).unwrap();

        check!(doc == self::doc("spec:\n  template:\n    name: web\n"));
    }

    #[test]
    fn empty_path_is_a_no_op() {
        let mut doc = doc("a: 1\n");

        create_path(&mut doc, &Spath::root(), Node::string("x")).unwrap();

        check!(doc == self::doc("a: 1\n"));
    }

    #[test]
    fn scalar_root_cannot_hold_children() {
        let mut doc = doc("text");

        let_assert!(
            Err(PatchError::ResolveError(_)) =
                create_path(&mut doc, &path("a.b"), Node::string("x"))
        );
        check!(doc == self::doc("text"));
    }

    #[test]
    fn merges_into_existing_key_of_every_parent() {
        let mut doc = doc("metadata:\n  labels:\n    app: web\n");

        create_path(&mut doc, &path("metadata.labels.app"), Node::string("api")).unwrap();

        check!(doc == self::doc("metadata:\n  labels:\n    app: api\n"));
    }
}
