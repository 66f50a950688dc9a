//! Predicate search and child-level edits on a single container.
//!
//! Nodes carry no parent links. A parent is recovered by searching for the
//! container whose direct children include the node, see [`contains_child`].

use crate::{
    node::{Node, key_position},
    patch::PatchError,
    path::{Segment, Spath},
};

/// Depth-first, pre-order search. Returns the location of the first node
/// satisfying `predicate`.
pub fn find<P>(doc: &Node, predicate: P) -> Option<Spath>
where
    P: Fn(&Node) -> bool,
{
    let mut location = Spath::root();
    find_inner(doc, &predicate, &mut location)
}

fn find_inner<P>(node: &Node, predicate: &P, location: &mut Spath) -> Option<Spath>
where
    P: Fn(&Node) -> bool,
{
    if predicate(node) {
        return Some(location.clone());
    }

    match node {
        Node::Scalar(_) => None,
        Node::Document(root) => find_inner(root, predicate, location),
        Node::Mapping(entries) => entries.iter().find_map(|(key, value)| {
            location.push(Segment::Key(key.value.clone()));
            let found = find_inner(value, predicate, location);
            location.pop();
            found
        }),
        Node::Sequence(items) => items.iter().enumerate().find_map(|(index, item)| {
            location.push(Segment::Index(index));
            let found = find_inner(item, predicate, location);
            location.pop();
            found
        }),
    }
}

/// Matches the container holding `child` as a direct child, by identity.
///
/// Document wrappers never match, so the root of a document has no parent.
pub fn contains_child(child: &Node) -> impl Fn(&Node) -> bool + '_ {
    move |node| {
        let is_child = |candidate: &Node| {
            std::ptr::eq(candidate, child) || std::ptr::eq(candidate.as_unwrapped(), child)
        };
        match node {
            Node::Mapping(entries) => entries.iter().any(|(_, value)| is_child(value)),
            Node::Sequence(items) => items.iter().any(is_child),
            Node::Scalar(_) | Node::Document(_) => false,
        }
    }
}

/// The container holding `child`, or `None` when `child` is the root.
pub fn parent_of<'a>(doc: &'a Node, child: &Node) -> Option<&'a Node> {
    let location = find(doc, contains_child(child))?;
    doc.get(&location)
}

/// Inserts `value` right after the child `after` of `parent`.
///
/// In a sequence the value becomes the next element. In a mapping the value
/// must itself be a mapping: its entries are placed after the entry keyed
/// `after`, overwriting entries that already exist under the same key.
pub fn add_child_at_index(
    parent: &mut Node,
    after: &Segment,
    value: Node,
) -> Result<(), PatchError> {
    let value = value.into_unwrapped();
    match parent.as_unwrapped_mut() {
        Node::Sequence(items) => {
            let Segment::Index(index) = after else {
                return Err(PatchError::child_not_found(after));
            };
            if *index >= items.len() {
                return Err(PatchError::child_not_found(after));
            }
            items.insert(index + 1, value);
            Ok(())
        }
        Node::Mapping(entries) => {
            let mut insert_at = key_position(entries, &after.name())
                .ok_or_else(|| PatchError::child_not_found(after))?
                + 1;
            let new_entries = match value {
                Node::Mapping(new_entries) => new_entries,
                other => {
                    return Err(PatchError::incompatible_value("mapping", &other.kind_desc()));
                }
            };
            for (key, value) in new_entries {
                match key_position(entries, &key.value) {
                    Some(existing) => entries[existing].1 = value,
                    None => {
                        entries.insert(insert_at, (key, value));
                        insert_at += 1;
                    }
                }
            }
            Ok(())
        }
        other => Err(PatchError::not_a_container(&other.kind_desc())),
    }
}

/// Removes the sequence element at `index` and returns it.
pub fn remove_child(parent: &mut Node, index: usize) -> Result<Node, PatchError> {
    match parent.as_unwrapped_mut() {
        Node::Sequence(items) if index < items.len() => Ok(items.remove(index)),
        Node::Sequence(_) => Err(PatchError::child_not_found(&Segment::Index(index))),
        other => Err(PatchError::not_a_container(&other.kind_desc())),
    }
}

/// Removes the whole key/value entry `key` from a mapping and returns its value.
pub fn remove_property(parent: &mut Node, key: &str) -> Result<Node, PatchError> {
    match parent.as_unwrapped_mut() {
        Node::Mapping(entries) => {
            let position = key_position(entries, key)
                .ok_or_else(|| PatchError::child_not_found(&Segment::key(key)))?;
            Ok(entries.remove(position).1)
        }
        other => Err(PatchError::not_a_container(&other.kind_desc())),
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn doc(yaml: &str) -> Node {
        Node::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn find_returns_first_match_in_document_order() {
        let doc = doc("a:\n  x: 1\nb:\n  - x: 2\n");

        let found = find(&doc, |node| {
            matches!(node, Node::Mapping(entries) if entries.iter().any(|(k, _)| k.value == "x"))
        });

        check!(found == Some("a".try_into().unwrap()));
    }

    #[test]
    fn find_without_match_returns_none() {
        let doc = doc("a: 1");

        check!(find(&doc, |node| matches!(node, Node::Sequence(_))).is_none());
    }

    #[test]
    fn contains_child_locates_parent_by_identity() {
        let doc = doc("a:\n  b: same\nc:\n  d: same\n");
        let child = doc.get(&"c.d".try_into().unwrap()).unwrap();

        // both leaves are equal, only identity tells them apart
        check!(find(&doc, contains_child(child)) == Some("c".try_into().unwrap()));
    }

    #[test]
    fn root_has_no_parent() {
        let doc = doc("a: 1");
        let root = doc.get(&Spath::root()).unwrap();

        check!(parent_of(&doc, root).is_none());
    }

    #[test]
    fn parent_of_sequence_element() {
        let doc = doc("items:\n  - a\n  - b\n");
        let child = doc.get(&"items.1".try_into().unwrap()).unwrap();

        let_assert!(Some(Node::Sequence(items)) = parent_of(&doc, child));
        check!(items.len() == 2);
    }

    #[test]
    fn add_child_at_index_in_sequence() {
        let mut parent = doc("[a, b, c]");

        add_child_at_index(&mut parent, &Segment::Index(0), Node::string("x")).unwrap();

        check!(parent == doc("[a, x, b, c]"));
    }

    #[test]
    fn add_child_at_index_in_mapping_places_entries_after_sibling() {
        let mut parent = doc("a: 1\nb: 2\n");

        add_child_at_index(&mut parent, &Segment::key("a"), doc("x: 9\ny: 8\n")).unwrap();

        let_assert!(Node::Mapping(entries) = parent.as_unwrapped());
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.value.as_str()).collect();
        check!(keys == vec!["a", "x", "y", "b"]);
    }

    #[test]
    fn add_child_at_index_in_mapping_overwrites_existing_keys() {
        let mut parent = doc("a: 1\nb: 2\n");

        add_child_at_index(&mut parent, &Segment::key("a"), doc("b: 3")).unwrap();

        check!(parent == doc("a: 1\nb: 3\n"));
    }

    #[test]
    fn add_child_at_index_in_mapping_rejects_scalars() {
        let mut parent = doc("a: 1");

        let_assert!(
            Err(PatchError::IncompatibleValue { expected, actual }) =
                add_child_at_index(&mut parent, &Segment::key("a"), Node::string("x"))
        );
        check!(expected == "mapping");
        check!(actual == "string(\"x\")");
    }

    #[test]
    fn remove_property_removes_key_and_value() {
        let mut parent = doc("a: 1\nb: 2\n");

        let removed = remove_property(&mut parent, "a").unwrap();

        check!(removed == doc("1").into_unwrapped());
        check!(parent == doc("b: 2"));
    }

    #[test]
    fn remove_child_shifts_elements() {
        let mut parent = doc("[a, b, c]");

        remove_child(&mut parent, 1).unwrap();

        check!(parent == doc("[a, c]"));
    }

    #[test]
    fn remove_child_out_of_range_fails() {
        let mut parent = doc("[a]");

        let_assert!(Err(PatchError::ChildNotFound { segment }) = remove_child(&mut parent, 4));
        check!(segment == "4");
    }

    #[test]
    fn remove_property_from_sequence_fails() {
        let mut parent = doc("[a]");

        let_assert!(Err(PatchError::NotAContainer { actual }) = remove_property(&mut parent, "a"));
        check!(actual == "sequence");
    }
}
