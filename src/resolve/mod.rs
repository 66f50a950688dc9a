use crate::{
    node::{Node, key_position},
    path::{PathError, Segment, Spath},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ResolveError {
    #[error("Invalid path format: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Cannot descend into {actual} at '{path}'")]
    NotAContainer { path: Spath, actual: String },
}

impl ResolveError {
    pub fn not_a_container(path: &Spath, actual: &str) -> Self {
        ResolveError::NotAContainer {
            path: path.clone(),
            actual: actual.to_string(),
        }
    }
}

/// Resolves `path` against `doc` and returns the concrete location of every
/// matching node.
///
/// A missing key or index is not an error, it simply yields no match. Only
/// an attempt to descend into a non-null scalar fails. Numeric segments that
/// hit a mapping are normalized to key segments in the returned location.
pub fn resolve(doc: &Node, path: &Spath) -> Result<Vec<Spath>, ResolveError> {
    let mut location = Spath::root();
    let mut current = doc.as_unwrapped();

    for segment in path {
        let next = match current {
            Node::Mapping(entries) => {
                let name = segment.name();
                key_position(entries, &name).map(|position| {
                    location.push(Segment::Key(name));
                    &entries[position].1
                })
            }
            Node::Sequence(items) => match segment {
                Segment::Index(index) => items.get(*index).inspect(|_| {
                    location.push(Segment::Index(*index));
                }),
                Segment::Key(_) => None,
            },
            Node::Scalar(scalar) if scalar.is_null() => None,
            Node::Scalar(_) => {
                return Err(ResolveError::not_a_container(
                    &location,
                    &current.kind_desc(),
                ));
            }
            Node::Document(_) => unreachable!("documents are unwrapped while walking"),
        };

        match next {
            Some(node) => current = node.as_unwrapped(),
            None => return Ok(Vec::new()),
        }
    }

    Ok(vec![location])
}

/// Resolves the parent path of `path`, the containers a synthesized value
/// would be spliced into.
pub fn get_parents(doc: &Node, path: &Spath) -> Result<Vec<Spath>, ResolveError> {
    resolve(doc, &path.parent_path())
}

/// Resolves a path given as text.
pub fn find_matches(doc: &Node, path: &str) -> Result<Vec<Spath>, ResolveError> {
    let path = Spath::try_from(path)?;
    resolve(doc, &path)
}
