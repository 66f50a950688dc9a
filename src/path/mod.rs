mod error;
mod parser;

use std::{fmt, str::FromStr};

pub use error::PathError;
use error::{convert_verbose_error, trailing_input_error};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Represents a key in a mapping.
    Key(String),

    /// Represents an index in a sequence.
    Index(usize),
}

impl Segment {
    /// Classifies a raw token: a non-negative integer in canonical form
    /// addresses a sequence element, everything else a mapping key.
    ///
    /// Tokens such as `0644`, `+1` or `-1` stay keys so their text survives
    /// mapping lookup, synthesis and display.
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        match canonical_index(&token) {
            Some(index) => Segment::Index(index),
            None => Segment::Key(token),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    /// The textual form of the segment, as it appears as a mapping key.
    pub fn name(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(index) => write!(f, "{index}"),
            Segment::Key(key) => {
                // keys that look like an index need an escape to read back as keys
                if canonical_index(key).is_some() {
                    f.write_str("\\")?;
                }
                for c in key.chars() {
                    if c == '.' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

fn canonical_index(token: &str) -> Option<usize> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = token.parse::<usize>().ok()?;
    (index.to_string() == token).then_some(index)
}

/// A parsed path such as `spec.template.containers.0.name`.
///
/// The same type doubles as a concrete location inside a tree: the resolver
/// returns the `Spath` of every node it matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Spath {
    segments: Vec<Segment>,
}

impl Spath {
    pub fn root() -> Self {
        Spath::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Spath { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Everything but the last segment. The parent of the root is the root.
    pub fn parent_path(&self) -> Spath {
        let mut segments = self.segments.clone();
        segments.pop();
        Spath { segments }
    }

    /// The last segment rendered as a mapping key, `None` for the root.
    pub fn child_name(&self) -> Option<String> {
        self.last_segment().map(Segment::name)
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// A new path with `other` appended to `self`.
    pub fn join(&self, other: &Spath) -> Spath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Spath { segments }
    }

    pub fn child(&self, segment: Segment) -> Spath {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl<'a> IntoIterator for &'a Spath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for Spath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for Spath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (rest, spath) = parser::parse_path(value).map_err(|err| match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => convert_verbose_error(value, e),
            nom::Err::Incomplete(_) => PathError::invalid_syntax(value.len(), "incomplete path"),
        })?;

        if !rest.is_empty() {
            return Err(trailing_input_error(value, rest));
        }

        Ok(spath)
    }
}

impl TryFrom<String> for Spath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Spath::try_from(value.as_str())
    }
}

impl FromStr for Spath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Spath::try_from(s)
    }
}

impl From<Spath> for String {
    fn from(value: Spath) -> Self {
        value.to_string()
    }
}
