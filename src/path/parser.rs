use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{anychar, char, satisfy},
    combinator::{eof, map, value},
    error::context,
    multi::{many1, separated_list1},
    sequence::preceded,
};
use nom_language::error::VerboseError;

use super::{Segment, Spath};

// spec.containers.0.name - allowed - keys and a sequence index
// "" - allowed - the root path
// metadata.labels.app\.kubernetes\.io/name - allowed - escaped dots stay in the key
// labels.\0 - allowed - escaped digits force a mapping key
// .spec - not allowed - leading '.'
// spec. - not allowed - trailing '.'
// spec..name - not allowed - empty segment
// spec\ - not allowed - dangling escape
pub(crate) fn parse_path(input: &str) -> IResult<&str, Spath, VerboseError<&str>> {
    context(
        "expected a dot-separated path or empty input",
        alt((
            // exactly empty input
            value(Spath::root(), eof),
            |i| {
                let (rest, segments) = separated_list1(char('.'), parse_segment).parse(i)?;
                Ok((rest, Spath { segments }))
            },
        )),
    )
    .parse(input)
}

fn parse_segment(input: &str) -> IResult<&str, Segment, VerboseError<&str>> {
    context(
        "segment",
        map(many1(segment_char), |chars: Vec<(char, bool)>| {
            let escaped = chars.iter().any(|(_, escaped)| *escaped);
            let token: String = chars.into_iter().map(|(c, _)| c).collect();
            if escaped {
                Segment::Key(token)
            } else {
                Segment::from_token(token)
            }
        }),
    )
    .parse(input)
}

/// One decoded char of a segment, flagged when it came from an escape.
fn segment_char(input: &str) -> IResult<&str, (char, bool), VerboseError<&str>> {
    alt((
        map(escaped_char, |c| (c, true)),
        map(satisfy(|c| c != '.' && c != '\\'), |c| (c, false)),
    ))
    .parse(input)
}

fn escaped_char(input: &str) -> IResult<&str, char, VerboseError<&str>> {
    preceded(
        char('\\'),
        context("expected a character after '\\'", anychar),
    )
    .parse(input)
}
