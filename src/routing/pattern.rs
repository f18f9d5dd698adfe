//! Path patterns and their textual form.
//!
//! A pattern is written as `/users/{digits:4}/{str}`. Segments in braces
//! are flexible locators:
//!
//! | Text          | Locator                          |
//! |---------------|----------------------------------|
//! | `{str}`       | any non-empty segment            |
//! | `{str:16}`    | non-empty, at most 16 characters |
//! | `{digits:4}`  | exactly 4 ASCII digits           |
//! | `{re:[a-z]+}` | full regex match                 |
//!
//! Everything else is a literal. Patterns and request paths are split the
//! same way, so `/` is a single empty literal segment.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::routing::location::{Locator, LocatorError, Segment};

/// Errors raised while parsing a textual pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A segment opened a brace without closing it (or the reverse).
    #[error("unbalanced braces in segment `{0}`")]
    Unbalanced(String),

    /// The locator name inside braces is not known.
    #[error("unknown locator `{0}`")]
    UnknownLocator(String),

    /// The locator argument could not be parsed.
    #[error("invalid argument `{arg}` for locator `{locator}`")]
    InvalidArgument { locator: String, arg: String },

    /// The locator rejected its argument.
    #[error(transparent)]
    Locator(#[from] LocatorError),
}

/// Split a request path into segments.
///
/// The leading separator is not a segment: `/a/b` gives `["a", "b"]` and
/// `/` gives `[""]`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// An ordered sequence of literal and flexible segments.
#[derive(Clone, Debug)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Create a pattern from segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse the textual form, e.g. `/users/{digits:4}`.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let segments = split_path(text)
            .into_iter()
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if any segment is a flexible locator.
    pub fn is_flexible(&self) -> bool {
        self.segments.iter().any(Segment::is_flexible)
    }

    /// The exact-match key for a pattern made only of literals.
    pub fn literal_key(&self) -> Option<Vec<String>> {
        self.segments
            .iter()
            .map(|seg| match seg {
                Segment::Literal(lit) => Some(lit.clone()),
                Segment::Flexible(_) => None,
            })
            .collect()
    }

    /// Returns true if some concrete path could match both patterns.
    ///
    /// Patterns of different lengths never collide. Otherwise every
    /// position has to overlap (see [`Segment::overlaps`]).
    pub fn is_ambiguous(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a.overlaps(b))
    }

    /// Returns true if the request segments match position by position.
    pub fn matches(&self, request: &[&str]) -> bool {
        self.segments.len() == request.len()
            && self
                .segments
                .iter()
                .zip(request.iter())
                .all(|(seg, value)| seg.matches(value))
    }

    /// A copy of this pattern with `prefix` prepended as a literal segment.
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(Segment::Literal(prefix.into()));
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            write!(f, "/{}", seg)?;
        }
        Ok(())
    }
}

fn parse_segment(raw: &str) -> Result<Segment, PatternError> {
    let inner = match (raw.starts_with('{'), raw.ends_with('}')) {
        (false, false) => return Ok(Segment::literal(raw)),
        (true, true) if raw.len() >= 2 => &raw[1..raw.len() - 1],
        _ => return Err(PatternError::Unbalanced(raw.to_string())),
    };

    let (name, arg) = match inner.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (inner, None),
    };

    let locator = match (name, arg) {
        ("str", None) => Locator::any(),
        ("str", Some(arg)) => Locator::string_max(parse_count(name, arg)?)?,
        ("digits", Some(arg)) => Locator::digits(parse_count(name, arg)?)?,
        ("re", Some(arg)) => Locator::regex(arg)?,
        ("digits", None) | ("re", None) => {
            return Err(PatternError::InvalidArgument {
                locator: name.to_string(),
                arg: String::new(),
            })
        }
        _ => return Err(PatternError::UnknownLocator(name.to_string())),
    };
    Ok(Segment::Flexible(locator))
}

fn parse_count(locator: &str, arg: &str) -> Result<usize, PatternError> {
    arg.parse().map_err(|_| PatternError::InvalidArgument {
        locator: locator.to_string(),
        arg: arg.to_string(),
    })
}
