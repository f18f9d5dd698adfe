//! Segment-level matching logic.
//!
//! # Responsibilities
//! - Represent a single segment of a path pattern (literal or flexible)
//! - Test a flexible locator against one request segment
//!
//! # Design Decisions
//! - Closed set of locator variants, dispatched with `match`
//! - `is_valid` is pure; locators are `Send + Sync` so a shared router
//!   can be queried from many threads at once
//! - Regex locators are compiled once, at construction

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

/// Errors raised while constructing a locator.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// `Digits` needs a length of at least one.
    #[error("digit count must be bigger than 0, got {0}")]
    InvalidDigitCount(usize),

    /// `AnyString` maximum length must be at least one.
    #[error("maximum length must be bigger than 0, got {0}")]
    InvalidMax(usize),

    /// The regular expression did not compile.
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// A predicate supplied by the caller for `Locator::Custom`.
pub type SegmentPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A parametrized matcher standing in place of a literal segment.
#[derive(Clone)]
pub enum Locator {
    /// Any non-empty segment, optionally bounded in length (in characters).
    AnyString { max: Option<usize> },
    /// Exactly `N` ASCII digits.
    Digits(usize),
    /// A segment fully matched by a regular expression.
    Regex(Regex),
    /// A named, caller-supplied predicate.
    Custom {
        name: String,
        predicate: SegmentPredicate,
    },
}

impl Locator {
    /// Accepts any non-empty segment.
    pub fn any() -> Self {
        Locator::AnyString { max: None }
    }

    /// Accepts non-empty segments of at most `max` characters.
    pub fn string_max(max: usize) -> Result<Self, LocatorError> {
        if max == 0 {
            return Err(LocatorError::InvalidMax(max));
        }
        Ok(Locator::AnyString { max: Some(max) })
    }

    /// Accepts segments made of exactly `count` ASCII digits.
    pub fn digits(count: usize) -> Result<Self, LocatorError> {
        if count == 0 {
            return Err(LocatorError::InvalidDigitCount(count));
        }
        Ok(Locator::Digits(count))
    }

    /// Accepts segments matched in full by `expr`.
    ///
    /// The expression is anchored on both ends, so `[a-z]+` does not accept
    /// `abc1`.
    pub fn regex(expr: &str) -> Result<Self, LocatorError> {
        let anchored = format!("^(?:{})$", expr);
        Ok(Locator::Regex(Regex::new(&anchored)?))
    }

    /// Wraps a caller-supplied predicate.
    pub fn custom<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Locator::Custom {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Returns true if `segment` is accepted by this locator.
    pub fn is_valid(&self, segment: &str) -> bool {
        match self {
            Locator::AnyString { max } => {
                if segment.is_empty() {
                    return false;
                }
                match max {
                    Some(max) => segment.chars().count() <= *max,
                    None => true,
                }
            }
            Locator::Digits(count) => {
                segment.len() == *count && segment.bytes().all(|b| b.is_ascii_digit())
            }
            Locator::Regex(re) => re.is_match(segment),
            Locator::Custom { predicate, .. } => predicate(segment),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::AnyString { max: None } => write!(f, "{{str}}"),
            Locator::AnyString { max: Some(max) } => write!(f, "{{str:{}}}", max),
            Locator::Digits(count) => write!(f, "{{digits:{}}}", count),
            Locator::Regex(re) => {
                // Strip the anchors added by `Locator::regex`.
                let raw = re.as_str();
                let inner = raw
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(raw);
                write!(f, "{{re:{}}}", inner)
            }
            Locator::Custom { name, .. } => write!(f, "{{{}}}", name),
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({})", self)
    }
}

/// One component of a path pattern.
#[derive(Clone, Debug)]
pub enum Segment {
    /// Matches only the exact string.
    Literal(String),
    /// Matches any segment its locator accepts.
    Flexible(Locator),
}

impl Segment {
    pub fn literal(value: impl Into<String>) -> Self {
        Segment::Literal(value.into())
    }

    pub fn is_flexible(&self) -> bool {
        matches!(self, Segment::Flexible(_))
    }

    /// Returns true if a request segment matches this pattern segment.
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == segment,
            Segment::Flexible(loc) => loc.is_valid(segment),
        }
    }

    /// Returns true if some request segment could match both sides.
    ///
    /// Two literals overlap only when equal. A flexible locator is presumed
    /// to overlap with anything at the same position.
    pub fn overlaps(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            _ => true,
        }
    }
}

impl From<Locator> for Segment {
    fn from(loc: Locator) -> Self {
        Segment::Flexible(loc)
    }
}

impl From<&str> for Segment {
    fn from(lit: &str) -> Self {
        Segment::Literal(lit.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => f.write_str(lit),
            Segment::Flexible(loc) => write!(f, "{}", loc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_string() {
        let loc = Locator::any();
        assert!(loc.is_valid("hoge"));
        assert!(loc.is_valid("日本"));
        assert!(!loc.is_valid(""));
    }

    #[test]
    fn test_string_max() {
        let loc = Locator::string_max(4).unwrap();
        assert!(loc.is_valid("abcd"));
        assert!(!loc.is_valid("abcde"));
        assert!(!loc.is_valid(""));

        assert!(matches!(
            Locator::string_max(0),
            Err(LocatorError::InvalidMax(0))
        ));
    }

    #[test]
    fn test_digits() {
        let loc = Locator::digits(4).unwrap();
        assert!(loc.is_valid("2024"));
        assert!(loc.is_valid("0000"));
        assert!(!loc.is_valid("202"));
        assert!(!loc.is_valid("20245"));
        assert!(!loc.is_valid("20a4"));
        assert!(!loc.is_valid("+123"));
        assert!(!loc.is_valid("-123"));
        // Full-width digits are not ASCII
        assert!(!loc.is_valid("１２３４"));

        assert!(matches!(
            Locator::digits(0),
            Err(LocatorError::InvalidDigitCount(0))
        ));
    }

    #[test]
    fn test_regex_is_anchored() {
        let loc = Locator::regex("[a-z]+").unwrap();
        assert!(loc.is_valid("abc"));
        assert!(!loc.is_valid("abc1"));
        assert!(!loc.is_valid("1abc"));
        assert_eq!(loc.to_string(), "{re:[a-z]+}");

        assert!(Locator::regex("(").is_err());
    }

    #[test]
    fn test_custom() {
        let loc = Locator::custom("even", |s: &str| s.len() % 2 == 0);
        assert!(loc.is_valid("ab"));
        assert!(!loc.is_valid("abc"));
        assert_eq!(loc.to_string(), "{even}");
    }

    #[test]
    fn test_segment_overlap() {
        let a = Segment::literal("users");
        let b = Segment::literal("items");
        let flex = Segment::from(Locator::digits(4).unwrap());

        assert!(a.overlaps(&a.clone()));
        assert!(!a.overlaps(&b));
        // Conservative: a locator always overlaps, even if it would reject the literal
        assert!(a.overlaps(&flex));
        assert!(flex.overlaps(&a));
        assert!(flex.overlaps(&Segment::from(Locator::any())));
    }
}
