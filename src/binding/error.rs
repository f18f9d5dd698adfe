//! Validation failures.
//!
//! A failure carries its leaf cause and the field path where it happened.
//! Failures raised inside nested objects or list elements are re-tagged on
//! the way up by prepending the outer field, so the caller sees a single
//! failure with a path such as `accounts[1].age`.

use std::fmt;

use serde_json::Value;

/// Runtime kind of a decoded value, used for expected/actual reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a decoded value.
    ///
    /// Any number written without a fraction or exponent is an integer,
    /// including those outside the `i64` range.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Int,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a failure inside the input, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// The four failure kinds a caller can map to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Raw bytes did not decode, or the root was not an object.
    MalformedInput,
    /// A required field was absent.
    MissingField,
    /// A present field had the wrong kind (including null).
    TypeMismatch,
    /// A failure inside a nested object or list element.
    Nested,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MalformedInput => "malformed_input",
            FailureKind::MissingField => "missing_field",
            FailureKind::TypeMismatch => "type_mismatch",
            FailureKind::Nested => "nested_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cause {
    Malformed { reason: String },
    Missing,
    Mismatch { expected: ValueKind, actual: ValueKind },
    OutOfRange,
}

/// Why a payload could not be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    cause: Cause,
    path: FieldPath,
}

impl ValidationFailure {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            cause: Cause::Malformed {
                reason: reason.into(),
            },
            path: FieldPath::default(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            cause: Cause::Missing,
            path: FieldPath(vec![PathSegment::Field(field.into())]),
        }
    }

    pub fn mismatch(field: impl Into<String>, expected: ValueKind, actual: ValueKind) -> Self {
        Self::mismatch_at(PathSegment::Field(field.into()), expected, actual)
    }

    /// A type mismatch at a field or list position.
    pub fn mismatch_at(at: PathSegment, expected: ValueKind, actual: ValueKind) -> Self {
        Self {
            cause: Cause::Mismatch { expected, actual },
            path: FieldPath(vec![at]),
        }
    }

    /// An integer that does not fit in `i64`.
    pub fn out_of_range(field: impl Into<String>) -> Self {
        Self {
            cause: Cause::OutOfRange,
            path: FieldPath(vec![PathSegment::Field(field.into())]),
        }
    }

    /// Re-surface this failure under an outer field or list index.
    pub fn nest(mut self, outer: PathSegment) -> Self {
        self.path.0.insert(0, outer);
        self
    }

    /// The reported kind. Anything below the top-level fields is `Nested`.
    pub fn kind(&self) -> FailureKind {
        match self.cause {
            Cause::Malformed { .. } => FailureKind::MalformedInput,
            _ if self.path.len() > 1 => FailureKind::Nested,
            _ => self.cause(),
        }
    }

    /// The kind of the innermost failure, never `Nested`.
    pub fn cause(&self) -> FailureKind {
        match self.cause {
            Cause::Malformed { .. } => FailureKind::MalformedInput,
            Cause::Missing => FailureKind::MissingField,
            Cause::Mismatch { .. } | Cause::OutOfRange => FailureKind::TypeMismatch,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The dotted field path, or `None` for malformed input.
    pub fn field(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.to_string())
        }
    }

    /// Expected kind, for type mismatches.
    pub fn expected(&self) -> Option<ValueKind> {
        match self.cause {
            Cause::Mismatch { expected, .. } => Some(expected),
            Cause::OutOfRange => Some(ValueKind::Int),
            _ => None,
        }
    }

    /// Actual kind, for type mismatches.
    pub fn actual(&self) -> Option<ValueKind> {
        match self.cause {
            Cause::Mismatch { actual, .. } => Some(actual),
            Cause::OutOfRange => Some(ValueKind::Int),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Cause::Malformed { reason } => write!(f, "malformed input: {}", reason),
            Cause::Missing => write!(f, "missing field `{}`", self.path),
            Cause::Mismatch { expected, actual } => write!(
                f,
                "type mismatch at `{}`: expected {}, found {}",
                self.path, expected, actual
            ),
            Cause::OutOfRange => write!(f, "integer out of range at `{}`", self.path),
        }
    }
}

impl std::error::Error for ValidationFailure {}
