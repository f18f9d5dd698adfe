//! Typed request payloads.
//!
//! [`ApiData`] ties a caller-defined struct to its descriptor. A
//! [`TypedBinder`] compiles that descriptor once and then turns raw bodies
//! straight into the struct: the engine validates, serde fills the fields.
//! [`RawData`] is the format-less counterpart that accepts any bytes.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::binding::descriptor::{SchemaDescriptor, SchemaError};
use crate::binding::engine::{BindOptions, Binder};
use crate::binding::error::ValidationFailure;

/// Media type of JSON payloads.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Media type of format-less payloads.
pub const MEDIA_TYPE_PLAIN: &str = "text/plain";

/// A payload type with a declared schema.
///
/// ```
/// use culm::binding::{ApiData, ScalarType, SchemaDescriptor, SchemaError, TypedBinder};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     name: String,
///     age: Option<i64>,
/// }
///
/// impl ApiData for User {
///     fn schema() -> Result<SchemaDescriptor, SchemaError> {
///         SchemaDescriptor::builder("User")
///             .scalar("name", ScalarType::String)
///             .optional("age", ScalarType::Int)
///             .build()
///     }
/// }
///
/// let binder = TypedBinder::<User>::new().unwrap();
/// let user = binder.bind(br#"{"name": "hoge"}"#).unwrap();
/// assert_eq!(user.name, "hoge");
/// assert!(user.age.is_none());
/// ```
pub trait ApiData: DeserializeOwned {
    /// Media type the payload is exchanged as.
    const MEDIA_TYPE: &'static str = MEDIA_TYPE_JSON;

    /// Build the descriptor for this type.
    fn schema() -> Result<SchemaDescriptor, SchemaError>;
}

/// Errors from typed binding.
#[derive(Debug, Error)]
pub enum BindError {
    /// The payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The payload validated but does not deserialize into the target type.
    /// This points at a descriptor that disagrees with its struct.
    #[error("bound object does not fit the target type: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Binds raw payloads into `T` using a descriptor compiled once.
pub struct TypedBinder<T> {
    desc: Arc<SchemaDescriptor>,
    binder: Binder,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ApiData> TypedBinder<T> {
    pub fn new() -> Result<Self, SchemaError> {
        Self::with_options(BindOptions::default())
    }

    pub fn with_options(options: BindOptions) -> Result<Self, SchemaError> {
        Ok(Self {
            desc: Arc::new(T::schema()?),
            binder: Binder::new(options),
            _marker: PhantomData,
        })
    }

    pub fn descriptor(&self) -> &Arc<SchemaDescriptor> {
        &self.desc
    }

    pub fn bind(&self, raw: &[u8]) -> Result<T, BindError> {
        let bound = self.binder.bind(raw, &self.desc)?;
        Ok(bound.deserialize()?)
    }
}

impl<T> Clone for TypedBinder<T> {
    fn clone(&self) -> Self {
        Self {
            desc: self.desc.clone(),
            binder: self.binder,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TypedBinder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedBinder")
            .field("schema", &self.desc.name())
            .field("options", &self.binder.options())
            .finish()
    }
}

/// A payload with no format; any bytes are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawData(Vec<u8>);

impl RawData {
    pub const MEDIA_TYPE: &'static str = MEDIA_TYPE_PLAIN;

    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for RawData {
    fn from(raw: &[u8]) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::descriptor::ScalarType;
    use crate::binding::error::FailureKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Inner {
        name: String,
        age: i64,
    }

    impl ApiData for Inner {
        fn schema() -> Result<SchemaDescriptor, SchemaError> {
            SchemaDescriptor::builder("Inner")
                .scalar("name", ScalarType::String)
                .scalar("age", ScalarType::Int)
                .build()
        }
    }

    #[derive(Debug, Deserialize)]
    struct Outer {
        accounts: Vec<Inner>,
        datetime: String,
    }

    impl ApiData for Outer {
        fn schema() -> Result<SchemaDescriptor, SchemaError> {
            SchemaDescriptor::builder("Outer")
                .list_of("accounts", Arc::new(Inner::schema()?))
                .scalar("datetime", ScalarType::String)
                .build()
        }
    }

    /// Descriptor says string, struct says integer.
    #[derive(Debug, Deserialize)]
    struct Mismatched {
        #[allow(dead_code)]
        id: u32,
    }

    impl ApiData for Mismatched {
        fn schema() -> Result<SchemaDescriptor, SchemaError> {
            SchemaDescriptor::builder("Mismatched")
                .scalar("id", ScalarType::String)
                .build()
        }
    }

    #[test]
    fn test_typed_bind() {
        let binder = TypedBinder::<Outer>::new().unwrap();
        let outer = binder
            .bind(br#"{"accounts": [{"name": "a", "age": 1}, {"name": "b", "age": 2}], "datetime": "2000.01.01-00:00:00"}"#)
            .unwrap();

        assert_eq!(outer.accounts.len(), 2);
        assert_eq!(outer.accounts[0].name, "a");
        assert_eq!(outer.accounts[1].age, 2);
        assert_eq!(outer.datetime, "2000.01.01-00:00:00");
        assert_eq!(Outer::MEDIA_TYPE, "application/json");
    }

    #[test]
    fn test_typed_bind_failure() {
        let binder = TypedBinder::<Outer>::new().unwrap();
        let err = binder.bind(br#"{"accounts": [{"name": "a"}]}"#).unwrap_err();
        match err {
            BindError::Validation(failure) => {
                assert_eq!(failure.kind(), FailureKind::Nested);
                assert_eq!(failure.field().as_deref(), Some("accounts[0].age"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_shape_error() {
        let binder = TypedBinder::<Mismatched>::new().unwrap();
        let err = binder.bind(br#"{"id": "abc"}"#).unwrap_err();
        assert!(matches!(err, BindError::Shape(_)));
    }

    #[test]
    fn test_raw_data() {
        let raw = RawData::from(&b"\x00\xffanything"[..]);
        assert_eq!(raw.as_bytes(), b"\x00\xffanything");
        assert_eq!(RawData::MEDIA_TYPE, "text/plain");
    }
}
