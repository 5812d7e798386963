//! Errors returned by [`MessageBodies`](crate::MessageBodies) and its codecs.
use std::fmt;

/// The error returned when a [`Reader`](crate::Reader) or a [`Writer`](crate::Writer)
/// fails: an opaque wrapper around the concrete error type returned by the codec.
///
/// [`MessageBodies`](crate::MessageBodies) never retries, wraps or inspects
/// codec failures: they are handed back to the caller exactly as the codec
/// produced them. Use [`CodecError::downcast_ref`] to recover the concrete type.
///
/// # Implementation details
///
/// It's a thin shim over `Box<dyn std::error::Error + Send + Sync>`.
#[derive(Debug)]
pub struct CodecError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl CodecError {
    /// Create a new [`CodecError`] from a boxable error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            inner: error.into(),
        }
    }

    /// Convert [`CodecError`] back into the underlying boxed error.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.inner
    }

    /// Return a reference to the underlying boxed error.
    pub fn inner_ref(&self) -> &(dyn std::error::Error + Send + Sync) {
        &*self.inner
    }

    /// Return a reference to the underlying error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.inner)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned when a codec registration is rejected.
///
/// Registration errors signal a misconfigured service: they are returned
/// synchronously, before anything is stored, and they should abort startup.
pub enum ConfigurationError {
    #[error(transparent)]
    /// See [`ParameterizedTypeRegistration`] for details.
    ParameterizedType(#[from] ParameterizedTypeRegistration),
    #[error(transparent)]
    /// See [`NotWriterSelecting`] for details.
    NotWriterSelecting(#[from] NotWriterSelecting),
}

#[derive(Debug, thiserror::Error)]
#[error(
    "Registration of parameterized types is not supported: `{type_name}` has {n_arguments} type argument(s). Register a codec for a concrete type instead"
)]
#[non_exhaustive]
/// A reader or a writer was registered for a payload type that has type arguments.
pub struct ParameterizedTypeRegistration {
    /// The name of the offending payload type.
    pub type_name: &'static str,
    /// How many type arguments the payload type carries.
    pub n_arguments: usize,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "`{annotation}` can't be used to select a writer: its `Annotation::SELECTS_WRITER` constant is set to `false`"
)]
#[non_exhaustive]
/// A writer was bound to an annotation that is not tagged as writer-selecting.
pub struct NotWriterSelecting {
    /// The name of the offending annotation.
    pub annotation: &'static str,
}

#[derive(Debug, thiserror::Error)]
#[error("Expected a value of type `{expected}`, got a value of type `{actual}`")]
#[non_exhaustive]
/// A codec was handed, or produced, a value of a different type than the one it expected.
///
/// It is returned by [`MessageBodies::read`](crate::MessageBodies::read) when the resolved
/// reader produces a value of a different type than the one requested, and by the writers
/// built with [`writer_fn`](crate::writer_fn) when they are handed a value of a foreign type.
pub struct UnexpectedPayload {
    /// The name of the requested payload type.
    pub expected: &'static str,
    /// The name of the payload type that was received or produced.
    pub actual: &'static str,
}
