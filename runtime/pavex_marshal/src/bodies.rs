use std::fmt;
use std::sync::Arc;

use tracing::Span;

use crate::cache::{Resolution, ResolutionCache};
use crate::codec::{Reader, Writer, WrittenBody};
use crate::config::JsonCodecConfig;
use crate::error::{CodecError, ConfigurationError, UnexpectedPayload};
use crate::json::JsonCodec;
use crate::payload::{Annotation, AnnotationMarker, DynPayload, Payload, PayloadType};
use crate::registry::CodecRegistry;
use crate::request::{BufferedBody, RequestHead};

#[derive(Clone)]
/// The codecs used by [`MessageBodies`] when no registered codec matches.
pub struct DefaultCodecs {
    /// The fallback reader.
    pub reader: Arc<dyn Reader>,
    /// The fallback writer.
    pub writer: Arc<dyn Writer>,
}

impl DefaultCodecs {
    /// Use a [`JsonCodec`] as both the default reader and the default writer.
    pub fn json(config: JsonCodecConfig) -> Self {
        let codec = Arc::new(JsonCodec::new(config));
        Self {
            reader: codec.clone(),
            writer: codec,
        }
    }
}

impl fmt::Debug for DefaultCodecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCodecs").finish_non_exhaustive()
    }
}

/// Pick the right [`Reader`] or [`Writer`] for a message body, based on its type.
///
/// # Resolution
///
/// Readers are resolved against the type that the caller asked for:
///
/// 1. the reader registered for exactly that type, if any;
/// 2. otherwise, unless the type is [parameterized](PayloadType::is_parameterized),
///    the first reader, in registration order, registered for a type that the requested
///    type [is assignable to](PayloadType::is_assignable_to);
/// 3. otherwise, the default reader.
///
/// Writers are resolved against the runtime type of the value being written:
///
/// 1. the writer registered for exactly that type, if any;
/// 2. otherwise, the writer bound to the first [annotation](Annotation) of the type,
///    in declaration order, that has a writer bound to it;
/// 3. otherwise, the default writer.
///
/// # Caching
///
/// The outcome of a resolution is computed once per type and then reused for the
/// lifetime of the [`MessageBodies`] instance. That includes falling back to the
/// default codec: registering a matching codec after a type has been resolved does not
/// change the outcome for that type. Register all codecs before serving requests.
///
/// # Example
///
/// ```rust
/// use pavex_marshal::{BufferedBody, MessageBodies, RequestHead, config::JsonCodecConfig};
/// use pavex_marshal::http::{Request, StatusCode, header::CONTENT_TYPE};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bodies = MessageBodies::json(JsonCodecConfig::default());
///
/// let (parts, _) = Request::post("/greet")
///     .header(CONTENT_TYPE, "application/json")
///     .body(())?
///     .into_parts();
/// let head = RequestHead::from(parts);
/// let name: String = bodies.read(&head, &BufferedBody::new(r#""Ursula""#))?;
///
/// let response = bodies
///     .write(&format!("Hello, {name}!"), Some(&head))?
///     .into_response(StatusCode::OK);
/// assert_eq!(response.body().as_ref(), br#""Hello, Ursula!""#);
/// # Ok(())
/// # }
/// ```
pub struct MessageBodies {
    registry: CodecRegistry,
    defaults: DefaultCodecs,
    cache: ResolutionCache,
}

impl MessageBodies {
    /// Create a new [`MessageBodies`] with no registered codecs.
    pub fn new(defaults: DefaultCodecs) -> Self {
        Self {
            registry: CodecRegistry::new(),
            defaults,
            cache: ResolutionCache::new(),
        }
    }

    /// Create a new [`MessageBodies`] that falls back to [`JsonCodec`].
    pub fn json(config: JsonCodecConfig) -> Self {
        Self::new(DefaultCodecs::json(config))
    }

    /// Register `reader` for `payload_type` and, unless a more specific reader
    /// is registered, for every type that extends it.
    ///
    /// Registering a reader for a type that already has one replaces it.
    ///
    /// # Errors
    ///
    /// It fails if `payload_type` is [parameterized](PayloadType::is_parameterized).
    pub fn register_reader(
        &mut self,
        payload_type: PayloadType,
        reader: Arc<dyn Reader>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.registry.register_reader(payload_type, reader)?;
        Ok(self)
    }

    /// Register `reader` for `T`.
    ///
    /// See [`MessageBodies::register_reader`] for details.
    pub fn register_reader_for<T>(
        &mut self,
        reader: Arc<dyn Reader>,
    ) -> Result<&mut Self, ConfigurationError>
    where
        T: Payload,
    {
        self.register_reader(T::payload_type(), reader)
    }

    /// Register `writer` for values whose runtime type is exactly `payload_type`.
    ///
    /// Registering a writer for a type that already has one replaces it.
    ///
    /// # Errors
    ///
    /// It fails if `payload_type` is [parameterized](PayloadType::is_parameterized).
    pub fn register_writer(
        &mut self,
        payload_type: PayloadType,
        writer: Arc<dyn Writer>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.registry.register_writer(payload_type, writer)?;
        Ok(self)
    }

    /// Register `writer` for `T`.
    ///
    /// See [`MessageBodies::register_writer`] for details.
    pub fn register_writer_for<T>(
        &mut self,
        writer: Arc<dyn Writer>,
    ) -> Result<&mut Self, ConfigurationError>
    where
        T: Payload,
    {
        self.register_writer(T::payload_type(), writer)
    }

    /// Register `writer` for every type that carries the annotation described by `marker`
    /// and has no writer registered for it specifically.
    ///
    /// # Errors
    ///
    /// It fails if the annotation's [`Annotation::SELECTS_WRITER`] constant is `false`.
    pub fn register_annotation_writer(
        &mut self,
        marker: AnnotationMarker,
        writer: Arc<dyn Writer>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.registry.register_annotation_writer(marker, writer)?;
        Ok(self)
    }

    /// Register `writer` for every type annotated with `A`.
    ///
    /// See [`MessageBodies::register_annotation_writer`] for details.
    pub fn register_annotation_writer_for<A>(
        &mut self,
        writer: Arc<dyn Writer>,
    ) -> Result<&mut Self, ConfigurationError>
    where
        A: Annotation,
    {
        self.register_annotation_writer(AnnotationMarker::of::<A>(), writer)
    }

    /// The codecs registered so far.
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// The codecs used when nothing else matches.
    pub fn defaults(&self) -> &DefaultCodecs {
        &self.defaults
    }

    /// The reader to be used for request bodies of type `requested`.
    ///
    /// The search runs against the canonical descriptor of `requested`: supertypes
    /// are the ones declared by [`Payload::payload_type`](crate::Payload::payload_type).
    pub fn resolve_reader(&self, requested: &PayloadType) -> Arc<dyn Reader> {
        let resolution = match self.cache.reader(requested.id()) {
            Some(resolution) => resolution,
            None => self
                .cache
                .insert_reader(requested.id(), self.find_reader(&requested.canonical())),
        };
        match resolution {
            Resolution::Registered(reader) => reader,
            Resolution::Fallback => Arc::clone(&self.defaults.reader),
        }
    }

    /// The writer to be used for `value`, based on its runtime type.
    pub fn resolve_writer(&self, value: &dyn DynPayload) -> Arc<dyn Writer> {
        let runtime_id = value.concrete_type_id();
        let resolution = match self.cache.writer(runtime_id) {
            Some(resolution) => resolution,
            None => self
                .cache
                .insert_writer(runtime_id, self.find_writer(&value.runtime_type())),
        };
        match resolution {
            Resolution::Registered(writer) => writer,
            Resolution::Fallback => Arc::clone(&self.defaults.writer),
        }
    }

    /// Parse `body` into a value of type `requested`, using the
    /// [resolved reader](MessageBodies::resolve_reader).
    ///
    /// Reader failures are returned as they are.
    pub fn read_as(
        &self,
        requested: &PayloadType,
        head: &RequestHead,
        body: &BufferedBody,
    ) -> Result<Box<dyn DynPayload>, CodecError> {
        self.resolve_reader(requested).read(requested, head, body)
    }

    /// Parse `body` into a value of type `T`.
    ///
    /// # Errors
    ///
    /// On top of the reader's own failures, it returns an [`UnexpectedPayload`] error
    /// if the reader produced a value of a type other than `T`.
    pub fn read<T>(&self, head: &RequestHead, body: &BufferedBody) -> Result<T, CodecError>
    where
        T: Payload,
    {
        let requested = T::payload_type();
        let value = self.read_as(&requested, head, body)?;
        let actual = value.runtime_type();
        match value.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(CodecError::new(UnexpectedPayload {
                expected: requested.name(),
                actual: actual.name(),
            })),
        }
    }

    /// Serialize `value`, using the [resolved writer](MessageBodies::resolve_writer).
    ///
    /// Writer failures are returned as they are.
    pub fn write(
        &self,
        value: &dyn DynPayload,
        request: Option<&RequestHead>,
    ) -> Result<WrittenBody, CodecError> {
        self.resolve_writer(value).write(value, request)
    }

    #[tracing::instrument(
        name = "resolve_reader",
        level = "trace",
        skip_all,
        fields(payload.name = requested.name(), resolution.outcome = tracing::field::Empty)
    )]
    fn find_reader(&self, requested: &PayloadType) -> Resolution<dyn Reader> {
        let span = Span::current();
        if let Some(reader) = self.registry.reader(requested) {
            span.record("resolution.outcome", "registered");
            return Resolution::Registered(Arc::clone(reader));
        }
        if !requested.is_parameterized()
            && let Some((supertype, reader)) = self.registry.assignable_reader(requested)
        {
            span.record("resolution.outcome", "supertype");
            tracing::trace!(
                payload.supertype = supertype.name(),
                "Using the reader registered for a supertype"
            );
            return Resolution::Registered(Arc::clone(reader));
        }
        span.record("resolution.outcome", "default");
        Resolution::Fallback
    }

    #[tracing::instrument(
        name = "resolve_writer",
        level = "trace",
        skip_all,
        fields(payload.name = runtime_type.name(), resolution.outcome = tracing::field::Empty)
    )]
    fn find_writer(&self, runtime_type: &PayloadType) -> Resolution<dyn Writer> {
        let span = Span::current();
        if let Some(writer) = self.registry.writer(runtime_type) {
            span.record("resolution.outcome", "registered");
            return Resolution::Registered(Arc::clone(writer));
        }
        if let Some((marker, writer)) = self.registry.annotation_writer(runtime_type) {
            span.record("resolution.outcome", "annotation");
            tracing::trace!(
                payload.annotation = marker.name(),
                "Using the writer bound to an annotation"
            );
            return Resolution::Registered(Arc::clone(writer));
        }
        span.record("resolution.outcome", "default");
        Resolution::Fallback
    }
}

impl fmt::Debug for MessageBodies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBodies")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
