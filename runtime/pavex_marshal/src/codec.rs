//! The capabilities that [`MessageBodies`](crate::MessageBodies) resolves: [`Reader`]s and [`Writer`]s.
use std::marker::PhantomData;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::error::{CodecError, UnexpectedPayload};
use crate::payload::{DynPayload, Payload, PayloadType};
use crate::request::{BufferedBody, RequestHead};

/// Parse the body of an incoming request into a value of the requested type.
///
/// A reader may be registered for a specific type, in which case it is also used
/// for the types that [extend](PayloadType::extends) it, or act as the default reader.
/// In both cases it is handed the type that the caller actually asked for.
pub trait Reader: Send + Sync + 'static {
    /// Parse `body` into a value of type `requested`.
    ///
    /// Failures are returned to the caller of
    /// [`MessageBodies::read`](crate::MessageBodies::read) unchanged.
    fn read(
        &self,
        requested: &PayloadType,
        head: &RequestHead,
        body: &BufferedBody,
    ) -> Result<Box<dyn DynPayload>, CodecError>;
}

/// Serialize a value into the body of an outgoing response.
pub trait Writer: Send + Sync + 'static {
    /// Serialize `value`.
    ///
    /// `request` is the request that the response is being built for, if the
    /// caller has one at hand.
    fn write(
        &self,
        value: &dyn DynPayload,
        request: Option<&RequestHead>,
    ) -> Result<WrittenBody, CodecError>;
}

#[derive(Debug, Clone)]
/// The output of a [`Writer`]: the body bytes, their `Content-Type` and
/// any additional headers that should be attached to the response.
pub struct WrittenBody {
    /// The serialized body.
    pub body: Bytes,
    /// The value of the `Content-Type` header.
    pub content_type: HeaderValue,
    /// Additional response headers.
    pub headers: HeaderMap,
}

impl WrittenBody {
    /// Create a new [`WrittenBody`] with no additional headers.
    pub fn new<B>(body: B, content_type: HeaderValue) -> Self
    where
        B: Into<Bytes>,
    {
        Self {
            body: body.into(),
            content_type,
            headers: HeaderMap::new(),
        }
    }

    /// Append an additional header.
    pub fn append_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Assemble an HTTP response with the given status code.
    ///
    /// The additional headers are copied over first, then `Content-Type` is set:
    /// a `Content-Type` entry in [`WrittenBody::headers`] is overwritten.
    pub fn into_response(self, status: StatusCode) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = status;
        let headers = response.headers_mut();
        headers.extend(self.headers);
        headers.insert(CONTENT_TYPE, self.content_type);
        response
    }
}

/// Build a [`Reader`] out of a closure.
///
/// # Example
///
/// ```rust
/// use pavex_marshal::{DynPayload, reader_fn};
///
/// let reader = reader_fn(|_requested, _head, body| {
///     let text = String::from_utf8_lossy(&body.bytes).into_owned();
///     Ok(Box::new(text) as Box<dyn DynPayload>)
/// });
/// ```
pub fn reader_fn<F>(f: F) -> ReaderFn<F>
where
    F: Fn(&PayloadType, &RequestHead, &BufferedBody) -> Result<Box<dyn DynPayload>, CodecError>
        + Send
        + Sync
        + 'static,
{
    ReaderFn(f)
}

/// A [`Reader`] backed by a closure. Built by [`reader_fn`].
pub struct ReaderFn<F>(F);

impl<F> Reader for ReaderFn<F>
where
    F: Fn(&PayloadType, &RequestHead, &BufferedBody) -> Result<Box<dyn DynPayload>, CodecError>
        + Send
        + Sync
        + 'static,
{
    fn read(
        &self,
        requested: &PayloadType,
        head: &RequestHead,
        body: &BufferedBody,
    ) -> Result<Box<dyn DynPayload>, CodecError> {
        (self.0)(requested, head, body)
    }
}

/// Build a [`Writer`] for values of type `T` out of a closure.
///
/// The returned writer fails with [`UnexpectedPayload`] if it is handed a value
/// of a different type, e.g. because it was bound to an annotation carried by
/// several types.
///
/// # Example
///
/// ```rust
/// use pavex_marshal::{WrittenBody, writer_fn};
/// use pavex_marshal::http::HeaderValue;
///
/// let writer = writer_fn(|text: &String, _request| {
///     Ok(WrittenBody::new(
///         text.clone(),
///         HeaderValue::from_static("text/plain; charset=utf-8"),
///     ))
/// });
/// ```
pub fn writer_fn<T, F>(f: F) -> WriterFn<T, F>
where
    T: Payload,
    F: Fn(&T, Option<&RequestHead>) -> Result<WrittenBody, CodecError> + Send + Sync + 'static,
{
    WriterFn {
        f,
        _marker: PhantomData,
    }
}

/// A [`Writer`] backed by a closure. Built by [`writer_fn`].
pub struct WriterFn<T, F> {
    f: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> Writer for WriterFn<T, F>
where
    T: Payload,
    F: Fn(&T, Option<&RequestHead>) -> Result<WrittenBody, CodecError> + Send + Sync + 'static,
{
    fn write(
        &self,
        value: &dyn DynPayload,
        request: Option<&RequestHead>,
    ) -> Result<WrittenBody, CodecError> {
        let Some(typed) = value.as_any().downcast_ref::<T>() else {
            return Err(CodecError::new(UnexpectedPayload {
                expected: std::any::type_name::<T>(),
                actual: value.runtime_type().name(),
            }));
        };
        (self.f)(typed, request)
    }
}
