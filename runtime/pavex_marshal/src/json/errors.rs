//! Errors that can occur while reading or writing JSON bodies.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`JsonCodec`](super::JsonCodec) when reading a body fails.
pub enum JsonReadError {
    #[error(transparent)]
    /// See [`MissingJsonContentType`] for details.
    MissingContentType(#[from] MissingJsonContentType),
    #[error(transparent)]
    /// See [`JsonContentTypeMismatch`] for details.
    ContentTypeMismatch(#[from] JsonContentTypeMismatch),
    #[error(transparent)]
    /// See [`NotJsonDeserializable`] for details.
    NotDeserializable(#[from] NotJsonDeserializable),
    #[error(transparent)]
    /// See [`JsonDeserializationError`] for details.
    DeserializationError(#[from] JsonDeserializationError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`JsonCodec`](super::JsonCodec) when writing a body fails.
pub enum JsonWriteError {
    #[error(transparent)]
    /// See [`NotJsonSerializable`] for details.
    NotSerializable(#[from] NotJsonSerializable),
    #[error(transparent)]
    /// See [`JsonSerializationError`] for details.
    SerializationError(#[from] JsonSerializationError),
}

#[derive(Debug, thiserror::Error)]
#[error(
    "The `Content-Type` header is missing. This endpoint expects requests with a `Content-Type` header set to `application/json`, or another `application/*+json` MIME type"
)]
#[non_exhaustive]
/// The `Content-Type` header is missing, while it should have been set to `application/json`
/// or another `application/*+json` MIME type.
pub struct MissingJsonContentType;

#[derive(Debug, thiserror::Error)]
#[error(
    "The `Content-Type` header was set to `{actual}`. This endpoint expects requests with a `Content-Type` header set to `application/json`, or another `application/*+json` MIME type"
)]
#[non_exhaustive]
/// The `Content-Type` header is set to a value that is not `application/json`
/// or another `application/*+json` MIME type.
pub struct JsonContentTypeMismatch {
    /// The actual value of the `Content-Type` header for this request.
    pub actual: String,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "Don't know how to deserialize `{type_name}` from JSON: its payload type was not built with `PayloadType::json`"
)]
#[non_exhaustive]
/// The requested type didn't opt into JSON support.
pub struct NotJsonDeserializable {
    /// The name of the requested type.
    pub type_name: &'static str,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize the body as a JSON document.\n{source}")]
#[non_exhaustive]
/// Something went wrong when deserializing the request body into the requested type.
pub struct JsonDeserializationError {
    #[source]
    pub(super) source: serde_path_to_error::Error<serde_json::Error>,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "Don't know how to serialize `{type_name}` as JSON: its payload type was not built with `PayloadType::json`"
)]
#[non_exhaustive]
/// The value's type didn't opt into JSON support.
pub struct NotJsonSerializable {
    /// The name of the value's type.
    pub type_name: &'static str,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize the response body as JSON")]
#[non_exhaustive]
/// Something went wrong when serializing the value into JSON.
pub struct JsonSerializationError {
    #[source]
    pub(super) source: serde_json::Error,
}
