//! The default codec pair: JSON in, JSON out.
use std::any::Any;

use http::{HeaderMap, HeaderValue};
use mime::APPLICATION_JSON;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::{Reader, Writer, WrittenBody};
use crate::config::JsonCodecConfig;
use crate::error::CodecError;
use crate::payload::{DynPayload, Payload, PayloadType};
use crate::request::{BufferedBody, RequestHead};

use errors::{
    JsonContentTypeMismatch, JsonDeserializationError, JsonReadError, JsonSerializationError,
    JsonWriteError, MissingJsonContentType, NotJsonDeserializable, NotJsonSerializable,
};

pub mod errors;

#[derive(Debug, Clone, Default)]
/// A [`Reader`] and [`Writer`] for JSON bodies.
///
/// It is the default codec pair used by [`MessageBodies::json`](crate::MessageBodies::json).
/// It can handle every type whose descriptor was built with [`PayloadType::json`]:
/// reading or writing any other type fails.
///
/// # Reading
///
/// Unless disabled via [`JsonCodecConfig::enforce_content_type`], the `Content-Type`
/// header must be set to `application/json` or another `application/*+json` MIME type.
///
/// # Writing
///
/// The body is serialized in compact form, unless [`JsonCodecConfig::pretty`] is set,
/// and `Content-Type` is set to `application/json`.
pub struct JsonCodec {
    config: JsonCodecConfig,
}

impl JsonCodec {
    /// Create a new [`JsonCodec`] with the given configuration.
    pub fn new(config: JsonCodecConfig) -> Self {
        Self { config }
    }

    /// The configuration of this codec.
    pub fn config(&self) -> &JsonCodecConfig {
        &self.config
    }
}

impl Reader for JsonCodec {
    fn read(
        &self,
        requested: &PayloadType,
        head: &RequestHead,
        body: &BufferedBody,
    ) -> Result<Box<dyn DynPayload>, CodecError> {
        read_json(&self.config, requested, head, body).map_err(CodecError::new)
    }
}

impl Writer for JsonCodec {
    fn write(
        &self,
        value: &dyn DynPayload,
        _request: Option<&RequestHead>,
    ) -> Result<WrittenBody, CodecError> {
        let body = write_json(&self.config, value).map_err(CodecError::new)?;
        Ok(WrittenBody::new(
            body,
            HeaderValue::from_static(APPLICATION_JSON.as_ref()),
        ))
    }
}

fn read_json(
    config: &JsonCodecConfig,
    requested: &PayloadType,
    head: &RequestHead,
    body: &BufferedBody,
) -> Result<Box<dyn DynPayload>, JsonReadError> {
    if config.enforce_content_type {
        check_json_content_type(&head.headers)?;
    }
    let Some(hooks) = requested.json_hooks() else {
        return Err(NotJsonDeserializable {
            type_name: requested.name(),
        }
        .into());
    };
    let value = (hooks.deserialize)(body.bytes.as_ref())
        .map_err(|source| JsonDeserializationError { source })?;
    Ok(value)
}

fn write_json(config: &JsonCodecConfig, value: &dyn DynPayload) -> Result<Vec<u8>, JsonWriteError> {
    let runtime_type = value.runtime_type();
    let not_serializable = || NotJsonSerializable {
        type_name: runtime_type.name(),
    };
    let Some(hooks) = runtime_type.json_hooks() else {
        return Err(not_serializable().into());
    };
    // `None` means the hooks were built for a different type than the value's.
    let Some(outcome) = (hooks.serialize)(value.as_any(), config.pretty) else {
        return Err(not_serializable().into());
    };
    let bytes = outcome.map_err(|source| JsonSerializationError { source })?;
    Ok(bytes)
}

/// Check that the `Content-Type` header is set to `application/json`, or another
/// `application/*+json` MIME type.
///
/// Return an error otherwise.
fn check_json_content_type(headers: &HeaderMap) -> Result<(), JsonReadError> {
    let Some(content_type) = headers.get(http::header::CONTENT_TYPE) else {
        return Err(MissingJsonContentType.into());
    };
    let Ok(content_type) = content_type.to_str() else {
        return Err(MissingJsonContentType.into());
    };

    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return Err(JsonContentTypeMismatch {
            actual: content_type.to_string(),
        }
        .into());
    };

    let is_json_content_type = mime.type_() == "application"
        && (mime.subtype() == "json" || mime.suffix().is_some_and(|name| name == "json"));
    if !is_json_content_type {
        return Err(JsonContentTypeMismatch {
            actual: content_type.to_string(),
        }
        .into());
    }
    Ok(())
}

type DeserializeHook =
    fn(&[u8]) -> Result<Box<dyn DynPayload>, serde_path_to_error::Error<serde_json::Error>>;
type SerializeHook = fn(&dyn Any, bool) -> Option<Result<Vec<u8>, serde_json::Error>>;

#[derive(Clone, Copy)]
/// Type-erased entry points into `serde_json` for a specific payload type,
/// captured when its descriptor is built via [`PayloadType::json`].
pub(crate) struct JsonHooks {
    deserialize: DeserializeHook,
    serialize: SerializeHook,
}

impl JsonHooks {
    pub(crate) fn of<T>() -> Self
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        Self {
            deserialize: deserialize::<T>,
            serialize: serialize::<T>,
        }
    }
}

fn deserialize<T>(
    bytes: &[u8],
) -> Result<Box<dyn DynPayload>, serde_path_to_error::Error<serde_json::Error>>
where
    T: Payload + DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut deserializer)?;
    Ok(Box::new(value))
}

fn serialize<T>(value: &dyn Any, pretty: bool) -> Option<Result<Vec<u8>, serde_json::Error>>
where
    T: Payload + Serialize,
{
    let value = value.downcast_ref::<T>()?;
    let outcome = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    Some(outcome)
}
