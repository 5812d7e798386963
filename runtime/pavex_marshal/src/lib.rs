//! Type-driven resolution of the codecs that parse request bodies and serialize response bodies.
//!
//! # Overview
//!
//! Every type that flows through a body implements [`Payload`], describing itself with a
//! [`PayloadType`]: which supertypes it can stand in for, which [annotations](Annotation)
//! it carries, whether the default JSON codec can handle it.
//!
//! [`MessageBodies`] owns the registered [`Reader`]s and [`Writer`]s and picks the
//! right one for each type, falling back to a default codec pair when nothing matches.
//! Resolution outcomes are computed once per type and cached.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pavex_marshal::http::HeaderValue;
//! use pavex_marshal::{Annotation, MessageBodies, Payload, PayloadType, WrittenBody, writer_fn};
//! use pavex_marshal::config::JsonCodecConfig;
//!
//! /// Render as plain text.
//! pub struct PlainText;
//!
//! impl Annotation for PlainText {
//!     const SELECTS_WRITER: bool = true;
//! }
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! pub struct Greeting(String);
//!
//! impl Payload for Greeting {
//!     fn payload_type() -> PayloadType {
//!         PayloadType::json::<Self>().annotated::<PlainText>()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bodies = MessageBodies::json(JsonCodecConfig::default());
//! bodies.register_annotation_writer_for::<PlainText>(Arc::new(writer_fn(
//!     |greeting: &Greeting, _request| {
//!         Ok(WrittenBody::new(
//!             greeting.0.clone(),
//!             HeaderValue::from_static("text/plain; charset=utf-8"),
//!         ))
//!     },
//! )))?;
//!
//! let written = bodies.write(&Greeting("Hi!".into()), None)?;
//! assert_eq!(written.content_type, "text/plain; charset=utf-8");
//! assert_eq!(written.body.as_ref(), b"Hi!");
//!
//! // No writer is registered for `String`: it falls back to JSON.
//! let written = bodies.write(&String::from("Hi!"), None)?;
//! assert_eq!(written.content_type, "application/json");
//! # Ok(())
//! # }
//! ```
pub use bodies::{DefaultCodecs, MessageBodies};
pub use codec::{Reader, ReaderFn, Writer, WriterFn, WrittenBody, reader_fn, writer_fn};
pub use error::{
    CodecError, ConfigurationError, NotWriterSelecting, ParameterizedTypeRegistration,
    UnexpectedPayload,
};
pub use json::JsonCodec;
pub use payload::{Annotation, AnnotationMarker, DynPayload, Payload, PayloadType};
pub use registry::CodecRegistry;
pub use request::{BufferedBody, RequestHead};

pub use http;

mod bodies;
mod cache;
mod codec;
pub mod config;
mod error;
pub mod json;
mod payload;
mod registry;
mod request;
