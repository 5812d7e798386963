use std::sync::Arc;

use googletest::{assert_that, prelude::eq};
use pavex_marshal::http::{StatusCode, header::CONTENT_TYPE};
use pavex_marshal::json::errors::JsonReadError;
use pavex_marshal::{BufferedBody, DynPayload, Payload, PayloadType};

use crate::bodies;
use crate::fixtures::{EchoCodec, EchoType, MalformedEcho, head};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Order {
    id: u64,
    items: Vec<String>,
    note: Option<String>,
}

impl Payload for Order {
    fn payload_type() -> PayloadType {
        PayloadType::json::<Self>()
    }
}

#[test]
fn echo_round_trip() {
    let mut bodies = bodies();
    let codec = Arc::new(EchoCodec);
    bodies
        .register_reader_for::<EchoType>(codec.clone())
        .unwrap()
        .register_writer_for::<EchoType>(codec)
        .unwrap();

    let value = EchoType("ping".into());
    let written = bodies.write(&value, None).unwrap();
    assert_that!(written.content_type.to_str().unwrap(), eq("text/x-echo"));

    let read: EchoType = bodies
        .read(&head(None), &BufferedBody::new(written.body))
        .unwrap();
    assert_eq!(read, value);
}

#[test]
fn reader_failures_are_returned_unchanged() {
    let mut bodies = bodies();
    bodies
        .register_reader_for::<EchoType>(Arc::new(EchoCodec))
        .unwrap();

    let err = bodies
        .read::<EchoType>(&head(None), &BufferedBody::new("pong"))
        .unwrap_err();
    assert!(err.downcast_ref::<MalformedEcho>().is_some());
    insta::assert_snapshot!(err, @"The body is not a valid echo frame");
}

#[test]
fn json_round_trip_through_the_default_codecs() {
    let bodies = bodies();
    let order = Order {
        id: 7,
        items: vec!["espresso".into(), "croissant".into()],
        note: None,
    };

    let response = bodies
        .write(&order, None)
        .unwrap()
        .into_response(StatusCode::CREATED);
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

    let read: Order = bodies
        .read(
            &head(Some("application/json")),
            &BufferedBody::new(response.into_body()),
        )
        .unwrap();
    assert_eq!(read, order);
}

#[test]
fn untyped_reads_return_the_requested_type() {
    let bodies = bodies();

    let value: Box<dyn DynPayload> = bodies
        .read_as(
            &Order::payload_type(),
            &head(Some("application/vnd.api+json")),
            &BufferedBody::new(r#"{"id":1,"items":[],"note":"asap"}"#),
        )
        .unwrap();
    assert_eq!(value.runtime_type(), Order::payload_type());

    let order = value.into_any().downcast::<Order>().unwrap();
    assert_eq!(order.note.as_deref(), Some("asap"));
}

#[test]
fn json_reads_enforce_the_content_type() {
    let bodies = bodies();
    let body = BufferedBody::new(r#"{"id":1,"items":[],"note":null}"#);

    let err = bodies.read::<Order>(&head(None), &body).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<JsonReadError>(),
        Some(JsonReadError::MissingContentType(_))
    ));

    let err = bodies
        .read::<Order>(&head(Some("text/plain")), &body)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<JsonReadError>(),
        Some(JsonReadError::ContentTypeMismatch(_))
    ));
}

#[test]
fn json_errors_point_at_the_offending_field() {
    let bodies = bodies();

    let err = bodies
        .read::<Order>(
            &head(Some("application/json")),
            &BufferedBody::new(r#"{"id":1,"items":["tea", 3],"note":null}"#),
        )
        .unwrap_err();
    insta::assert_snapshot!(err, @r"
    Failed to deserialize the body as a JSON document.
    items[1]: invalid type: integer `3`, expected a string at line 1 column 25
    ");
}
