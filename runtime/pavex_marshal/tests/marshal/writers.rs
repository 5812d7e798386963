use std::sync::Arc;

use googletest::{assert_that, prelude::eq};
use pavex_marshal::{AnnotationMarker, ConfigurationError, Payload};

use crate::bodies;
use crate::fixtures::{Audited, Csv, Invoice, Report, Xml, tagged_writer};

#[test]
fn the_first_declared_annotation_wins() {
    let mut bodies = bodies();
    let csv = tagged_writer("csv");
    let xml = tagged_writer("xml");
    // `Csv` is registered first, but `Report` declares `Xml` first.
    bodies
        .register_annotation_writer_for::<Csv>(csv.clone())
        .unwrap()
        .register_annotation_writer_for::<Xml>(xml.clone())
        .unwrap();

    for _ in 0..3 {
        let resolved = bodies.resolve_writer(&Report);
        assert!(Arc::ptr_eq(&resolved, &xml));
    }
    let written = bodies.write(&Report, None).unwrap();
    assert_that!(written.body.as_ref(), eq(b"xml".as_slice()));

    let resolved = bodies.resolve_writer(&Invoice);
    assert!(Arc::ptr_eq(&resolved, &csv));
}

#[test]
fn unbound_annotations_are_skipped() {
    let mut bodies = bodies();
    let csv = tagged_writer("csv");
    bodies.register_annotation_writer_for::<Csv>(csv.clone()).unwrap();

    // `Audited` and `Xml` come first on `Report`, but nothing is bound to them.
    let resolved = bodies.resolve_writer(&Report);
    assert!(Arc::ptr_eq(&resolved, &csv));
}

#[test]
fn exact_match_wins_over_annotations() {
    let mut bodies = bodies();
    let csv = tagged_writer("csv");
    let for_invoice = tagged_writer("invoice");
    bodies
        .register_annotation_writer_for::<Csv>(csv)
        .unwrap()
        .register_writer_for::<Invoice>(for_invoice.clone())
        .unwrap();

    let resolved = bodies.resolve_writer(&Invoice);
    assert!(Arc::ptr_eq(&resolved, &for_invoice));
}

#[test]
fn values_without_a_match_use_the_default_writer() {
    let mut bodies = bodies();
    bodies.register_writer_for::<Invoice>(tagged_writer("invoice")).unwrap();

    let resolved = bodies.resolve_writer(&Report);
    assert!(Arc::ptr_eq(&resolved, &bodies.defaults().writer));

    let late = tagged_writer("report");
    bodies.register_writer_for::<Report>(late).unwrap();
    let resolved = bodies.resolve_writer(&Report);
    assert!(Arc::ptr_eq(&resolved, &bodies.defaults().writer));
}

#[test]
fn writers_are_resolved_against_the_runtime_type() {
    let mut bodies = bodies();
    let csv = tagged_writer("csv");
    bodies.register_annotation_writer_for::<Csv>(csv.clone()).unwrap();

    let boxed: Box<dyn pavex_marshal::DynPayload> = Box::new(Invoice);
    let resolved = bodies.resolve_writer(&*boxed);
    assert!(Arc::ptr_eq(&resolved, &csv));
}

#[test]
fn annotations_that_do_not_select_writers_are_rejected() {
    let mut bodies = bodies();

    let err = bodies
        .register_annotation_writer_for::<Audited>(tagged_writer("audited"))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::NotWriterSelecting(_)));
    insta::assert_snapshot!(err, @"`marshal::fixtures::Audited` can't be used to select a writer: its `Annotation::SELECTS_WRITER` constant is set to `false`");

    assert!(!AnnotationMarker::of::<Audited>().selects_writer());
    assert_that!(bodies.registry().n_writers(), eq(0));
    assert_eq!(Report::payload_type().annotations().len(), 3);
}

#[test]
fn default_writer_failures_are_returned_unchanged() {
    let bodies = bodies();

    // `Report` was not built with `PayloadType::json`.
    let err = bodies.write(&Report, None).unwrap_err();
    assert!(
        err.downcast_ref::<pavex_marshal::json::errors::JsonWriteError>()
            .is_some()
    );
    insta::assert_snapshot!(err, @"Don't know how to serialize `Report` as JSON: its payload type was not built with `PayloadType::json`");
}
