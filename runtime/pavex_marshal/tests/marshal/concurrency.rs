use std::sync::{Arc, Barrier};

use pavex_marshal::{MessageBodies, Payload, PayloadType, Reader, Writer};

use crate::bodies;
use crate::fixtures::{Animal, Cat, Csv, Invoice, Puppy, tagged_writer, unused_reader};

const N_CALLERS: usize = 16;

/// Resolve `requested` from `N_CALLERS` threads at once.
fn resolve_readers_concurrently(
    bodies: &MessageBodies,
    requested: &PayloadType,
) -> Vec<Arc<dyn Reader>> {
    let barrier = &Barrier::new(N_CALLERS);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..N_CALLERS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    bodies.resolve_reader(requested)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn concurrent_first_access_agrees_on_a_registered_reader() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    bodies.register_reader_for::<Animal>(for_animal.clone()).unwrap();

    let resolved = resolve_readers_concurrently(&bodies, &Puppy::payload_type());

    assert_eq!(resolved.len(), N_CALLERS);
    for reader in &resolved {
        assert!(Arc::ptr_eq(reader, &for_animal));
    }
}

#[test]
fn concurrent_first_access_agrees_on_the_fallback() {
    let bodies = bodies();

    let resolved = resolve_readers_concurrently(&bodies, &Cat::payload_type());

    let first = &resolved[0];
    assert!(Arc::ptr_eq(first, &bodies.defaults().reader));
    for reader in &resolved {
        assert!(Arc::ptr_eq(reader, first));
    }
}

#[test]
fn concurrent_first_access_agrees_on_a_writer() {
    let mut bodies = bodies();
    let csv = tagged_writer("csv");
    bodies.register_annotation_writer_for::<Csv>(csv.clone()).unwrap();

    let (barrier, bodies) = (&Barrier::new(N_CALLERS), &bodies);
    let resolved: Vec<Arc<dyn Writer>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..N_CALLERS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    bodies.resolve_writer(&Invoice)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for writer in &resolved {
        assert!(Arc::ptr_eq(writer, &csv));
    }
}
