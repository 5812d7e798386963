use std::collections::HashMap;
use std::sync::Arc;

use fixtures::{Animal, Cat, Dog, Envelope, Pet, Puppy, unused_reader};
use googletest::{assert_that, prelude::eq};
use pavex_marshal::config::JsonCodecConfig;
use pavex_marshal::{
    ConfigurationError, MessageBodies, ParameterizedTypeRegistration, Payload, PayloadType,
};

mod concurrency;
mod round_trip;
mod writers;

fn bodies() -> MessageBodies {
    MessageBodies::json(JsonCodecConfig::default())
}

#[test]
fn exact_match_wins_over_supertypes() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    let for_dog = unused_reader();
    bodies
        .register_reader_for::<Animal>(for_animal)
        .unwrap()
        .register_reader_for::<Dog>(for_dog.clone())
        .unwrap();

    let resolved = bodies.resolve_reader(&Dog::payload_type());
    assert!(Arc::ptr_eq(&resolved, &for_dog));
}

#[test]
fn supertypes_are_searched_transitively() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    bodies.register_reader_for::<Animal>(for_animal.clone()).unwrap();

    for requested in [Dog::payload_type(), Puppy::payload_type(), Cat::payload_type()] {
        let resolved = bodies.resolve_reader(&requested);
        assert!(
            Arc::ptr_eq(&resolved, &for_animal),
            "`{requested}` should have been resolved to the reader for `Animal`"
        );
    }
}

#[test]
fn the_first_compatible_registration_wins() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    let for_pet = unused_reader();
    // `Dog` declares `Pet` before `Animal`, but registration order is what counts.
    bodies
        .register_reader_for::<Animal>(for_animal.clone())
        .unwrap()
        .register_reader_for::<Pet>(for_pet)
        .unwrap();

    let resolved = bodies.resolve_reader(&Puppy::payload_type());
    assert!(Arc::ptr_eq(&resolved, &for_animal));
}

#[test]
fn re_registration_keeps_the_original_position() {
    let mut bodies = bodies();
    let for_pet = unused_reader();
    let replacement = unused_reader();
    bodies
        .register_reader_for::<Pet>(for_pet)
        .unwrap()
        .register_reader_for::<Animal>(unused_reader())
        .unwrap()
        .register_reader_for::<Pet>(replacement.clone())
        .unwrap();

    assert_that!(bodies.registry().n_readers(), eq(2));
    let resolved = bodies.resolve_reader(&Dog::payload_type());
    assert!(Arc::ptr_eq(&resolved, &replacement));
}

#[test]
fn unrelated_types_fall_back_to_the_default_reader() {
    let mut bodies = bodies();
    bodies.register_reader_for::<Dog>(unused_reader()).unwrap();

    // `Animal` is a supertype of `Dog`, not the other way around.
    let resolved = bodies.resolve_reader(&Animal::payload_type());
    assert!(Arc::ptr_eq(&resolved, &bodies.defaults().reader));

    let resolved = bodies.resolve_reader(&String::payload_type());
    assert!(Arc::ptr_eq(&resolved, &bodies.defaults().reader));
}

#[test]
fn parameterized_types_skip_the_supertype_search() {
    let mut bodies = bodies();
    bodies.register_reader_for::<Animal>(unused_reader()).unwrap();

    let requested = Envelope::<Dog>::payload_type();
    assert!(requested.is_assignable_to(&Animal::payload_type()));

    let resolved = bodies.resolve_reader(&requested);
    assert!(Arc::ptr_eq(&resolved, &bodies.defaults().reader));
}

#[test]
fn parameterized_registrations_are_rejected() {
    let mut bodies = bodies();
    bodies.register_reader_for::<Animal>(unused_reader()).unwrap();

    let err = bodies
        .register_reader_for::<Envelope<Dog>>(unused_reader())
        .unwrap_err();
    insta::assert_snapshot!(err, @"Registration of parameterized types is not supported: `Envelope` has 1 type argument(s). Register a codec for a concrete type instead");

    let err = bodies
        .register_reader_for::<HashMap<String, u64>>(unused_reader())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::ParameterizedType(ParameterizedTypeRegistration {
            n_arguments: 2,
            ..
        })
    ));

    let err = bodies
        .register_writer_for::<Vec<String>>(fixtures::tagged_writer("list"))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::ParameterizedType(_)));

    // Nothing changed.
    assert_that!(bodies.registry().n_readers(), eq(1));
    assert_that!(bodies.registry().n_writers(), eq(0));
    let requested = HashMap::<String, u64>::payload_type();
    assert!(bodies.registry().reader(&requested).is_none());
}

#[test]
fn fallback_outcomes_are_cached() {
    let mut bodies = bodies();
    let requested = Cat::payload_type();

    let first = bodies.resolve_reader(&requested);
    assert!(Arc::ptr_eq(&first, &bodies.defaults().reader));

    // Registering a matching reader after the first resolution
    // does not change the outcome for `Cat`.
    let late = unused_reader();
    bodies.register_reader_for::<Cat>(late.clone()).unwrap();
    let second = bodies.resolve_reader(&requested);
    assert!(Arc::ptr_eq(&second, &bodies.defaults().reader));

    // Types that were never resolved do see it.
    bodies.register_reader_for::<Dog>(late.clone()).unwrap();
    assert!(Arc::ptr_eq(
        &bodies.resolve_reader(&Dog::payload_type()),
        &late
    ));
}

#[test]
fn registered_outcomes_are_cached() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    bodies.register_reader_for::<Animal>(for_animal.clone()).unwrap();
    let first = bodies.resolve_reader(&Puppy::payload_type());

    // A more specific reader, registered too late.
    bodies.register_reader_for::<Puppy>(unused_reader()).unwrap();
    let second = bodies.resolve_reader(&Puppy::payload_type());

    assert!(Arc::ptr_eq(&first, &for_animal));
    assert!(Arc::ptr_eq(&second, &for_animal));
}

#[test]
fn the_requested_type_is_forwarded_to_the_reader() {
    let mut bodies = bodies();
    bodies.register_reader_for::<Animal>(unused_reader()).unwrap();

    let err = bodies
        .read_as(
            &Puppy::payload_type(),
            &fixtures::head(None),
            &Default::default(),
        )
        .unwrap_err();
    insta::assert_snapshot!(err, @"No reader was supposed to run for `Puppy`");
}

#[test]
fn descriptors_are_compared_by_type() {
    let renamed = PayloadType::of::<Dog>().named("Hound");
    assert_eq!(renamed, Dog::payload_type());
    assert_ne!(renamed, Puppy::payload_type());
}

#[test]
fn ad_hoc_descriptors_resolve_like_the_declared_ones() {
    let mut bodies = bodies();
    let for_animal = unused_reader();
    bodies.register_reader_for::<Animal>(for_animal.clone()).unwrap();

    // A bare descriptor carries no supertypes, but `Dog` declares `Animal`.
    let bare = PayloadType::of::<Dog>();
    assert!(!bare.is_assignable_to(&Animal::payload_type()));
    assert!(Arc::ptr_eq(&bodies.resolve_reader(&bare), &for_animal));

    // The cached outcome is the one every descriptor of `Dog` gets.
    assert!(Arc::ptr_eq(
        &bodies.resolve_reader(&Dog::payload_type()),
        &for_animal
    ));
}
