//! Describe the types that flow through request and response bodies.
//!
//! [`PayloadType`] is the key type in this module: every codec registration
//! and every resolution is expressed in terms of it.
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::json::JsonHooks;

pub use annotation::{Annotation, AnnotationMarker};

mod annotation;
mod impls;

/// A type that can be parsed out of a request body or serialized into a response body.
///
/// Implementors describe themselves via [`Payload::payload_type`]: which supertypes they
/// can stand in for, which [annotations](Annotation) they carry and whether the default
/// JSON codec knows how to handle them.
///
/// # Example
///
/// ```rust
/// use pavex_marshal::{Annotation, Payload, PayloadType};
///
/// /// Responses rendered as `application/problem+json`.
/// pub struct ProblemDetails;
///
/// impl Annotation for ProblemDetails {
///     const SELECTS_WRITER: bool = true;
/// }
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// pub struct NotFound {
///     detail: String,
/// }
///
/// impl Payload for NotFound {
///     fn payload_type() -> PayloadType {
///         PayloadType::json::<Self>().annotated::<ProblemDetails>()
///     }
/// }
/// ```
pub trait Payload: Any + Send + Sync {
    /// The descriptor for `Self`.
    fn payload_type() -> PayloadType
    where
        Self: Sized;
}

/// The object-safe counterpart of [`Payload`].
///
/// It is implemented for every [`Payload`] type and it's what readers return
/// and writers receive, since the concrete type is only known at runtime.
pub trait DynPayload: Any + Send + Sync {
    /// The descriptor of the value's concrete type.
    fn runtime_type(&self) -> PayloadType;

    /// Access the value as [`Any`], e.g. to downcast it.
    fn as_any(&self) -> &dyn Any;

    /// Convert the boxed value into a boxed [`Any`], e.g. to downcast it by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// The [`TypeId`] of the value's concrete type.
    ///
    /// Unlike `self.runtime_type().id()`, it doesn't build the descriptor.
    fn concrete_type_id(&self) -> TypeId;
}

impl<T> DynPayload for T
where
    T: Payload,
{
    fn runtime_type(&self) -> PayloadType {
        T::payload_type()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn concrete_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }
}

impl fmt::Debug for dyn DynPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynPayload")
            .field(&self.runtime_type().name())
            .finish()
    }
}

#[derive(Clone)]
/// A descriptor for a type that can be read from or written to a message body.
///
/// Two descriptors are equal if and only if they describe the same Rust type:
/// names, supertypes and annotations do not take part in comparisons.
///
/// # Parameterized types
///
/// A descriptor that carries at least one [type argument](PayloadType::with_type_argument)
/// is considered parameterized. Codecs can't be registered for parameterized types
/// and parameterized types never take part in supertype searches.
///
/// # Canonical descriptors
///
/// Resolution always works off the [canonical](PayloadType::canonical) descriptor,
/// the one returned by [`Payload::payload_type`]: supertypes, type arguments and
/// annotations attached to an ad-hoc descriptor are not taken into account.
pub struct PayloadType {
    id: TypeId,
    canonical: fn() -> PayloadType,
    name: &'static str,
    type_arguments: Vec<PayloadType>,
    supertypes: Vec<PayloadType>,
    annotations: Vec<AnnotationMarker>,
    json: Option<JsonHooks>,
}

impl PayloadType {
    /// Start building the descriptor for `T`.
    ///
    /// The descriptor is named after [`std::any::type_name`] and has no type arguments,
    /// supertypes or annotations.
    pub fn of<T>() -> Self
    where
        T: Payload,
    {
        Self {
            id: TypeId::of::<T>(),
            canonical: T::payload_type,
            name: std::any::type_name::<T>(),
            type_arguments: Vec::new(),
            supertypes: Vec::new(),
            annotations: Vec::new(),
            json: None,
        }
    }

    /// Start building the descriptor for `T`, a type that the default
    /// [`JsonCodec`](crate::JsonCodec) can deserialize and serialize.
    pub fn json<T>() -> Self
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        Self {
            json: Some(JsonHooks::of::<T>()),
            ..Self::of::<T>()
        }
    }

    /// Override the human-readable name of the type.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Add a type argument, marking the type as parameterized.
    pub fn with_type_argument(mut self, argument: PayloadType) -> Self {
        self.type_arguments.push(argument);
        self
    }

    /// Declare that values of this type can stand in for values of `supertype`.
    ///
    /// Readers registered for `supertype` will be used for this type unless a
    /// more specific reader has been registered.
    pub fn extends(mut self, supertype: PayloadType) -> Self {
        self.supertypes.push(supertype);
        self
    }

    /// Attach the annotation `A` to this type.
    ///
    /// The order in which annotations are attached matters: when looking for a writer,
    /// annotations are inspected in declaration order.
    pub fn annotated<A>(mut self) -> Self
    where
        A: Annotation,
    {
        self.annotations.push(AnnotationMarker::of::<A>());
        self
    }

    /// The [`TypeId`] of the described type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The human-readable name of the described type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type arguments, in order.
    pub fn type_arguments(&self) -> &[PayloadType] {
        &self.type_arguments
    }

    /// The declared supertypes, in declaration order.
    pub fn supertypes(&self) -> &[PayloadType] {
        &self.supertypes
    }

    /// The annotations carried by the type, in declaration order.
    pub fn annotations(&self) -> &[AnnotationMarker] {
        &self.annotations
    }

    /// `true` if the type has at least one type argument.
    pub fn is_parameterized(&self) -> bool {
        !self.type_arguments.is_empty()
    }

    /// `true` if a value of this type can be used where a value of `target` is expected,
    /// either because they are the same type or because `target` is one of its
    /// (possibly indirect) supertypes.
    pub fn is_assignable_to(&self, target: &PayloadType) -> bool {
        self == target
            || self
                .supertypes
                .iter()
                .any(|supertype| supertype.is_assignable_to(target))
    }

    /// The descriptor returned by [`Payload::payload_type`] for the described type.
    ///
    /// Equal descriptors always share the same canonical descriptor.
    pub fn canonical(&self) -> PayloadType {
        (self.canonical)()
    }

    pub(crate) fn json_hooks(&self) -> Option<&JsonHooks> {
        self.json.as_ref()
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl Hash for PayloadType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("PayloadType");
        s.field("name", &self.name);
        if !self.type_arguments.is_empty() {
            s.field("type_arguments", &self.type_arguments);
        }
        if !self.supertypes.is_empty() {
            s.field("supertypes", &self.supertypes);
        }
        if !self.annotations.is_empty() {
            s.field("annotations", &self.annotations);
        }
        s.finish_non_exhaustive()
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
