use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A tag that can be attached to a [`PayloadType`](crate::PayloadType) via
/// [`PayloadType::annotated`](crate::PayloadType::annotated).
///
/// Annotations with [`SELECTS_WRITER`](Annotation::SELECTS_WRITER) set to `true`
/// can be bound to a writer with
/// [`MessageBodies::register_annotation_writer`](crate::MessageBodies::register_annotation_writer):
/// that writer is then used for every value whose type carries the annotation,
/// unless a writer was registered for the exact type.
///
/// # Example
///
/// ```rust
/// use pavex_marshal::Annotation;
///
/// /// Serialize as `text/csv`.
/// pub struct Csv;
///
/// impl Annotation for Csv {
///     const SELECTS_WRITER: bool = true;
/// }
/// ```
pub trait Annotation: Any {
    /// Whether this annotation can be used to select a writer.
    const SELECTS_WRITER: bool;
}

#[derive(Clone, Copy)]
/// A runtime descriptor for a type implementing [`Annotation`].
///
/// Two markers are equal if and only if they describe the same annotation type.
pub struct AnnotationMarker {
    id: TypeId,
    name: &'static str,
    selects_writer: bool,
}

impl AnnotationMarker {
    /// The marker for the annotation `A`.
    pub fn of<A>() -> Self
    where
        A: Annotation,
    {
        Self {
            id: TypeId::of::<A>(),
            name: std::any::type_name::<A>(),
            selects_writer: A::SELECTS_WRITER,
        }
    }

    /// The [`TypeId`] of the annotation type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The name of the annotation type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the annotation can be used to select a writer.
    pub fn selects_writer(&self) -> bool {
        self.selects_writer
    }
}

impl PartialEq for AnnotationMarker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnnotationMarker {}

impl Hash for AnnotationMarker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AnnotationMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnnotationMarker").field(&self.name).finish()
    }
}
