//! Memoized resolution outcomes.
use std::any::TypeId;
use std::sync::Arc;

use elsa::sync::FrozenMap;

use crate::codec::{Reader, Writer};

/// The outcome of resolving a codec for a type.
pub(crate) enum Resolution<C: ?Sized> {
    /// An explicitly registered codec was found, either for the type itself,
    /// one of its supertypes or one of its annotations.
    Registered(Arc<C>),
    /// Nothing matched: the default codec must be used.
    Fallback,
}

impl<C: ?Sized> Clone for Resolution<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Registered(codec) => Self::Registered(Arc::clone(codec)),
            Self::Fallback => Self::Fallback,
        }
    }
}

/// Resolution outcomes, keyed by the requested type (for readers)
/// or by the runtime type (for writers).
///
/// Entries are never evicted nor replaced: once an outcome has been stored for a
/// type, every later lookup for that type returns it.
pub(crate) struct ResolutionCache {
    readers: FrozenMap<TypeId, Box<Resolution<dyn Reader>>>,
    writers: FrozenMap<TypeId, Box<Resolution<dyn Writer>>>,
}

impl ResolutionCache {
    pub(crate) fn new() -> Self {
        Self {
            readers: FrozenMap::new(),
            writers: FrozenMap::new(),
        }
    }

    pub(crate) fn reader(&self, requested: TypeId) -> Option<Resolution<dyn Reader>> {
        self.readers.get(&requested).cloned()
    }

    /// Store `resolution` unless another outcome has already been stored for `requested`.
    ///
    /// Either way, the stored outcome is returned.
    pub(crate) fn insert_reader(
        &self,
        requested: TypeId,
        resolution: Resolution<dyn Reader>,
    ) -> Resolution<dyn Reader> {
        self.readers.insert(requested, Box::new(resolution)).clone()
    }

    pub(crate) fn writer(&self, runtime: TypeId) -> Option<Resolution<dyn Writer>> {
        self.writers.get(&runtime).cloned()
    }

    /// Store `resolution` unless another outcome has already been stored for `runtime`.
    ///
    /// Either way, the stored outcome is returned.
    pub(crate) fn insert_writer(
        &self,
        runtime: TypeId,
        resolution: Resolution<dyn Writer>,
    ) -> Resolution<dyn Writer> {
        self.writers.insert(runtime, Box::new(resolution)).clone()
    }
}
