//! Explicit codec bindings, keyed by payload type or annotation.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::codec::{Reader, Writer};
use crate::error::ConfigurationError;
use crate::payload::{AnnotationMarker, PayloadType};

pub(crate) mod validation;

#[derive(Default, Clone)]
/// The explicit bindings known to [`MessageBodies`](crate::MessageBodies):
/// readers and writers keyed by [`PayloadType`], writers keyed by [`AnnotationMarker`].
///
/// Each key maps to at most one codec: registering a codec for a key that is already
/// bound replaces the previous codec. Keys are kept in registration order; a key that
/// is re-registered keeps the position of its first registration.
pub struct CodecRegistry {
    readers: IndexMap<PayloadType, Arc<dyn Reader>>,
    writers: IndexMap<PayloadType, Arc<dyn Writer>>,
    annotation_writers: IndexMap<AnnotationMarker, Arc<dyn Writer>>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `reader` to `payload_type`.
    ///
    /// It fails if `payload_type` is [parameterized](PayloadType::is_parameterized).
    /// The registry is left untouched on failure.
    pub fn register_reader(
        &mut self,
        payload_type: PayloadType,
        reader: Arc<dyn Reader>,
    ) -> Result<(), ConfigurationError> {
        validation::validate_payload_type(&payload_type)?;
        let name = payload_type.name();
        if self.readers.insert(payload_type, reader).is_some() {
            tracing::debug!(payload.name = name, "Replaced a previously registered reader");
        }
        Ok(())
    }

    /// Bind `writer` to `payload_type`.
    ///
    /// It fails if `payload_type` is [parameterized](PayloadType::is_parameterized).
    /// The registry is left untouched on failure.
    pub fn register_writer(
        &mut self,
        payload_type: PayloadType,
        writer: Arc<dyn Writer>,
    ) -> Result<(), ConfigurationError> {
        validation::validate_payload_type(&payload_type)?;
        let name = payload_type.name();
        if self.writers.insert(payload_type, writer).is_some() {
            tracing::debug!(payload.name = name, "Replaced a previously registered writer");
        }
        Ok(())
    }

    /// Bind `writer` to every type annotated with `marker`.
    ///
    /// It fails if the annotation does not [select writers](crate::Annotation::SELECTS_WRITER).
    /// The registry is left untouched on failure.
    pub fn register_annotation_writer(
        &mut self,
        marker: AnnotationMarker,
        writer: Arc<dyn Writer>,
    ) -> Result<(), ConfigurationError> {
        validation::validate_marker(&marker)?;
        if self.annotation_writers.insert(marker, writer).is_some() {
            tracing::debug!(
                payload.annotation = marker.name(),
                "Replaced a previously registered annotation writer"
            );
        }
        Ok(())
    }

    /// The reader bound to exactly `payload_type`, if any.
    pub fn reader(&self, payload_type: &PayloadType) -> Option<&Arc<dyn Reader>> {
        self.readers.get(payload_type)
    }

    /// The first reader, in registration order, bound to a type that
    /// `payload_type` is [assignable to](PayloadType::is_assignable_to).
    pub fn assignable_reader(
        &self,
        payload_type: &PayloadType,
    ) -> Option<(&PayloadType, &Arc<dyn Reader>)> {
        self.readers
            .iter()
            .find(|(registered, _)| payload_type.is_assignable_to(registered))
    }

    /// The writer bound to exactly `payload_type`, if any.
    pub fn writer(&self, payload_type: &PayloadType) -> Option<&Arc<dyn Writer>> {
        self.writers.get(payload_type)
    }

    /// The writer bound to the first annotation of `payload_type`,
    /// in declaration order, that has a writer bound to it.
    pub fn annotation_writer(
        &self,
        payload_type: &PayloadType,
    ) -> Option<(&AnnotationMarker, &Arc<dyn Writer>)> {
        payload_type
            .annotations()
            .iter()
            .find_map(|marker| self.annotation_writers.get_key_value(marker))
    }

    /// The number of reader bindings.
    pub fn n_readers(&self) -> usize {
        self.readers.len()
    }

    /// The number of writer bindings, including those keyed by annotation.
    pub fn n_writers(&self) -> usize {
        self.writers.len() + self.annotation_writers.len()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("readers", &self.readers.keys().collect::<Vec<_>>())
            .field("writers", &self.writers.keys().collect::<Vec<_>>())
            .field(
                "annotation_writers",
                &self.annotation_writers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
