//! Checks that run on every registration, before anything is stored.
use tracing::Level;
use tracing_log_error::log_error;

use crate::error::{ConfigurationError, NotWriterSelecting, ParameterizedTypeRegistration};
use crate::payload::{AnnotationMarker, PayloadType};

/// Reject payload types that can't be used as registration keys.
pub(crate) fn validate_payload_type(payload_type: &PayloadType) -> Result<(), ConfigurationError> {
    if payload_type.is_parameterized() {
        let e = ConfigurationError::from(ParameterizedTypeRegistration {
            type_name: payload_type.name(),
            n_arguments: payload_type.type_arguments().len(),
        });
        log_error!(e, level: Level::WARN, payload.name = payload_type.name(), "Rejected a codec registration");
        return Err(e);
    }
    Ok(())
}

/// Reject annotations that don't select writers.
pub(crate) fn validate_marker(marker: &AnnotationMarker) -> Result<(), ConfigurationError> {
    if !marker.selects_writer() {
        let e = ConfigurationError::from(NotWriterSelecting {
            annotation: marker.name(),
        });
        log_error!(e, level: Level::WARN, payload.annotation = marker.name(), "Rejected a codec registration");
        return Err(e);
    }
    Ok(())
}
