//! Configuration for the built-in codecs.
//!
//! [`MarshalConfig`] is the root of the configuration tree.
//! With the `config` feature enabled, [`ConfigLoader`] assembles it
//! out of a YAML file and environment variables.
#[cfg(feature = "config")]
use std::path::PathBuf;

#[cfg(feature = "config")]
use anyhow::Context;
#[cfg(feature = "config")]
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// The configuration for [`MessageBodies`](crate::MessageBodies)'
/// built-in default codec pair.
pub struct MarshalConfig {
    /// Configuration for [`JsonCodec`](crate::JsonCodec).
    pub json: JsonCodecConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Configuration for [`JsonCodec`](crate::JsonCodec).
pub struct JsonCodecConfig {
    /// Reject request bodies whose `Content-Type` header is missing or not set
    /// to `application/json` (or another `application/*+json` MIME type).
    ///
    /// Enabled by default.
    pub enforce_content_type: bool,
    /// Serialize response bodies with indentation and newlines.
    ///
    /// Disabled by default.
    pub pretty: bool,
}

impl Default for JsonCodecConfig {
    fn default() -> Self {
        Self {
            enforce_content_type: true,
            pretty: false,
        }
    }
}

#[cfg(feature = "config")]
#[derive(Clone, Debug, Default)]
/// Load a [`MarshalConfig`] by merging together, in order of increasing precedence:
///
/// 1. The default values
/// 2. A YAML file, if [one was specified](ConfigLoader::file)
/// 3. Environment variables prefixed with `MARSHAL_`
///
/// Nested fields are addressed with a double underscore in environment
/// variable names, e.g. `MARSHAL_JSON__PRETTY=true`.
///
/// # Example
///
/// ```rust,no_run
/// use pavex_marshal::{MessageBodies, config::ConfigLoader};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new().file("configuration/marshal.yml").load()?;
/// let bodies = MessageBodies::json(config.json);
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    file: Option<PathBuf>,
}

#[cfg(feature = "config")]
static ENV_PREFIX: &str = "MARSHAL_";

#[cfg(feature = "config")]
impl ConfigLoader {
    /// Initialize a new [`ConfigLoader`] instance.
    pub fn new() -> Self {
        Self { file: None }
    }

    /// Read configuration values from the YAML file at `path`.
    ///
    /// A missing file is not an error: it's treated as an empty one.
    pub fn file<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.file = Some(path.into());
        self
    }

    /// Assemble the configuration.
    pub fn load(self) -> Result<MarshalConfig, errors::ConfigLoadError> {
        let span = tracing::info_span!(
            "Loading marshalling configuration",
            configuration.file = ?self.file,
        );
        let _guard = span.enter();

        let mut figment = Figment::from(Serialized::defaults(MarshalConfig::default()));
        if let Some(file) = &self.file {
            figment = figment.merge(Yaml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: MarshalConfig = figment
            .extract()
            .context("Failed to load the marshalling configuration")
            .map_err(errors::ConfigLoadError)?;
        Ok(config)
    }
}

#[cfg(feature = "config")]
/// Errors that can occur when loading configuration.
pub mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("{0:#}")]
    /// The error returned by [`ConfigLoader::load`](super::ConfigLoader::load).
    ///
    /// The message names the offending key and the source it was read from.
    pub struct ConfigLoadError(pub(super) anyhow::Error);
}
