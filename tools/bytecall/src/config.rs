use std::fs::read_to_string;

use bytecall_runtime::logic::VMLimits;
use camino::Utf8Path;
use eyre::{Result as EyreResult, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct ConfigFile {
    pub limits: VMLimits,
}

impl ConfigFile {
    pub fn load(path: &Utf8Path) -> EyreResult<Self> {
        let content = read_to_string(path)
            .wrap_err_with(|| format!("failed to read configuration from {path:?}"))?;

        toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse configuration from {path:?}"))
    }

    /// Loads `path` when given, the built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Utf8Path>) -> EyreResult<Self> {
        let Some(path) = path else {
            debug!("no configuration file given, using defaults");
            return Ok(Self::default());
        };

        Self::load(path)
    }
}
