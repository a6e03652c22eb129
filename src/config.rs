//! Generation configuration.
//!
//! ```yaml
//! guard_prefix: AL
//! outputs:
//!   - kind: header
//!     path: ../../include/AL/al.h
//!     registry: ../xml/al.xml
//!     apis: [al]
//!     platform_prefix: AL
//!   - kind: reset
//!     registry: ../xml/al.xml
//!   - kind: module
//!     path: ../../modules/openal.cppm
//!     registry: ../xml/al.xml
//!     apis: [al, alc]
//! ```
//!
//! Relative paths are resolved against the directory of the configuration
//! file when it is loaded with [`Config::load`].

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Deserialize;

use crate::error::GenError;
use crate::render::OutputForm;
use crate::render::template::platform_preamble;

fn default_guard_prefix() -> String {
    "AL".to_string()
}

fn default_generator() -> String {
    "genheaders.py".to_string()
}

/// A whole configuration file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Comment block placed at the top of every file.
    #[serde(default)]
    pub license: String,
    #[serde(default = "default_guard_prefix")]
    pub guard_prefix: String,
    /// Tool name printed in the "regenerate using" banner.
    #[serde(default = "default_generator")]
    pub generator: String,
    /// Processed in order.
    pub outputs: Vec<ConfigEntry>,
}

/// One step of a run.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConfigEntry {
    /// Generate a C header.
    Header(OutputSpec),
    /// Generate a C++ module interface unit.
    Module(OutputSpec),
    /// Forget which declarations a registry has already written.
    Reset { registry: PathBuf },
}

/// A single generated file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct OutputSpec {
    pub path: PathBuf,
    pub registry: PathBuf,
    /// API families targeted, e.g. `[al]`.
    pub apis: Vec<String>,
    /// Select extensions rather than features when `include` is absent.
    #[serde(default)]
    pub extensions: bool,
    /// Explicit, ordered list of sets to render.
    #[serde(default)]
    pub include: Option<Vec<String>>,
    /// Sets left out of the default selection.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Opaque text placed after the banner.
    #[serde(default)]
    pub preamble: Option<String>,
    /// Prepend the built-in platform macros for this prefix.
    #[serde(default)]
    pub platform_prefix: Option<String>,
    /// Module name for module outputs; defaults to the file stem.
    #[serde(default)]
    pub module_name: Option<String>,
}

impl OutputSpec {
    /// Full preamble text: platform macros first, then the custom preamble.
    pub fn preamble_text(&self) -> String {
        let mut text = self
            .platform_prefix
            .as_deref()
            .map(platform_preamble)
            .unwrap_or_default();
        if let Some(preamble) = &self.preamble {
            text.push_str(preamble);
        }
        text
    }
}

impl ConfigEntry {
    /// The output spec and its form, for non-reset entries.
    pub fn output(&self) -> Option<(&OutputSpec, OutputForm)> {
        match self {
            Self::Header(spec) => Some((spec, OutputForm::Header)),
            Self::Module(spec) => Some((spec, OutputForm::Module)),
            Self::Reset { .. } => None,
        }
    }
}

impl Config {
    /// Parse YAML text. Paths are kept as written.
    pub fn from_yaml(text: &str) -> Result<Self, GenError> {
        let config: Self = serde_yaml::from_str(text).map_err(|e| GenError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        let mut config = Self::from_yaml(&text)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    /// Resolve relative paths against `dir`.
    pub fn rebase(&mut self, dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        for entry in &mut self.outputs {
            match entry {
                ConfigEntry::Header(spec) | ConfigEntry::Module(spec) => {
                    resolve(&mut spec.path);
                    resolve(&mut spec.registry);
                }
                ConfigEntry::Reset { registry } => resolve(registry),
            }
        }
    }

    /// Distinct registry sources used by outputs, in first-use order.
    pub fn registries(&self) -> IndexSet<&Path> {
        self.outputs
            .iter()
            .filter_map(|e| e.output())
            .map(|(spec, _)| spec.registry.as_path())
            .collect()
    }

    fn validate(&self) -> Result<(), GenError> {
        for (spec, _) in self.outputs.iter().filter_map(|e| e.output()) {
            if spec.apis.is_empty() {
                return Err(GenError::config(format!(
                    "{} targets no API family",
                    spec.path.display()
                )));
            }
        }
        Ok(())
    }
}
