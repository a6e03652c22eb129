//! Running a configuration end to end.
//!
//! Each distinct registry source is parsed once and shared by every output
//! that names it, so the "already written" state carries over from one
//! output to the next until a `reset` entry clears it.
//!
//! All files of a run, satellites included, are staged in memory and only
//! handed to the caller's sink when every entry succeeded.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::{Config, ConfigEntry, OutputSpec};
use crate::error::GenError;
use crate::output::{MemorySink, OutputSink};
use crate::registry::Registry;
use crate::render::template::{self, render_file};
use crate::render::{Boilerplate, OutputForm, OutputTarget, SetRenderer};

/// Drives generation for a [`Config`].
#[derive(Debug, Default)]
pub struct Generator {
    registries: IndexMap<PathBuf, Registry>,
    timestamp: String,
}

impl Generator {
    /// `timestamp` is printed verbatim in every file banner.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            registries: IndexMap::new(),
            timestamp: timestamp.into(),
        }
    }

    /// Use an already parsed registry for `path` instead of reading it.
    pub fn with_registry(mut self, path: impl Into<PathBuf>, registry: Registry) -> Self {
        self.registries.insert(path.into(), registry);
        self
    }

    /// Parse every registry the configuration uses that isn't loaded yet.
    pub fn load_registries(&mut self, config: &Config) -> Result<(), GenError> {
        for path in config.registries() {
            if self.registries.contains_key(path) {
                continue;
            }
            info!("Reading registry {}", path.display());
            let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
            let registry = Registry::parse(&text)?;
            self.registries.insert(path.to_path_buf(), registry);
        }
        Ok(())
    }

    /// Generate every output of `config` and commit them to `sink`.
    ///
    /// Nothing reaches `sink` if any entry fails.
    pub fn run(&mut self, config: &Config, sink: &mut dyn OutputSink) -> Result<(), GenError> {
        self.load_registries(config)?;

        let mut staged = MemorySink::new();
        let mut produced = HashSet::new();
        for entry in &config.outputs {
            match entry {
                ConfigEntry::Reset { registry } => {
                    info!("Resetting written state of {}", registry.display());
                    self.registries
                        .get_mut(registry)
                        .ok_or_else(|| GenError::UnknownRegistry(registry.clone()))?
                        .reset_written();
                }
                ConfigEntry::Header(spec) => {
                    self.generate(config, spec, OutputForm::Header, &mut staged, &mut produced)?;
                }
                ConfigEntry::Module(spec) => {
                    self.generate(config, spec, OutputForm::Module, &mut staged, &mut produced)?;
                }
            }
        }

        info!("Committing {} generated files", staged.len());
        staged.commit(sink)
    }

    fn generate(
        &mut self,
        config: &Config,
        spec: &OutputSpec,
        form: OutputForm,
        staged: &mut MemorySink,
        produced: &mut HashSet<PathBuf>,
    ) -> Result<(), GenError> {
        let registry = self
            .registries
            .get_mut(&spec.registry)
            .ok_or_else(|| GenError::UnknownRegistry(spec.registry.clone()))?;
        let sets = select_sets(registry, spec)?;
        info!("Generating {} ({} API sets)", spec.path.display(), sets.len());

        let mut target = OutputTarget::new(spec.path.clone(), spec.apis.clone(), form)
            .with_preamble(spec.preamble_text());
        if let Some(name) = &spec.module_name {
            target = target.with_module_name(name.clone());
        }
        if !produced.insert(target.path.clone()) {
            warn!("{} is generated more than once; the last one wins", target.path.display());
        }

        let boilerplate = Boilerplate {
            license: config.license.clone(),
            timestamp: self.timestamp.clone(),
            registry_name: spec
                .registry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            generator: config.generator.clone(),
            guard_prefix: config.guard_prefix.clone(),
        };

        let emit_guard = form == OutputForm::Header;
        let mut content = Vec::new();
        let imports = {
            let mut renderer = SetRenderer::new(registry, staged, &boilerplate, produced);
            for set in &sets {
                content.extend(renderer.render(set, &target, emit_guard)?);
            }
            renderer.imports().to_vec()
        };

        // Satellites import the core partition, so the module's own
        // declarations cannot stay in the primary interface that imports them.
        if !imports.is_empty() {
            let core = template::core_partition(&target);
            if !produced.insert(core.path.clone()) {
                return Err(GenError::AnnexCollision {
                    annex: template::CORE_PARTITION.to_string(),
                    path: core.path,
                });
            }
            staged.write(&core.path, &render_file(&core, &boilerplate, &content))?;
            info!("Moved {} declarations into {}", target.module_name, core.path.display());

            let mut all = vec![format!("export import :{};", template::CORE_PARTITION)];
            all.extend(imports);
            target = target.with_imports(all);
            content.clear();
        }

        let text = render_file(&target, &boilerplate, &content);
        staged.write(&target.path, &text)
    }
}

/// Names of the sets an output renders, in order.
///
/// An explicit `include` list is used as given. Otherwise every feature (or
/// every extension, for extension outputs) supported on one of the output's
/// API families is selected, minus `exclude`.
pub fn select_sets(registry: &Registry, spec: &OutputSpec) -> Result<Vec<String>, GenError> {
    if let Some(include) = &spec.include {
        if let Some(missing) = include.iter().find(|n| registry.set(n).is_none()) {
            return Err(GenError::UnknownApiSet {
                name: missing.clone(),
                output: spec.path.clone(),
            });
        }
        return Ok(include.clone());
    }

    Ok(registry
        .sets
        .values()
        .filter(|s| s.is_feature != spec.extensions)
        .filter(|s| !spec.exclude.contains(&s.name))
        .filter(|s| s.supports_any(&spec.apis))
        .map(|s| s.name.clone())
        .collect())
}
