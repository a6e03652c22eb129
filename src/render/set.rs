//! API set rendering.
//!
//! A set is emitted in three passes over its requirements:
//!
//! | pass              | feature | extension |
//! |-------------------|---------|-----------|
//! | non-command       | 1st     | 1st       |
//! | prototypes        | 2nd     | 3rd       |
//! | pointer typedefs  | 3rd     | 2nd       |
//!
//! Extensions are normally loaded through function pointers and features
//! linked directly, so each leads with its preferred form.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::decl::render_declaration;
use super::doc::render_doc;
use super::template::{self, Boilerplate};
use super::{OutputForm, OutputTarget};
use crate::error::GenError;
use crate::model::{ApiSet, Declaration};
use crate::output::OutputSink;
use crate::registry::Registry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    NonCommand,
    CommandFunction,
    CommandPointer,
}

impl Pass {
    fn order(is_feature: bool) -> [Pass; 3] {
        if is_feature {
            [Self::NonCommand, Self::CommandFunction, Self::CommandPointer]
        } else {
            [Self::NonCommand, Self::CommandPointer, Self::CommandFunction]
        }
    }

    fn accepts(self, decl: &Declaration) -> bool {
        match self {
            Self::NonCommand => !decl.is_command(),
            Self::CommandFunction | Self::CommandPointer => decl.is_command(),
        }
    }
}

/// Renders API sets against one registry.
///
/// Rendering records every referenced declaration as written by the set, so
/// a later set referencing the same declaration emits it commented out.
/// Satellite files for annexed sets are written through the sink as a side
/// effect. Module outputs reference them through [`SetRenderer::imports`]
/// rather than through content lines.
pub struct SetRenderer<'a> {
    registry: &'a mut Registry,
    sink: &'a mut dyn OutputSink,
    boilerplate: &'a Boilerplate,
    /// Files produced so far in this run.
    produced: &'a mut HashSet<PathBuf>,
    imports: Vec<String>,
}

impl<'a> SetRenderer<'a> {
    pub fn new(
        registry: &'a mut Registry,
        sink: &'a mut dyn OutputSink,
        boilerplate: &'a Boilerplate,
        produced: &'a mut HashSet<PathBuf>,
    ) -> Self {
        Self {
            registry,
            sink,
            boilerplate,
            produced,
            imports: Vec::new(),
        }
    }

    /// Import declarations for the satellites extracted from module outputs.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Render the set `set_name` into lines for `target`.
    pub fn render(
        &mut self,
        set_name: &str,
        target: &OutputTarget,
        emit_guard: bool,
    ) -> Result<Vec<String>, GenError> {
        let set = self
            .registry
            .set(set_name)
            .cloned()
            .ok_or_else(|| GenError::UnknownApiSet {
                name: set_name.to_string(),
                output: target.path.clone(),
            })?;
        debug!("Rendering {} into {}", set.name, target.path.display());

        let mut out = Vec::new();
        if emit_guard {
            out.push(format!("#ifndef {}", set.name));
            out.push(format!("#define {} 1", set.name));
        }
        let doc = render_doc(set.doc.as_deref(), &*self.registry, None);
        out.extend(doc.lines().map(str::to_string));

        if let Some(annex) = set.annex.as_deref().filter(|a| !target.is_annex(a)) {
            let reference = self.extract_annex(&set, annex, target, emit_guard)?;
            if target.form == OutputForm::Module {
                self.imports.push(reference);
                return Ok(Vec::new());
            }
            out.push(reference);
            if emit_guard {
                close_guard(&set, emit_guard, &mut out);
            } else {
                out.push(String::new());
            }
            return Ok(out);
        }

        let passes = Pass::order(set.is_feature);
        for pass in passes {
            self.render_pass(&set, pass, passes[1], target, &mut out)?;
        }
        close_guard(&set, emit_guard, &mut out);

        self.registry.mark_written(&set);
        Ok(out)
    }

    fn render_pass(
        &self,
        set: &ApiSet,
        pass: Pass,
        first_command_pass: Pass,
        target: &OutputTarget,
        out: &mut Vec<String>,
    ) -> Result<(), GenError> {
        let registry: &Registry = &*self.registry;
        let mut open_block: Option<String> = None;
        let mut wrote_heading = false;

        for req in &set.require {
            if !req.applies_to(&target.apis) {
                continue;
            }
            let mut wrote_comment = false;
            let mut last_single_line = false;

            for name in &req.names {
                let Some(decl) = registry.get(name) else {
                    if pass == Pass::NonCommand {
                        warn!(
                            "Skipping {name} for {} as it is unavailable (has it been promoted?)",
                            set.name
                        );
                    }
                    continue;
                };
                if matches!(decl, Declaration::Include(_)) || !pass.accepts(decl) {
                    continue;
                }

                match (pass, decl) {
                    (Pass::CommandFunction, Declaration::Command(cmd)) => {
                        if open_block.as_deref() != Some(cmd.namespace.as_str()) {
                            if let Some(ns) = open_block.take() {
                                close_prototypes(&ns, out);
                            }
                            out.push(format!("#ifndef {}_NO_PROTOTYPES", cmd.namespace));
                            open_block = Some(cmd.namespace.clone());
                        }
                    }
                    (Pass::CommandPointer, _) if set.is_feature && !wrote_heading => {
                        out.push(
                            "/* Pointer-to-function types, useful for storing dynamically loaded AL entry"
                                .to_string(),
                        );
                        out.push(" * points.".to_string());
                        out.push(" */".to_string());
                        wrote_heading = true;
                    }
                    _ => {}
                }

                if !wrote_comment && pass != Pass::CommandPointer {
                    if let Some(comment) = &req.comment {
                        out.push(format!("/* {comment} */"));
                        wrote_comment = true;
                    }
                }

                let pointer_form = pass == Pass::CommandPointer;
                let duplicate_of = registry.written_by(name).filter(|w| *w != set.name);
                let lines = match duplicate_of {
                    Some(writer) => {
                        if pass == Pass::NonCommand || pass == first_command_pass {
                            warn!(
                                "{name} referenced by {} was already written by {writer}; emitting it commented out",
                                set.name
                            );
                        }
                        let bare = without_doc(decl);
                        suppressed(&render_declaration(&bare, pointer_form, registry, target)?)
                    }
                    None => render_declaration(decl, pointer_form, registry, target)?
                        .lines()
                        .map(str::to_string)
                        .collect(),
                };

                let multi_line = lines.len() > 1;
                out.extend(lines);
                if multi_line {
                    out.push(String::new());
                }
                last_single_line = !multi_line;
            }

            if last_single_line {
                out.push(String::new());
            }
        }

        if let Some(ns) = open_block {
            close_prototypes(&ns, out);
        }
        Ok(())
    }

    /// Render `set` into its own satellite file and return the line that
    /// references it from `target`.
    fn extract_annex(
        &mut self,
        set: &ApiSet,
        annex: &str,
        target: &OutputTarget,
        emit_guard: bool,
    ) -> Result<String, GenError> {
        let path = target.annex_path(annex);
        let reserved = target.form == OutputForm::Module && annex == template::CORE_PARTITION;
        if reserved || path == target.path || !self.produced.insert(path.clone()) {
            return Err(GenError::AnnexCollision {
                annex: annex.to_string(),
                path,
            });
        }

        let includes = external_includes(set, &*self.registry);
        let satellite = template::satellite_target(target, annex, &includes);
        let content = self.render(&set.name, &satellite, emit_guard)?;
        let text = template::render_file(&satellite, self.boilerplate, &content);
        self.sink.write(&satellite.path, &text)?;
        info!("Extracted {} into {}", set.name, satellite.path.display());

        Ok(template::annex_reference(&satellite))
    }
}

fn close_guard(set: &ApiSet, emit_guard: bool, out: &mut Vec<String>) {
    if emit_guard {
        out.push(format!("#endif /* {} */", set.name));
        out.push(String::new());
    }
}

fn close_prototypes(namespace: &str, out: &mut Vec<String>) {
    out.push(format!("#endif /* {namespace}_NO_PROTOTYPES */"));
    out.push(String::new());
}

/// Headers named by `<type category="include">` references, first-seen order.
fn external_includes(set: &ApiSet, registry: &Registry) -> Vec<String> {
    let mut seen = HashSet::new();
    set.referenced_names()
        .filter_map(|name| match registry.get(name) {
            Some(Declaration::Include(include)) => Some(include.name.clone()),
            _ => None,
        })
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn without_doc(decl: &Declaration) -> Cow<'_, Declaration> {
    if decl.doc().is_none() {
        return Cow::Borrowed(decl);
    }
    let mut bare = decl.clone();
    match &mut bare {
        Declaration::Command(c) => c.doc = None,
        Declaration::Enum(e) => e.doc = None,
        Declaration::Typedef(t) => t.doc = None,
        Declaration::Verbatim(v) => v.doc = None,
        Declaration::Include(_) => {}
    }
    Cow::Owned(bare)
}

/// Comment out already-written text.
fn suppressed(text: &str) -> Vec<String> {
    let text = text.replace("*/", "* /");
    let lines: Vec<&str> = text.lines().collect();
    match lines.as_slice() {
        [line] => vec![format!("/* {line} */")],
        _ => {
            let mut out = vec!["/*".to_string()];
            out.extend(lines.iter().map(|l| format!(" * {l}").trim_end().to_string()));
            out.push(" */".to_string());
            out
        }
    }
}
