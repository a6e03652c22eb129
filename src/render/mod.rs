//! Text generation: documentation comments, declarations, API sets and
//! whole files.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌───────────────────┐
//! │ SetRenderer│──▶│ render_decl  │──▶│ render_doc        │
//! │ 3 passes   │   │ per variant  │   │ column-aligned    │
//! └─────┬──────┘   └──────────────┘   └───────────────────┘
//!       │ annex
//!       ▼
//! ┌────────────┐   ┌──────────────┐
//! │ template   │──▶│ OutputSink   │
//! └────────────┘   └──────────────┘
//! ```

mod decl;
mod doc;
mod set;
pub mod template;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

pub use decl::render_declaration;
pub use doc::{DOC_MAX_COLS, render_doc};
pub use set::SetRenderer;
pub use template::Boilerplate;

/// Width the `#define NAME ` part of an enum is padded to.
pub const ENUM_NAME_COLS: usize = 49;

/// Shape of a generated file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputForm {
    /// Plain C header: macros, typedefs and prototypes.
    #[default]
    Header,
    /// C++ module interface unit: constants and `using` aliases.
    Module,
}

impl OutputForm {
    /// Empty parameter list marker.
    pub fn empty_params(self) -> &'static str {
        match self {
            Self::Header => "(void)",
            Self::Module => "()",
        }
    }
}

/// The file currently being generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// API families this output targets, e.g. `["al"]`.
    pub apis: Vec<String>,
    pub form: OutputForm,
    /// Opaque text placed before the content.
    pub preamble: String,
    /// Module name, for [`OutputForm::Module`].
    pub module_name: String,
    /// Import declarations placed right after `export module`.
    pub imports: Vec<String>,
}

impl OutputTarget {
    pub fn new(path: impl Into<PathBuf>, apis: Vec<String>, form: OutputForm) -> Self {
        let path = path.into();
        let module_name = file_stem(&path);
        Self {
            path,
            apis,
            form,
            preamble: String::new(),
            module_name,
            imports: Vec::new(),
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }

    /// Whether this output targets `api`.
    pub fn targets(&self, api: &str) -> bool {
        self.apis.iter().any(|a| a == api)
    }

    /// Whether this output is the satellite file for `annex`.
    pub fn is_annex(&self, annex: &str) -> bool {
        file_stem(&self.path) == annex
    }

    /// File name, e.g. `al.h`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of the satellite file for `annex`, next to this output and
    /// sharing its extension.
    pub fn annex_path(&self, annex: &str) -> PathBuf {
        let mut name = annex.to_string();
        if let Some(ext) = self.path.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        match self.path.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
