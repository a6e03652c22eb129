//! Whole-file templates.

use super::{OutputForm, OutputTarget};

/// Fixed text surrounding every generated file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boilerplate {
    /// Comment block placed at the very top, verbatim.
    pub license: String,
    /// Shown as "Last regenerated". Injected so output is reproducible.
    pub timestamp: String,
    /// Registry file name, e.g. `al.xml`.
    pub registry_name: String,
    /// Name of the tool, as shown in the banner.
    pub generator: String,
    /// Include guards are `{guard_prefix}_{FILE_NAME}`.
    pub guard_prefix: String,
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self {
            license: String::new(),
            timestamp: String::new(),
            registry_name: "al.xml".to_string(),
            generator: "genheaders.py".to_string(),
            guard_prefix: "AL".to_string(),
        }
    }
}

impl Boilerplate {
    /// Include guard for a file name: `al.h` becomes `AL_AL_H`.
    pub fn guard(&self, file_name: &str) -> String {
        format!("{}_{}", self.guard_prefix, file_name.to_uppercase().replace('.', "_"))
    }

    fn license_block(&self) -> String {
        if self.license.is_empty() || self.license.ends_with('\n') {
            self.license.clone()
        } else {
            format!("{}\n", self.license)
        }
    }
}

/// Assemble a complete file from rendered content lines.
pub fn render_file(target: &OutputTarget, boilerplate: &Boilerplate, content: &[String]) -> String {
    let content = content.join("\n");
    match target.form {
        OutputForm::Header => header_file(target, boilerplate, &content),
        OutputForm::Module => module_file(target, boilerplate, &content),
    }
}

fn header_file(target: &OutputTarget, boilerplate: &Boilerplate, content: &str) -> String {
    let license = boilerplate.license_block();
    let guard = boilerplate.guard(&target.file_name());
    let registry = &boilerplate.registry_name;
    let generator = &boilerplate.generator;
    let date = &boilerplate.timestamp;
    let preamble = &target.preamble;
    format!(
        "{license}#ifndef {guard}
#define {guard}

/* This file is auto-generated! Please do not edit it manually.
 * Instead, modify the API in {registry} and regenerate using {generator}.
 *
 * Last regenerated: {date}
 */

/* NOLINTBEGIN */
{preamble}
{content}
#ifdef __cplusplus
}} /* extern \"C\" */
#endif
/* NOLINTEND */

#endif /* {guard} */
"
    )
}

fn module_file(target: &OutputTarget, boilerplate: &Boilerplate, content: &str) -> String {
    let license = boilerplate.license_block();
    let registry = &boilerplate.registry_name;
    let generator = &boilerplate.generator;
    let date = &boilerplate.timestamp;
    let preamble = &target.preamble;
    let module = &target.module_name;
    let mut text = format!(
        "{license}/* This file is auto-generated! Please do not edit it manually.
 * Instead, modify the API in {registry} and regenerate using {generator}.
 *
 * Last regenerated: {date}
 */

module;

{preamble}
export module {module};
"
    );
    if !target.imports.is_empty() {
        text.push('\n');
        for import in &target.imports {
            text.push_str(import);
            text.push('\n');
        }
    }
    // A primary interface whose declarations moved to the core partition
    // has nothing left to export itself.
    if !content.is_empty() {
        text.push_str(&format!(
            "\nexport extern \"C\" {{\n{content}\n}} /* extern \"C\" */\n"
        ));
    }
    text
}

/// Partition holding a module's own declarations once it has satellites.
pub const CORE_PARTITION: &str = "core";

/// The output a set annexed as `annex` is extracted into from `parent`.
///
/// Header satellites include the parent header for the types and macros
/// it defines. Module satellites are partitions of the parent module: they
/// repeat its global module fragment for the macros and import the
/// [`CORE_PARTITION`] for the declarations.
pub fn satellite_target(parent: &OutputTarget, annex: &str, includes: &[String]) -> OutputTarget {
    let mut preamble: String = includes
        .iter()
        .map(|i| format!("#include <{i}>\n"))
        .collect();
    let mut imports = Vec::new();
    match parent.form {
        OutputForm::Header => {
            preamble.push_str(&format!("#include \"{}\"\n", parent.file_name()));
            preamble.push_str("\n#ifdef __cplusplus\nextern \"C\" {\n#endif\n");
        }
        OutputForm::Module => {
            preamble.push_str(&parent.preamble);
            imports.push(format!("import :{CORE_PARTITION};"));
        }
    }
    OutputTarget::new(parent.annex_path(annex), parent.apis.clone(), parent.form)
        .with_preamble(preamble)
        .with_module_name(format!("{}:{annex}", parent.module_name))
        .with_imports(imports)
}

/// The partition a module output's declarations are moved into when it has
/// satellites, e.g. `modules/openal-core.cppm` for `openal:core`.
pub fn core_partition(parent: &OutputTarget) -> OutputTarget {
    let stem = super::file_stem(&parent.path);
    OutputTarget::new(
        parent.annex_path(&format!("{stem}-{CORE_PARTITION}")),
        parent.apis.clone(),
        parent.form,
    )
    .with_preamble(parent.preamble.clone())
    .with_module_name(format!("{}:{CORE_PARTITION}", parent.module_name))
}

/// The line referencing an extracted set. Headers get it in place of the
/// set; modules get it in their imports.
pub fn annex_reference(satellite: &OutputTarget) -> String {
    match satellite.form {
        OutputForm::Header => format!("#include \"{}\"", satellite.file_name()),
        OutputForm::Module => format!("export import :{};", partition_name(&satellite.module_name)),
    }
}

fn partition_name(module: &str) -> &str {
    module.rsplit_once(':').map_or(module, |(_, partition)| partition)
}

/// Linkage and calling-convention macros for a header whose API uses the
/// `{prefix}_API`, `{prefix}_APIENTRY` and `{prefix}_API_NOEXCEPT` tokens.
/// Also opens the `extern "C"` block the header template closes.
pub fn platform_preamble(prefix: &str) -> String {
    format!(
        "#ifdef __cplusplus
extern \"C\" {{

#ifdef _MSVC_LANG
#define {prefix}_CPLUSPLUS _MSVC_LANG
#else
#define {prefix}_CPLUSPLUS __cplusplus
#endif

#ifndef AL_DISABLE_NOEXCEPT
#if {prefix}_CPLUSPLUS >= 201103L
#define {prefix}_API_NOEXCEPT noexcept
#else
#define {prefix}_API_NOEXCEPT
#endif
#if {prefix}_CPLUSPLUS >= 201703L
#define {prefix}_API_NOEXCEPT17 noexcept
#else
#define {prefix}_API_NOEXCEPT17
#endif

#else /* AL_DISABLE_NOEXCEPT */

#define {prefix}_API_NOEXCEPT
#define {prefix}_API_NOEXCEPT17
#endif

#undef {prefix}_CPLUSPLUS

#else /* __cplusplus */

#define {prefix}_API_NOEXCEPT
#define {prefix}_API_NOEXCEPT17
#endif

#ifndef {prefix}_API
 #if defined(AL_LIBTYPE_STATIC)
  #define {prefix}_API
 #elif defined(_WIN32)
  #define {prefix}_API __declspec(dllimport)
 #else
  #define {prefix}_API extern
 #endif
#endif

#ifdef _WIN32
 #define {prefix}_APIENTRY __cdecl
#else
 #define {prefix}_APIENTRY
#endif

"
    )
}
