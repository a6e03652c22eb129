//! One declaration to text.

use super::doc::render_doc;
use super::{ENUM_NAME_COLS, OutputForm, OutputTarget};
use crate::error::GenError;
use crate::model::{Command, Declaration, Enum, Typedef, Verbatim};
use crate::registry::Registry;

/// Render a declaration for `target`.
///
/// `pointer_form` selects the function pointer typedef of a command instead
/// of its prototype and is ignored for other declarations. The returned text
/// has no trailing newline.
pub fn render_declaration(
    decl: &Declaration,
    pointer_form: bool,
    registry: &Registry,
    target: &OutputTarget,
) -> Result<String, GenError> {
    let text = match decl {
        Declaration::Command(cmd) if pointer_form => render_pfn(cmd, registry, target.form),
        Declaration::Command(cmd) => render_prototype(cmd, registry, target),
        Declaration::Enum(e) => render_enum(e, registry, target.form),
        Declaration::Typedef(t) => render_typedef(t, registry, target.form),
        Declaration::Verbatim(v) => render_verbatim(v, registry, target.form)?,
        Declaration::Include(i) => {
            return Err(GenError::internal(format!(
                "include marker `{}` has no textual form",
                i.name
            )));
        }
    };
    Ok(text.trim_end_matches('\n').to_string())
}

/// `[[deprecated("msg")]]`.
fn deprecated_attr(message: &str) -> String {
    format!("[[deprecated(\"{}\")]]", message.replace('\\', "\\\\").replace('"', "\\\""))
}

fn param_list(cmd: &Command, form: OutputForm) -> String {
    if cmd.parameters.is_empty() {
        return form.empty_params().to_string();
    }
    let params: Vec<&str> = cmd.parameters.iter().map(|p| p.repr.as_str()).collect();
    format!("({})", params.join(", "))
}

/// Commands without an export marker are always linkable; marked ones only
/// on the API family they name.
fn is_exported(cmd: &Command, target: &OutputTarget) -> bool {
    match &cmd.export {
        Some(api) => target.targets(api),
        None => true,
    }
}

fn render_prototype(cmd: &Command, registry: &Registry, target: &OutputTarget) -> String {
    let ns = &cmd.namespace;
    let doc = render_doc(cmd.doc.as_deref(), registry, None);
    let deprecated = match (&cmd.deprecated, target.form) {
        (Some(message), OutputForm::Module) => format!("{} ", deprecated_attr(message)),
        _ => String::new(),
    };
    let export = if is_exported(cmd, target) {
        format!("{ns}_API ")
    } else {
        String::new()
    };
    let noexcept = if cmd.noexcept {
        format!(" {ns}_API_NOEXCEPT")
    } else {
        String::new()
    };
    format!(
        "{doc}{deprecated}{export}{} {ns}_APIENTRY {}{}{noexcept};",
        cmd.return_type,
        cmd.name,
        param_list(cmd, target.form)
    )
}

fn render_pfn(cmd: &Command, registry: &Registry, form: OutputForm) -> String {
    let ns = &cmd.namespace;
    let params = param_list(cmd, form);
    let noexcept = if cmd.noexcept {
        format!(" {ns}_API_NOEXCEPT17")
    } else {
        String::new()
    };
    match form {
        OutputForm::Header => {
            let width = registry.return_width(ns);
            format!(
                "typedef {:<width$} ({ns}_APIENTRY *{}){params}{noexcept};",
                cmd.return_type, cmd.pfn_name
            )
        }
        OutputForm::Module => format!(
            "using {} = auto ({ns}_APIENTRY *){params}{noexcept} -> {};",
            cmd.pfn_name, cmd.return_type
        ),
    }
}

fn render_enum(e: &Enum, registry: &Registry, form: OutputForm) -> String {
    let doc = render_doc(e.doc.as_deref(), registry, e.property.as_ref());
    match form {
        OutputForm::Header => {
            let define = format!("#define {} ", e.name);
            format!("{doc}{define:<ENUM_NAME_COLS$}{}", e.value)
        }
        OutputForm::Module => {
            let deprecated = e
                .deprecated
                .as_deref()
                .map(|m| format!("{} ", deprecated_attr(m)))
                .unwrap_or_default();
            format!("{doc}{deprecated}inline constexpr auto {} = {};", e.name, e.value)
        }
    }
}

fn render_typedef(t: &Typedef, registry: &Registry, form: OutputForm) -> String {
    let doc = render_doc(t.doc.as_deref(), registry, None);
    match form {
        OutputForm::Header => format!("{doc}{}", t.repr),
        OutputForm::Module => {
            let deprecated = t
                .deprecated
                .as_deref()
                .map(|m| format!(" {}", deprecated_attr(m)))
                .unwrap_or_default();
            format!("{doc}using {}{deprecated} = {};", t.name, t.ty)
        }
    }
}

fn render_verbatim(v: &Verbatim, registry: &Registry, form: OutputForm) -> Result<String, GenError> {
    let doc = render_doc(v.doc.as_deref(), registry, None);
    if form == OutputForm::Module && v.is_funcpointer() {
        return Ok(format!("{doc}{}", funcpointer_alias(&v.name, &v.repr)?));
    }
    Ok(format!("{doc}{}", v.repr))
}

/// Re-express `typedef RET (CC *NAME)(PARAMS) QUALS;` as
/// `using NAME = auto (CC *)(PARAMS) QUALS -> RET;`.
fn funcpointer_alias(name: &str, repr: &str) -> Result<String, GenError> {
    let malformed = || GenError::MalformedFunctionPointer {
        name: name.to_string(),
        text: repr.to_string(),
    };

    let at = find_token(repr, name).ok_or_else(malformed)?;
    let (before, after) = (&repr[..at], &repr[at + name.len()..]);

    let before = before.trim().strip_prefix("typedef").ok_or_else(malformed)?;
    let open = before.rfind('(').ok_or_else(malformed)?;
    let ret = before[..open].trim();
    let conv = before[open + 1..]
        .trim()
        .strip_suffix('*')
        .ok_or_else(malformed)?
        .trim();
    if ret.is_empty() {
        return Err(malformed());
    }

    let rest = after
        .trim_start()
        .strip_prefix(')')
        .ok_or_else(malformed)?
        .trim_start();
    let close = matching_paren(rest).ok_or_else(malformed)?;
    let params = &rest[..=close];
    let quals = rest[close + 1..].trim();
    let quals = quals.strip_suffix(';').ok_or_else(malformed)?.trim();

    let conv = if conv.is_empty() {
        String::new()
    } else {
        format!("{conv} ")
    };
    let quals = if quals.is_empty() {
        String::new()
    } else {
        format!(" {quals}")
    };
    Ok(format!("using {name} = auto ({conv}*){params}{quals} -> {ret};"))
}

/// Byte offset of `token` in `text` where it is not part of a longer identifier.
fn find_token(text: &str, token: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    text.match_indices(token).map(|(i, _)| i).find(|&i| {
        let before_ok = text[..i].chars().next_back().is_none_or(|c| !is_ident(c));
        let after_ok = text[i + token.len()..].chars().next().is_none_or(|c| !is_ident(c));
        before_ok && after_ok
    })
}

/// Index of the `)` closing the `(` that `s` starts with.
fn matching_paren(s: &str) -> Option<usize> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
