//! Documentation comments.
//!
//! Enum property metadata is laid out as labelled lines whose values share
//! one column:
//!
//! ```text
//! /**
//!  * Source gain.
//!  * Type:    ALfloat
//!  * Range:   [0.0 - ]
//!  * Default: 1.0
//!  */
//! ```

use crate::model::Property;
use crate::registry::Registry;

/// Max columns a doc comment line can take up, excluding the ` * `.
pub const DOC_MAX_COLS: usize = 80 - 3;

const TYPE_LABEL: &str = "Type: ";
const RANGE_LABEL: &str = "Range: ";
const DEFAULT_LABEL: &str = "Default: ";

/// Render documentation lines (plus optional property metadata) as a C
/// comment, including the trailing newline. Absent or empty documentation
/// renders as an empty string.
pub fn render_doc(doc: Option<&[String]>, registry: &Registry, property: Option<&Property>) -> String {
    let Some(doc) = doc.filter(|d| !d.is_empty()) else {
        return String::new();
    };

    // A headline from the `comment` attribute is followed by a blank line
    // before the `<comment>` body. The headline goes above the property
    // block and the body below it.
    let extended = doc.len() > 2 && doc[1].trim().is_empty();

    let mut lines = vec![doc[0].clone()];
    if !extended && doc.len() > 1 {
        lines.extend(doc[1..].iter().cloned());
        if property.is_some() {
            lines.push(String::new());
        }
    }
    if let Some(property) = property {
        lines.extend(property_lines(property, registry));
    }
    if extended {
        lines.extend(doc[1..].iter().cloned());
    }

    comment_block(&lines)
}

fn comment_block(lines: &[String]) -> String {
    match lines {
        [] => String::new(),
        [line] => format!("/** {line} */\n"),
        _ => {
            let mut out = String::from("/**\n");
            for line in lines {
                out.push_str(format!(" * {line}").trim_end_matches(' '));
                out.push('\n');
            }
            out.push_str(" */\n");
            out
        }
    }
}

fn property_lines(property: &Property, registry: &Registry) -> Vec<String> {
    let cols = if property.default.is_some() {
        DEFAULT_LABEL.len()
    } else if property.range.is_some() || property.value_class.is_some() {
        RANGE_LABEL.len()
    } else {
        TYPE_LABEL.len()
    };

    let mut lines = Vec::new();
    if let Some(ty) = &property.ty {
        lines.push(format!("{TYPE_LABEL:<cols$}{}", ty.replace(',', ", ")));
    }
    if let Some(range) = &property.range {
        lines.extend(range_lines(range, cols, registry));
    }
    if let Some(class) = &property.value_class {
        lines.push(format!("{RANGE_LABEL:<cols$}any valid {} ID", title_case(class)));
    }
    if let Some(default) = &property.default {
        let default = if default.contains(',') {
            format!("{{{}}}", default.replace(',', ", "))
        } else {
            default.clone()
        };
        lines.push(format!("{DEFAULT_LABEL:<cols$}{default}"));
    }
    lines
}

fn range_lines(range: &str, cols: usize, registry: &Registry) -> Vec<String> {
    if let Some((lower, upper)) = range.split_once("..") {
        return vec![numeric_range(lower, upper, cols)];
    }

    let values: Vec<&str> = range
        .split(',')
        .map(str::trim)
        .flat_map(|v| match registry.group(v) {
            Some(members) => members.iter().map(String::as_str).collect(),
            None => vec![v],
        })
        .collect();

    let mut lines = Vec::new();
    let mut line = format!("{RANGE_LABEL:<cols$}");
    if values.len() > 1 {
        line.push('[');
    }
    for (i, value) in values.iter().enumerate() {
        if i == 0 {
            line.push_str(value);
        } else if line.len() + 2 + value.len() + 1 > DOC_MAX_COLS {
            line.push(',');
            lines.push(line);
            line = format!("{}{value}", " ".repeat(cols + 1));
        } else {
            line.push_str(", ");
            line.push_str(value);
        }
    }
    if values.len() > 1 {
        line.push(']');
    }
    lines.push(line);
    lines
}

/// `lo..hi` is exclusive of `hi`, `lo..=hi` inclusive; either bound may be
/// left open.
fn numeric_range(lower: &str, upper: &str, cols: usize) -> String {
    let lower = lower.trim();
    let upper = upper.trim();
    let upper = match upper.strip_prefix('=') {
        Some(inclusive) => inclusive.trim().to_string(),
        None if upper.is_empty() => String::new(),
        None => format!("<{upper}"),
    };
    format!("{RANGE_LABEL:<cols$}[{lower} - {upper}]")
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
