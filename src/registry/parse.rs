//! Registry document to [`Registry`] tables.
//!
//! Parsing is best-effort: an element missing something it needs (a name,
//! a value, a `<proto>`) is skipped with a warning and the rest of the
//! document is still processed.

use tracing::{debug, warn};

use super::Registry;
use super::xml::XmlElement;
use crate::model::{
    ApiSet, Command, Declaration, Enum, Include, Parameter, Property, Requirement, Typedef,
    Verbatim,
};

/// Namespace for `<commands>` blocks that don't declare one.
pub const DEFAULT_NAMESPACE: &str = "AL";

/// Documentation never counts as code text.
fn is_code(e: &XmlElement) -> bool {
    e.tag != "comment" && e.tag != "property"
}

/// Code text with the `<name>` element cut out.
fn is_code_around_name(e: &XmlElement) -> bool {
    is_code(e) && e.tag != "name"
}

/// Documentation lines of an element.
///
/// The `comment` attribute gives a short first line; a nested `<comment>`
/// element gives longer free text. When both exist a blank line separates
/// them. Returns `None` when neither exists.
pub fn doc_from_element(element: &XmlElement) -> Option<Vec<String>> {
    let top_doc = element.attr("comment");
    let rest_of_doc = element.child("comment");
    if top_doc.is_none() && rest_of_doc.is_none() {
        return None;
    }

    let mut lines = Vec::new();
    if let Some(top) = top_doc {
        lines.push(top.to_string());
        if rest_of_doc.is_some() {
            lines.push(String::new());
        }
    }
    if let Some(rest) = rest_of_doc {
        let text = rest.inner_text(&|_| true);
        lines.extend(text.trim().lines().map(|l| l.trim().to_string()));
    }
    Some(lines)
}

fn owned_attr(element: &XmlElement, key: &str) -> Option<String> {
    element.attr(key).map(str::to_string)
}

/// Builds a [`Registry`] from a parsed document root.
#[derive(Default)]
pub(super) struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub(super) fn build(mut self, root: &XmlElement) -> Registry {
        self.collect_groups(root);
        self.collect_types(root);
        self.collect_commands(root);
        self.collect_enums(root);
        self.collect_sets(root);
        debug!(
            "Parsed registry: {} declarations, {} API sets, {} groups",
            self.registry.apis.len(),
            self.registry.sets.len(),
            self.registry.groups.len()
        );
        self.registry
    }

    fn collect_groups(&mut self, root: &XmlElement) {
        for enum_el in root.find_all("enums", "enum") {
            let Some(name) = enum_el.attr("name") else {
                continue;
            };
            for group in enum_el.attr("group").unwrap_or_default().split(',') {
                let group = group.trim();
                if group.is_empty() {
                    continue;
                }
                self.registry.add_to_group(group, name);
            }
        }
    }

    fn collect_types(&mut self, root: &XmlElement) {
        for type_el in root.find_all("types", "type") {
            let name = type_el
                .attr("name")
                .map(str::to_string)
                .or_else(|| type_el.child("name").map(|n| n.inner_text(&|_| true)))
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
            let Some(name) = name else {
                warn!("Skipping <type> without a name");
                continue;
            };

            let category = type_el.attr("category");
            let decl = match category {
                Some("include") => Declaration::Include(Include { name }),
                Some("basetype") => {
                    let lhs = type_el.inner_text(&is_code_around_name);
                    let lhs = lhs.trim();
                    let lhs = lhs.strip_prefix("typedef").unwrap_or(lhs).trim();
                    Declaration::Typedef(Typedef {
                        ty: lhs.to_string(),
                        name,
                        repr: type_el.inner_text(&is_code).trim().to_string(),
                        doc: doc_from_element(type_el),
                        deprecated: owned_attr(type_el, "deprecated"),
                    })
                }
                _ => Declaration::Verbatim(Verbatim {
                    name,
                    category: category.map(str::to_string),
                    repr: type_el.inner_text(&is_code).trim().to_string(),
                    doc: doc_from_element(type_el),
                    deprecated: owned_attr(type_el, "deprecated"),
                }),
            };
            self.registry.insert_api(decl);
        }
    }

    fn collect_commands(&mut self, root: &XmlElement) {
        for commands in root.descendants_named("commands") {
            let namespace = commands.attr("namespace").unwrap_or(DEFAULT_NAMESPACE);
            for command in commands.descendants_named("command") {
                if let Some(cmd) = parse_command(command, namespace) {
                    self.registry.insert_api(Declaration::Command(cmd));
                }
            }
        }
    }

    fn collect_enums(&mut self, root: &XmlElement) {
        for enum_el in root.find_all("enums", "enum") {
            let (Some(name), Some(value)) = (enum_el.attr("name"), enum_el.attr("value")) else {
                warn!(
                    "Skipping <enum> {} without a name or value",
                    enum_el.attr("name").unwrap_or("<unnamed>")
                );
                continue;
            };

            let property = enum_el.child("property").map(|p| Property {
                on: owned_attr(p, "on"),
                ty: owned_attr(p, "type"),
                range: owned_attr(p, "group").or_else(|| owned_attr(p, "range")),
                default: owned_attr(p, "default"),
                value_class: owned_attr(p, "class"),
            });

            let groups = enum_el
                .attr("group")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect();

            self.registry.insert_api(Declaration::Enum(Enum {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
                property,
                groups,
                doc: doc_from_element(enum_el),
                deprecated: owned_attr(enum_el, "deprecated"),
            }));
        }
    }

    fn collect_sets(&mut self, root: &XmlElement) {
        let features = root.descendants_named("feature");
        let extensions = root.find_all("extensions", "extension");
        for set_el in features.into_iter().chain(extensions) {
            if let Some(set) = parse_api_set(set_el) {
                self.registry.insert_set(set);
            }
        }
    }
}

fn parse_command(command: &XmlElement, namespace: &str) -> Option<Command> {
    let Some(proto) = command.child("proto") else {
        warn!("Skipping <command> without a <proto>");
        return None;
    };
    let Some(name_el) = proto.child("name") else {
        warn!("Skipping <command> without a <name>");
        return None;
    };
    let name = name_el.inner_text(&|_| true).trim().to_string();

    let mut parameters = Vec::new();
    for param in command.children_named("param") {
        let Some(param_name) = param.child("name") else {
            warn!("Skipping {name}: a <param> has no <name>");
            return None;
        };
        parameters.push(Parameter {
            ty: param.inner_text(&is_code_around_name).trim().to_string(),
            name: param_name.inner_text(&|_| true).trim().to_string(),
            repr: param.inner_text(&is_code).trim().to_string(),
        });
    }

    Some(Command {
        return_type: proto.inner_text(&is_code_around_name).trim().to_string(),
        pfn_name: command
            .attr("funcpointer")
            .map(str::to_string)
            .unwrap_or_else(|| format!("LP{}", name.to_uppercase())),
        namespace: namespace.to_string(),
        parameters,
        export: owned_attr(command, "export"),
        noexcept: command.attr("except") == Some("no"),
        doc: doc_from_element(command),
        deprecated: owned_attr(command, "deprecated"),
        name,
    })
}

fn parse_api_set(set_el: &XmlElement) -> Option<ApiSet> {
    let is_feature = set_el.tag == "feature";
    let Some(name) = set_el.attr("name") else {
        warn!("Skipping <{}> without a name", set_el.tag);
        return None;
    };

    let api = if is_feature {
        set_el.attr("api").map(|a| vec![a.to_string()])
    } else {
        set_el
            .attr("supported")
            .map(|s| s.split('|').map(str::to_string).collect())
    };
    let Some(api) = api else {
        warn!("Skipping {name}: no API family declared");
        return None;
    };

    let require = set_el
        .children_named("require")
        .map(|req| Requirement {
            names: req
                .children
                .iter()
                .filter_map(|c| c.attr("name"))
                .map(str::to_string)
                .collect(),
            comment: owned_attr(req, "comment"),
            api: owned_attr(req, "api"),
        })
        .collect();

    Some(ApiSet {
        is_feature,
        name: name.to_string(),
        api,
        require,
        annex: owned_attr(set_el, "annex"),
        doc: doc_from_element(set_el),
    })
}
