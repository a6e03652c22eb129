//! Typed records for everything a registry declares.
//!
//! The model is pure data. Parsing lives in [`crate::registry`] and all text
//! generation lives in [`crate::render`].
//!
//! ```text
//! Registry
//! ├── apis:   IndexMap<name, Declaration>   (commands, enums, types, includes)
//! ├── sets:   IndexMap<name, ApiSet>        (<feature> and <extension>)
//! └── groups: IndexMap<name, Vec<enum>>     (enum group membership)
//! ```

// ============================================================================
// DECLARATIONS
// ============================================================================

/// One API declaration.
///
/// C guarantees commands, enums and types never share an identifier, so all
/// of them live in a single name-keyed table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    Command(Command),
    Enum(Enum),
    Typedef(Typedef),
    Verbatim(Verbatim),
    Include(Include),
}

impl Declaration {
    /// The name this declaration is registered under.
    pub fn name(&self) -> &str {
        match self {
            Self::Command(c) => &c.name,
            Self::Enum(e) => &e.name,
            Self::Typedef(t) => &t.name,
            Self::Verbatim(v) => &v.name,
            Self::Include(i) => &i.name,
        }
    }

    /// Whether this is a `<command>`.
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    /// Documentation lines, if any.
    pub fn doc(&self) -> Option<&[String]> {
        match self {
            Self::Command(c) => c.doc.as_deref(),
            Self::Enum(e) => e.doc.as_deref(),
            Self::Typedef(t) => t.doc.as_deref(),
            Self::Verbatim(v) => v.doc.as_deref(),
            Self::Include(_) => None,
        }
    }

    /// Deprecation message, if deprecated.
    pub fn deprecated(&self) -> Option<&str> {
        match self {
            Self::Command(c) => c.deprecated.as_deref(),
            Self::Enum(e) => e.deprecated.as_deref(),
            Self::Typedef(t) => t.deprecated.as_deref(),
            Self::Verbatim(v) => v.deprecated.as_deref(),
            Self::Include(_) => None,
        }
    }
}

/// A command parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    /// The C type, e.g. `const ALfloat *`.
    pub ty: String,
    pub name: String,
    /// Type and name together, as written in the registry.
    pub repr: String,
}

/// A `<command>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    /// Namespace prefix of the owning `<commands>` block, e.g. `AL` or `ALC`.
    pub namespace: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    /// Preferred name of the function pointer typedef.
    pub pfn_name: String,
    /// API family for which this command is a linkable native export.
    pub export: Option<String>,
    /// Carries the no-throw qualifier.
    pub noexcept: bool,
    pub doc: Option<Vec<String>>,
    pub deprecated: Option<String>,
}

/// Property metadata for enums naming a property of an object class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Property {
    /// The class the property lives on, e.g. `source`.
    pub on: Option<String>,
    /// Value type, e.g. `ALfloat` or `ALint,ALint,ALint`.
    pub ty: Option<String>,
    /// Numeric range (`0.0..=1.0`) or enum group / value list.
    pub range: Option<String>,
    pub default: Option<String>,
    /// For handle-typed properties, the class of the stored handle.
    pub value_class: Option<String>,
}

/// An `<enum>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    /// Right-hand side of the `#define`, verbatim.
    pub value: String,
    pub property: Option<Property>,
    pub groups: Vec<String>,
    pub doc: Option<Vec<String>>,
    pub deprecated: Option<String>,
}

/// A `<type category="basetype">`, i.e. a C typedef.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typedef {
    /// Left-hand side of the typedef.
    pub ty: String,
    pub name: String,
    pub repr: String,
    pub doc: Option<Vec<String>>,
    pub deprecated: Option<String>,
}

/// Any other `<type>`: verbatim C code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verbatim {
    pub name: String,
    /// The `category` attribute, e.g. `funcpointer` or `define`.
    pub category: Option<String>,
    pub repr: String,
    pub doc: Option<Vec<String>>,
    pub deprecated: Option<String>,
}

impl Verbatim {
    pub fn is_funcpointer(&self) -> bool {
        self.category.as_deref() == Some("funcpointer")
    }
}

/// A `<type category="include">`: the header inside `#include <...>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub name: String,
}

// ============================================================================
// API SETS
// ============================================================================

/// One `<require>` block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Referenced declaration names, in document order.
    pub names: Vec<String>,
    pub comment: Option<String>,
    /// Only emitted into outputs targeting this API family.
    pub api: Option<String>,
}

impl Requirement {
    /// Whether this requirement applies to an output targeting `apis`.
    pub fn applies_to(&self, apis: &[String]) -> bool {
        match &self.api {
            Some(api) => apis.iter().any(|a| a == api),
            None => true,
        }
    }
}

/// A `<feature>` or an `<extension>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSet {
    pub is_feature: bool,
    pub name: String,
    /// API families this set is supported on. Features carry exactly one.
    pub api: Vec<String>,
    pub require: Vec<Requirement>,
    /// Satellite file base name this set is extracted into.
    pub annex: Option<String>,
    pub doc: Option<Vec<String>>,
}

impl ApiSet {
    /// Whether this set is supported on any of `apis`.
    pub fn supports_any(&self, apis: &[String]) -> bool {
        self.api.iter().any(|a| apis.contains(a))
    }

    /// Every referenced name across all requirements, in order.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.require
            .iter()
            .flat_map(|r| r.names.iter().map(String::as_str))
    }
}
