//! The parsed registry and its lookup tables.
//!
//! A [`Registry`] is built once per XML source and then shared by every
//! output generated from that source. Besides the read-only tables it owns
//! the "already written" map, which lets a declaration referenced by several
//! API sets (an extension later promoted into a feature, say) be emitted live
//! only once per generation group.

mod parse;
pub mod xml;


use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::GenError;
use crate::model::{ApiSet, Declaration};

pub use parse::doc_from_element;

/// Parsed contents of one registry document.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// Declarations by name.
    pub apis: IndexMap<String, Declaration>,
    /// `<feature>`s and `<extension>`s by name, features first.
    pub sets: IndexMap<String, ApiSet>,
    /// Enum group name to member enum names, in first-seen order.
    pub groups: IndexMap<String, Vec<String>>,
    /// Widest command return type per namespace, for aligning pointer typedefs.
    return_widths: HashMap<String, usize>,
    /// Declaration name to the set that last recorded it as written.
    written: HashMap<String, String>,
}

impl Registry {
    /// Parse a registry document.
    pub fn parse(input: &str) -> Result<Self, GenError> {
        let root = xml::parse_document(input)?;
        Ok(parse::RegistryBuilder::default().build(&root))
    }

    /// Look up a declaration.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.apis.get(name)
    }

    /// Look up an API set.
    pub fn set(&self, name: &str) -> Option<&ApiSet> {
        self.sets.get(name)
    }

    /// Members of an enum group.
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Column width pointer typedef return types are padded to.
    pub fn return_width(&self, namespace: &str) -> usize {
        self.return_widths.get(namespace).copied().unwrap_or(0)
    }

    /// The set that already wrote `name`, if any.
    pub fn written_by(&self, name: &str) -> Option<&str> {
        self.written.get(name).map(String::as_str)
    }

    /// Record every name referenced by `set` as written by it.
    pub fn mark_written(&mut self, set: &ApiSet) {
        for name in set.referenced_names() {
            self.written.insert(name.to_string(), set.name.clone());
        }
    }

    /// Forget everything recorded as written, so a new, unrelated output
    /// group can emit any declaration live again.
    pub fn reset_written(&mut self) {
        debug!("Resetting written state ({} entries)", self.written.len());
        self.written.clear();
    }

    /// Insert a declaration, replacing (and warning about) any previous one.
    pub fn insert_api(&mut self, decl: Declaration) {
        let name = decl.name().to_string();
        if let Declaration::Command(c) = &decl {
            let width = self.return_widths.entry(c.namespace.clone()).or_default();
            *width = (*width).max(c.return_type.len());
        }
        if self.apis.insert(name.clone(), decl).is_some() {
            warn!("Redefinition of {name}; the later definition wins");
        }
    }

    /// Insert an API set, replacing (and warning about) any previous one.
    pub fn insert_set(&mut self, set: ApiSet) {
        let name = set.name.clone();
        if self.sets.insert(name.clone(), set).is_some() {
            warn!("Redefinition of API set {name}; the later definition wins");
        }
    }

    /// Append `member` to `group`, creating the group on first use.
    pub fn add_to_group(&mut self, group: &str, member: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(member.to_string());
    }
}
