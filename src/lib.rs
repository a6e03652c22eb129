//! # registry-headergen
//!
//! Parses a Khronos-style XML API registry and generates C headers (and C++
//! module interface units) from it, reproducing a hand-maintained header's
//! layout exactly.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! generate  → runs a Config: loads registries, stages and commits files
//!   ↓
//! config    → YAML description of the outputs of a run
//!   ↓
//! render    → doc comments, declarations, API sets, file templates
//!   ↓
//! registry  → XML tree, parser, lookup tables, "already written" state
//!   ↓
//! model     → Declaration, ApiSet, Requirement
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use headergen::{Config, FsSink, Generator};
//!
//! let config = Config::load("registry/scripts/headers.yaml".as_ref())?;
//! Generator::new("2025-01-01 00:00:00+00:00").run(&config, &mut FsSink)?;
//! ```

// ============================================================================
// MODULES (dependency order: model → registry → render → config → generate)
// ============================================================================

/// Typed declarations and API sets
pub mod model;

/// Registry parsing and lookup tables
pub mod registry;

/// Text generation
pub mod render;

/// Generated file destinations
pub mod output;

/// Run configuration
pub mod config;

/// End-to-end driver
pub mod generate;

mod error;

pub use config::{Config, ConfigEntry, OutputSpec};
pub use error::GenError;
pub use generate::{Generator, select_sets};
pub use model::{ApiSet, Command, Declaration, Enum, Include, Parameter, Property, Requirement, Typedef, Verbatim};
pub use output::{FsSink, MemorySink, OutputSink};
pub use registry::Registry;
pub use render::{Boilerplate, OutputForm, OutputTarget, SetRenderer, render_declaration, render_doc};
