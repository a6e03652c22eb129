//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use headergen::{Config, Generator, MemorySink, Registry};

/// Cut-down OpenAL registry.
pub const REGISTRY: &str = include_str!("../fixtures/al.xml");

/// Path the fixture registry is registered under.
pub const REGISTRY_PATH: &str = "xml/al.xml";

pub const TIMESTAMP: &str = "2025-01-01 00:00:00.000000+00:00";

/// A generator with the fixture registry already loaded.
pub fn generator() -> Generator {
    Generator::new(TIMESTAMP).with_registry(PathBuf::from(REGISTRY_PATH), fixture_registry())
}

pub fn fixture_registry() -> Registry {
    Registry::parse(REGISTRY).unwrap()
}

pub fn config(yaml: &str) -> Config {
    Config::from_yaml(yaml).unwrap()
}

/// Run `yaml` against the fixture registry and return what was written.
pub fn generate(yaml: &str) -> MemorySink {
    let mut sink = MemorySink::new();
    generator().run(&config(yaml), &mut sink).unwrap();
    sink
}

/// Header `path` targeting `apis` from the fixture registry.
pub fn header_entry(path: &str, apis: &str) -> String {
    format!(
        "  - kind: header\n    path: {path}\n    registry: {REGISTRY_PATH}\n    apis: [{apis}]\n"
    )
}
