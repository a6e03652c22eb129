#![allow(clippy::unwrap_used)]


use super::{OutputForm, OutputTarget};
use crate::registry::Registry;

const FIXTURE: &str = include_str!("../../../tests/fixtures/al.xml");

fn fixture() -> Registry {
    Registry::parse(FIXTURE).unwrap()
}

fn header(apis: &[&str]) -> OutputTarget {
    OutputTarget::new(
        "include/AL/al.h",
        apis.iter().map(|a| a.to_string()).collect(),
        OutputForm::Header,
    )
}

fn module(apis: &[&str]) -> OutputTarget {
    OutputTarget::new(
        "modules/openal.cppm",
        apis.iter().map(|a| a.to_string()).collect(),
        OutputForm::Module,
    )
}

fn strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

// ============================================================================
// OUTPUT TARGET
// ============================================================================

#[test]
fn test_target_names() {
    let target = header(&["al"]);
    assert_eq!(target.file_name(), "al.h");
    assert_eq!(target.module_name, "al");
    assert!(target.targets("al"));
    assert!(!target.targets("alc"));
    assert!(target.is_annex("al"));
    assert!(!target.is_annex("efx"));
    assert_eq!(target.annex_path("efx"), std::path::Path::new("include/AL/efx.h"));
}

#[test]
fn test_module_target_names() {
    let target = module(&["al"]).with_module_name("openal.core");
    assert_eq!(target.module_name, "openal.core");
    assert_eq!(target.annex_path("efx"), std::path::Path::new("modules/efx.cppm"));
}
