//! Configuration parsing.

use std::path::{Path, PathBuf};

use headergen::{Config, ConfigEntry, GenError, OutputSpec};
use rstest::rstest;

const FULL: &str = r##"
license: "/* MIT */"
guard_prefix: OPENAL
generator: headergen
outputs:
  - kind: header
    path: include/AL/al.h
    registry: xml/al.xml
    apis: [al]
    platform_prefix: AL
    preamble: "#include <stddef.h>\n"
  - kind: reset
    registry: xml/al.xml
  - kind: module
    path: modules/openal.cppm
    registry: xml/al.xml
    apis: [al, alc]
    include: [AL_VERSION_1_0]
    exclude: [AL_EXT_gain_again]
    module_name: openal
  - kind: header
    path: include/AL/efx.h
    registry: /abs/efx.xml
    apis: [al]
    extensions: true
"##;

fn spec(entry: &ConfigEntry) -> &OutputSpec {
    entry.output().map(|(spec, _)| spec).unwrap()
}

#[test]
fn test_full_config() {
    let config = Config::from_yaml(FULL).unwrap();
    assert_eq!(config.license, "/* MIT */");
    assert_eq!(config.guard_prefix, "OPENAL");
    assert_eq!(config.generator, "headergen");
    assert_eq!(config.outputs.len(), 4);

    assert!(matches!(&config.outputs[0], ConfigEntry::Header(_)));
    assert_eq!(
        config.outputs[1],
        ConfigEntry::Reset {
            registry: PathBuf::from("xml/al.xml")
        }
    );
    assert!(matches!(&config.outputs[2], ConfigEntry::Module(_)));

    let module = spec(&config.outputs[2]);
    assert_eq!(module.apis, ["al", "alc"]);
    assert_eq!(module.include.as_deref(), Some(&["AL_VERSION_1_0".to_string()][..]));
    assert_eq!(module.exclude, ["AL_EXT_gain_again"]);
    assert_eq!(module.module_name.as_deref(), Some("openal"));
    assert!(!module.extensions);

    assert!(spec(&config.outputs[3]).extensions);
}

#[test]
fn test_defaults() {
    let config = Config::from_yaml(
        "outputs:\n  - kind: header\n    path: al.h\n    registry: al.xml\n    apis: [al]\n",
    )
    .unwrap();
    assert_eq!(config.license, "");
    assert_eq!(config.guard_prefix, "AL");
    assert_eq!(config.generator, "genheaders.py");

    let header = spec(&config.outputs[0]);
    assert_eq!(header.include, None);
    assert!(header.exclude.is_empty());
    assert_eq!(header.preamble_text(), "");
}

#[test]
fn test_preamble_text_puts_platform_macros_first() {
    let config = Config::from_yaml(FULL).unwrap();
    let text = spec(&config.outputs[0]).preamble_text();
    assert!(text.starts_with("#ifdef __cplusplus\n"));
    assert!(text.ends_with("#endif\n\n#include <stddef.h>\n"));
}

#[rstest]
#[case("outputs:\n  - kind: header\n    path: al.h\n    registry: al.xml\n    apis: []\n")]
#[case("outputs:\n  - kind: header\n    path: al.h\n    registry: al.xml\n")]
#[case("outputs:\n  - kind: library\n    path: al.h\n")]
#[case("outputs: [")]
fn test_invalid_config(#[case] yaml: &str) {
    assert!(matches!(Config::from_yaml(yaml), Err(GenError::Config(_))));
}

#[test]
fn test_registries_are_distinct_in_first_use_order() {
    let config = Config::from_yaml(FULL).unwrap();
    let registries: Vec<&Path> = config.registries().into_iter().collect();
    assert_eq!(registries, [Path::new("xml/al.xml"), Path::new("/abs/efx.xml")]);
}

#[test]
fn test_rebase_only_touches_relative_paths() {
    let mut config = Config::from_yaml(FULL).unwrap();
    config.rebase(Path::new("/work/scripts"));

    let header = spec(&config.outputs[0]);
    assert_eq!(header.path, Path::new("/work/scripts/include/AL/al.h"));
    assert_eq!(header.registry, Path::new("/work/scripts/xml/al.xml"));
    assert_eq!(
        config.outputs[1],
        ConfigEntry::Reset {
            registry: PathBuf::from("/work/scripts/xml/al.xml")
        }
    );
    assert_eq!(spec(&config.outputs[3]).registry, Path::new("/abs/efx.xml"));
}

#[test]
fn test_load_resolves_against_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("headers.yaml");
    std::fs::write(&path, FULL).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(spec(&config.outputs[0]).path, dir.path().join("include/AL/al.h"));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.yaml");
    assert!(matches!(Config::load(&path), Err(GenError::Io { .. })));
}
