//! End-to-end generation through `Generator::run`.

use std::path::{Path, PathBuf};

use headergen::{FsSink, GenError, Generator, MemorySink};
use rstest::rstest;

use crate::helpers::{REGISTRY, TIMESTAMP, config, generate, generator, header_entry};

fn paths(sink: &MemorySink) -> Vec<PathBuf> {
    sink.paths().map(Path::to_path_buf).collect()
}

fn two_headers(separator: &str) -> String {
    format!(
        "outputs:\n{}{separator}{}    extensions: true\n",
        header_entry("include/AL/al.h", "al"),
        header_entry("include/AL/alext.h", "al"),
    )
}

// ============================================================================
// Selection and layout
// ============================================================================

#[test]
fn test_feature_header() {
    let sink = generate(&format!(
        "outputs:\n{}    platform_prefix: AL\n",
        header_entry("include/AL/al.h", "al")
    ));
    assert_eq!(paths(&sink), [PathBuf::from("include/AL/al.h")]);

    let text = sink.get("include/AL/al.h").unwrap();
    assert!(text.starts_with("#ifndef AL_AL_H\n#define AL_AL_H\n"));
    assert!(text.contains(&format!("Last regenerated: {TIMESTAMP}\n")));
    assert!(text.contains("modify the API in al.xml and regenerate using genheaders.py."));
    assert!(text.contains("#define AL_API_NOEXCEPT noexcept\n"));
    assert!(text.contains("#ifndef AL_VERSION_1_0\n"));
    assert!(!text.contains("ALC_VERSION_1_0"));
    assert!(!text.contains("AL_SOFT_events"));
    assert!(text.ends_with("#endif /* AL_AL_H */\n"));
}

#[test]
fn test_extension_header_extracts_annex() {
    let sink = generate(&two_headers(""));
    assert_eq!(
        paths(&sink),
        [
            PathBuf::from("include/AL/al.h"),
            PathBuf::from("include/AL/efx.h"),
            PathBuf::from("include/AL/alext.h"),
        ]
    );

    let alext = sink.get("include/AL/alext.h").unwrap();
    assert!(alext.contains("#ifndef AL_SOFT_events\n"));
    assert!(alext.contains("#include \"efx.h\"\n"));
    assert!(!alext.contains("alGenEffects"));

    let efx = sink.get("include/AL/efx.h").unwrap();
    assert!(efx.contains("#ifndef AL_EFX_H\n"));
    assert!(efx.contains("alGenEffects"));
}

#[test]
fn test_explicit_include_list_keeps_its_order() {
    let sink = generate(&format!(
        "outputs:\n{}    include: [AL_EXT_gain_again, AL_VERSION_1_0]\n",
        header_entry("out.h", "al")
    ));
    let text = sink.get("out.h").unwrap();
    let extension = text.find("#ifndef AL_EXT_gain_again").unwrap();
    let feature = text.find("#ifndef AL_VERSION_1_0").unwrap();
    assert!(extension < feature);
}

#[test]
fn test_exclude() {
    let sink = generate(&format!(
        "outputs:\n{}    extensions: true\n    exclude: [AL_SOFT_events]\n",
        header_entry("include/AL/alext.h", "al")
    ));
    let text = sink.get("include/AL/alext.h").unwrap();
    assert!(!text.contains("AL_SOFT_events"));
    assert!(text.contains("#ifndef AL_EXT_gain_again\n"));
}

#[test]
fn test_module_output() {
    let sink = generate(&format!(
        "outputs:\n  - kind: module\n    path: modules/openal.cppm\n    registry: {}\n    apis: [al, alc]\n    module_name: openal\n",
        crate::helpers::REGISTRY_PATH
    ));
    assert_eq!(paths(&sink), [PathBuf::from("modules/openal.cppm")]);
    let text = sink.get("modules/openal.cppm").unwrap();
    assert!(text.contains("\nmodule;\n"));
    assert!(text.contains("export module openal;\n"));
    assert!(text.contains("inline constexpr auto AL_NONE = 0;\n"));
    assert!(text.contains("using LPALCSETTHREADCONTEXT = auto (ALC_APIENTRY *)(ALCcontext *context) ALC_API_NOEXCEPT17 -> ALCboolean;"));
    assert!(!text.contains("#ifndef AL_VERSION_1_0"));
    assert!(!text.contains("#ifndef ALC_VERSION_1_0"));
}

#[test]
fn test_module_with_annex_uses_partitions() {
    let sink = generate(&format!(
        "outputs:\n  - kind: module\n    path: modules/openal.cppm\n    registry: {}\n    apis: [al, alc]\n    module_name: openal\n    extensions: true\n",
        crate::helpers::REGISTRY_PATH
    ));
    assert_eq!(
        paths(&sink),
        [
            PathBuf::from("modules/efx.cppm"),
            PathBuf::from("modules/openal-core.cppm"),
            PathBuf::from("modules/openal.cppm"),
        ]
    );

    let primary = sink.get("modules/openal.cppm").unwrap();
    assert!(primary.ends_with("export module openal;\n\nexport import :core;\nexport import :efx;\n"));
    assert!(!primary.contains("extern \"C\""));

    let core = sink.get("modules/openal-core.cppm").unwrap();
    assert!(core.contains("export module openal:core;\n"));
    assert!(core.contains("inline constexpr auto AL_EVENT_TYPE_SOFT = 0x19A4;"));
    assert!(!core.contains("import :"));
    assert!(!core.contains("AL_METERS_PER_UNIT"));

    let efx = sink.get("modules/efx.cppm").unwrap();
    let module_at = efx.find("export module openal:efx;").unwrap();
    let import_at = efx.find("\nimport :core;\n").unwrap();
    let extern_at = efx.find("export extern \"C\" {").unwrap();
    assert!(module_at < import_at && import_at < extern_at);
    assert!(efx.contains("using LPALGENEFFECTS = auto (AL_APIENTRY *)(ALsizei n, ALuint *effects)"));
}

// ============================================================================
// Written state
// ============================================================================

#[rstest]
#[case("", true)]
#[case("  - kind: reset\n    registry: xml/al.xml\n", false)]
fn test_written_state_spans_outputs_until_reset(#[case] separator: &str, #[case] suppressed: bool) {
    let sink = generate(&two_headers(separator));
    let alext = sink.get("include/AL/alext.h").unwrap();
    assert_eq!(alext.contains("/* #define AL_GAIN "), suppressed);
    assert_eq!(alext.contains("\n#define AL_GAIN "), !suppressed);
}

#[test]
fn test_output_is_deterministic() {
    let yaml = two_headers("");
    let first = generate(&yaml);
    let second = generate(&yaml);
    assert_eq!(paths(&first), paths(&second));
    for path in first.paths() {
        assert_eq!(first.get(path), second.get(path), "{} differs", path.display());
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unknown_set_commits_nothing() {
    let yaml = format!(
        "outputs:\n{}{}    include: [AL_NOT_A_SET]\n",
        header_entry("include/AL/al.h", "al"),
        header_entry("include/AL/broken.h", "al"),
    );
    let mut sink = MemorySink::new();
    let result = generator().run(&config(&yaml), &mut sink);
    assert!(matches!(
        result,
        Err(GenError::UnknownApiSet { ref name, .. }) if name == "AL_NOT_A_SET"
    ));
    assert!(sink.is_empty());
}

#[test]
fn test_reset_of_unknown_registry() {
    let yaml = format!(
        "outputs:\n{}  - kind: reset\n    registry: xml/other.xml\n",
        header_entry("include/AL/al.h", "al")
    );
    let result = generator().run(&config(&yaml), &mut MemorySink::new());
    assert!(matches!(result, Err(GenError::UnknownRegistry(ref p)) if p == Path::new("xml/other.xml")));
}

#[test]
fn test_annex_colliding_with_earlier_output() {
    let yaml = format!(
        "outputs:\n{}{}    extensions: true\n",
        header_entry("include/AL/efx.h", "al"),
        header_entry("include/AL/alext.h", "al"),
    );
    let result = generator().run(&config(&yaml), &mut MemorySink::new());
    assert!(matches!(result, Err(GenError::AnnexCollision { ref annex, .. }) if annex == "efx"));
}

#[test]
fn test_missing_registry_file() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("missing.xml");
    let yaml = format!(
        "outputs:\n  - kind: header\n    path: {}\n    registry: {}\n    apis: [al]\n",
        dir.path().join("al.h").display(),
        registry.display()
    );
    let result = Generator::new(TIMESTAMP).run(&config(&yaml), &mut MemorySink::new());
    assert!(matches!(result, Err(GenError::Io { ref path, .. }) if *path == registry));
}

// ============================================================================
// On disk
// ============================================================================

#[test]
fn test_generate_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("xml")).unwrap();
    std::fs::write(dir.path().join("xml/al.xml"), REGISTRY).unwrap();
    let config_path = dir.path().join("headers.yaml");
    std::fs::write(&config_path, two_headers("")).unwrap();

    let config = headergen::Config::load(&config_path).unwrap();
    Generator::new(TIMESTAMP).run(&config, &mut FsSink).unwrap();

    for name in ["al.h", "alext.h", "efx.h"] {
        let path = dir.path().join("include/AL").join(name);
        assert!(path.is_file(), "{} was not written", path.display());
    }
    let al = std::fs::read_to_string(dir.path().join("include/AL/al.h")).unwrap();
    assert!(al.contains("#ifndef AL_VERSION_1_0\n"));
}
