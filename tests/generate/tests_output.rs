//! Output sinks.

use std::path::Path;

use headergen::{FsSink, MemorySink, OutputSink};

#[test]
fn test_memory_sink_keeps_first_write_order() {
    let mut sink = MemorySink::new();
    sink.write(Path::new("b.h"), "one").unwrap();
    sink.write(Path::new("a.h"), "two").unwrap();
    sink.write(Path::new("b.h"), "three").unwrap();

    let paths: Vec<&Path> = sink.paths().collect();
    assert_eq!(paths, [Path::new("b.h"), Path::new("a.h")]);
    assert_eq!(sink.get("b.h"), Some("three"));
    assert_eq!(sink.len(), 2);
}

#[test]
fn test_commit_replays_into_another_sink() {
    let mut staged = MemorySink::new();
    staged.write(Path::new("x/al.h"), "al").unwrap();
    staged.write(Path::new("x/efx.h"), "efx").unwrap();

    let mut target = MemorySink::new();
    staged.commit(&mut target).unwrap();
    assert_eq!(target.get("x/al.h"), Some("al"));
    assert_eq!(target.get("x/efx.h"), Some("efx"));
}

#[test]
fn test_fs_sink_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("include/AL/al.h");
    FsSink.write(&path, "#ifndef AL_AL_H\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "#ifndef AL_AL_H\n");

    FsSink.write(&path, "replaced\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "replaced\n");
}
