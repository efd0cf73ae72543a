use gpx_rw_wasm::{WriteOptions, parse_gpx, write_gpx_with_options};
use std::path::Path;

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn rewrite(gpx: &str, opts: &WriteOptions) -> String {
    let data = parse_gpx(gpx).unwrap();
    write_gpx_with_options(&data, opts).unwrap()
}

/// Compare actual writer output against the expected snapshot file.
/// When `UPDATE_SNAPSHOTS=1` is set, write/overwrite the expected file instead.
fn assert_snapshot(actual: &str, expected_path: &str) {
    let path = format!("tests/fixtures/expected/{expected_path}");

    if matches!(std::env::var("UPDATE_SNAPSHOTS").as_deref(), Ok("1")) {
        let dir = Path::new(&path).parent().unwrap();
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(&path, format!("{actual}\n")).unwrap();
        eprintln!("Updated snapshot: {path}");
        return;
    }

    let expected = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Expected file not found: {path}. Run with UPDATE_SNAPSHOTS=1 to generate."));

    assert_eq!(
        actual,
        expected.trim_end(),
        "Snapshot mismatch for {path}.\nRun with UPDATE_SNAPSHOTS=1 to update."
    );
}

/// Rewrite a fixture with default options and compare against the expected snapshot.
fn assert_snapshot_default(fixture: &str, expected: &str) {
    let actual = rewrite(&load_fixture(fixture), &WriteOptions::default());
    assert_snapshot(&actual, expected);
}

// ---- basic/ ----

#[test]
fn snapshot_02_full_waypoint() {
    assert_snapshot_default("basic/02_full_waypoint.gpx", "basic/02_full_waypoint.gpx");
}

#[test]
fn snapshot_03_simple_route() {
    assert_snapshot_default("basic/03_simple_route.gpx", "basic/03_simple_route.gpx");
}

#[test]
fn snapshot_03_simple_route_legacy_layout() {
    let opts = WriteOptions {
        xml_declaration: false,
        legacy_layout: true,
    };
    let actual = rewrite(&load_fixture("basic/03_simple_route.gpx"), &opts);
    assert_snapshot(&actual, "basic/03_simple_route_legacy.gpx");
}

#[test]
fn snapshot_04_simple_track() {
    assert_snapshot_default("basic/04_simple_track.gpx", "basic/04_simple_track.gpx");
}

#[test]
fn snapshot_05_complete() {
    assert_snapshot_default("basic/05_complete.gpx", "basic/05_complete.gpx");
}
