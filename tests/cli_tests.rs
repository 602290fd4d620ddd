//! CLI integration tests for the `cmx` binary.
//!
//! Each test runs in its own temp directory with HOME and XDG_CONFIG_HOME
//! pointed there, so no user configuration leaks in.

use std::path::{Path, PathBuf};
use std::process::Command;

use charmatrix::export::load_snapshot;
use charmatrix::models::Cell;
use tempfile::TempDir;

/// Path to the cmx binary built for this test run.
fn cmx_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmx"))
}

/// Run cmx in `dir` with the given arguments and return (stdout, stderr, exit code).
fn run_cmx(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(cmx_binary())
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cmx");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Create a blank snapshot with `cmx new`.
fn new_grid(dir: &TempDir, rows: usize, cols: usize) -> PathBuf {
    let path = dir.path().join("grid.json");
    let (_, stderr, code) = run_cmx(
        dir.path(),
        &["new", "grid.json", "--rows", &rows.to_string(), "--cols", &cols.to_string()],
    );
    assert_eq!(code, 0, "new failed: {}", stderr);
    path
}

#[test]
fn test_new_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cmx(dir.path(), &["new", "blank.json"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Wrote:"));

    let snapshot = load_snapshot(&dir.path().join("blank.json")).unwrap();
    assert_eq!((snapshot.rows, snapshot.cols), (15, 20));
    assert_eq!(snapshot.grid[14][19], Cell::blank());
}

#[test]
fn test_new_reads_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("charmatrix.toml"), "[grid]\nrows = 3\ncols = 4\ndefault_char = \".\"\n")
        .unwrap();
    let (_, _, code) = run_cmx(dir.path(), &["new", "g.json"]);
    assert_eq!(code, 0);

    let snapshot = load_snapshot(&dir.path().join("g.json")).unwrap();
    assert_eq!((snapshot.rows, snapshot.cols), (3, 4));
    assert_eq!(snapshot.grid[0][0].character, ".");
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("charmatrix.toml"), "[history]\ncapacity = 0\n").unwrap();
    let (_, stderr, code) = run_cmx(dir.path(), &["new", "g.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("history.capacity"));
}

#[test]
fn test_draw_shapes_and_show() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 4, 4);

    let (_, stderr, code) =
        run_cmx(dir.path(), &["draw", "grid.json", "line:0,0,3,3", "paint:0,3", "--char", "X"]);
    assert_eq!(code, 0, "draw failed: {}", stderr);

    let (stdout, _, code) = run_cmx(dir.path(), &["show", "grid.json"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "4x4\nX 0 0 X\n0 X 0 0\n0 0 X 0\n0 0 0 X\n");
}

#[test]
fn test_draw_undo_redo_in_one_session() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 3, 3);

    let (_, _, code) = run_cmx(
        dir.path(),
        &["draw", "grid.json", "rect:0,0,2,2", "resize:2x2", "undo", "undo", "redo", "-o", "out.json"],
    );
    assert_eq!(code, 0);

    let snapshot = load_snapshot(&dir.path().join("out.json")).unwrap();
    assert_eq!((snapshot.rows, snapshot.cols), (3, 3));
    assert!(snapshot.grid.iter().flatten().all(|c| c.character == "#"));
    assert_eq!(snapshot.grid[1][1].background_color, "#3498db");

    // Input left untouched when -o is given
    let original = load_snapshot(&dir.path().join("grid.json")).unwrap();
    assert_eq!(original.grid[0][0], Cell::blank());
}

#[test]
fn test_draw_lock_protects_cells() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 1, 3);
    run_cmx(dir.path(), &["draw", "grid.json", "paint:0,1", "--char", "@"]);

    let (_, _, code) =
        run_cmx(dir.path(), &["draw", "grid.json", "line:0,0,0,2", "--char", "-", "--lock", "@"]);
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cmx(dir.path(), &["show", "grid.json"]);
    assert_eq!(stdout, "1x3\n- @ -\n");
}

#[test]
fn test_draw_rejects_bad_op() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 2, 2);
    let (_, _, code) = run_cmx(dir.path(), &["draw", "grid.json", "paint:1"]);
    assert_eq!(code, 2);
}

#[test]
fn test_import_then_export_text_roundtrip() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("art.txt"), "A B .\nB\n\nC A A\n").unwrap();

    let (stdout, stderr, code) = run_cmx(dir.path(), &["import", "art.txt"]);
    assert_eq!(code, 0, "import failed: {}", stderr);
    assert!(stdout.contains("Imported:"));
    assert!(stdout.contains("(3x3, 3 tokens)"));

    let snapshot = load_snapshot(&dir.path().join("art.json")).unwrap();
    assert_eq!(snapshot.grid[0][0].background_color, "#3498db");
    assert_eq!(snapshot.grid[0][1].background_color, "#e74c3c");
    assert_eq!(snapshot.grid[2][0].background_color, "#2ecc71");

    let (_, _, code) = run_cmx(dir.path(), &["export", "art.json", "-o", "art_out.txt"]);
    assert_eq!(code, 0);
    let text = std::fs::read_to_string(dir.path().join("art_out.txt")).unwrap();
    assert_eq!(text, "A B 0\nB 0 0\nC A A\n");
}

#[test]
fn test_import_empty_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("empty.txt"), "\n   \n").unwrap();
    let (_, stderr, code) = run_cmx(dir.path(), &["import", "empty.txt"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no rows"));
    assert!(!dir.path().join("empty.json").exists());
}

#[test]
fn test_import_missing_file() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cmx(dir.path(), &["import", "nope.txt"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_export_png_dimensions() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 2, 3);

    let (_, stderr, code) =
        run_cmx(dir.path(), &["export", "grid.json", "-o", "grid.png", "--cell-size", "10", "--scale", "2"]);
    assert_eq!(code, 0, "export failed: {}", stderr);

    let image = image::open(dir.path().join("grid.png")).unwrap();
    assert_eq!((image.width(), image.height()), (60, 40));
}

#[test]
fn test_export_png_over_pixel_budget_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 15, 20);

    let (_, stderr, code) = run_cmx(
        dir.path(),
        &["export", "grid.json", "-o", "huge.png", "--cell-size", "512", "--scale", "64"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Image too large"), "stderr: {}", stderr);
    assert!(!dir.path().join("huge.png").exists());
}

#[test]
fn test_draw_far_off_rectangle_is_clipped() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 2, 2);

    let (_, stderr, code) = run_cmx(dir.path(), &["draw", "grid.json", "rect:0,0,100000,100000"]);
    assert_eq!(code, 0, "draw failed: {}", stderr);

    let (stdout, _, _) = run_cmx(dir.path(), &["show", "grid.json"]);
    assert_eq!(stdout, "2x2\n# #\n# #\n");
}

#[test]
fn test_draw_extreme_line_coordinates() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 1, 3);

    let (_, stderr, code) =
        run_cmx(dir.path(), &["draw", "grid.json", "line:0,-2147483648,0,2147483647", "--char", "="]);
    assert_eq!(code, 0, "draw failed: {}", stderr);

    let (stdout, _, _) = run_cmx(dir.path(), &["show", "grid.json"]);
    assert_eq!(stdout, "1x3\n= = =\n");
}

#[test]
fn test_draw_rejects_whitespace_character() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 1, 2);
    let before = std::fs::read_to_string(dir.path().join("grid.json")).unwrap();

    let (_, stderr, code) = run_cmx(dir.path(), &["draw", "grid.json", "paint:0,0", "--char", "a b"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("whitespace"), "stderr: {}", stderr);
    assert_eq!(std::fs::read_to_string(dir.path().join("grid.json")).unwrap(), before);
}

#[test]
fn test_export_rejects_malformed_snapshot() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r##"{"rows": 2, "cols": 2, "grid": [[{"character": "", "backgroundColor": "#FFFFFF"}]]}"##,
    )
    .unwrap();
    let (_, stderr, code) = run_cmx(dir.path(), &["export", "bad.json", "-o", "bad.txt"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("rows"));
    assert!(!dir.path().join("bad.txt").exists());
}

#[test]
fn test_export_json_compact() {
    let dir = TempDir::new().unwrap();
    new_grid(&dir, 1, 1);
    let (_, _, code) =
        run_cmx(dir.path(), &["export", "grid.json", "-o", "copy.json", "--compact"]);
    assert_eq!(code, 0);
    let json = std::fs::read_to_string(dir.path().join("copy.json")).unwrap();
    assert_eq!(json, r##"{"rows":1,"cols":1,"grid":[[{"character":"","backgroundColor":"#FFFFFF"}]]}"##);
}
