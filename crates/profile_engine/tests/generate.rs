use std::fs;

use profile_engine::{generate_manifest, parse_manifest, scan_content_dir};
use tempfile::TempDir;

fn content_dir(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in files {
        fs::write(dir.path().join(name), "body").unwrap();
    }
    dir
}

#[test]
fn scan_keeps_sorted_text_files_only() {
    let dir = content_dir(&["b.txt", "a.txt", "notes.md", "c.txt.bak"]);
    fs::create_dir(dir.path().join("sub.txt")).unwrap();

    let names = scan_content_dir(dir.path()).unwrap();
    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[test]
fn generated_manifest_uses_structured_shape() {
    let dir = content_dir(&["자기소개서1.txt", "a.txt"]);
    let out = TempDir::new().unwrap();
    let output = out.path().join("files.json");

    let manifest = generate_manifest(dir.path(), &output, 1_000).unwrap();
    assert_eq!(manifest.modified_at, 1_000);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"lastModified\": 1000"));
    assert_eq!(parse_manifest(text.as_bytes()).unwrap(), manifest);
}

#[test]
fn regenerated_manifest_is_strictly_newer() {
    let dir = content_dir(&["a.txt"]);
    let out = TempDir::new().unwrap();
    let output = out.path().join("files.json");

    let first = generate_manifest(dir.path(), &output, 5_000).unwrap();
    // Clock went backwards between runs.
    let second = generate_manifest(dir.path(), &output, 4_000).unwrap();

    assert!(second.modified_at > first.modified_at);
    assert_eq!(second.modified_at, 5_001);
}

#[test]
fn missing_content_dir_is_an_error() {
    let out = TempDir::new().unwrap();
    let result = generate_manifest(&out.path().join("nope"), &out.path().join("files.json"), 1);
    assert!(result.is_err());
    assert!(!out.path().join("files.json").exists());
}
