//! Integration tests for CLI commands.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_utikit"))
        .args(args)
        .output()
        .expect("Failed to run utikit");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

#[test]
fn test_ext_command() {
    let (success, stdout, _) = run_cli(&["ext", "zip", "--file"]);
    assert!(success);
    assert!(stdout.contains("public.zip-archive"));
}

#[test]
fn test_ext_directory_sentinel() {
    let (success, stdout, _) = run_cli(&["ext", "", "--dir", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["identifier"], "public.folder");
}

#[test]
fn test_ext_unknown_is_dynamic() {
    let (success, stdout, _) = run_cli(&["ext", "qqqq", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["dynamic"], true);
    assert_eq!(parsed["preferred_extension"], "qqqq");
}

#[test]
fn test_tag_command_with_mime() {
    let (success, stdout, _) = run_cli(&["tag", "mime", "application/pdf", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["identifier"], "com.adobe.pdf");
    assert_eq!(parsed["preferred_extension"], "pdf");
}

#[test]
fn test_conforms_command() {
    let (success, stdout, _) = run_cli(&["conforms", "public.png", "public.text", "public.image"]);
    assert!(success);
    assert_eq!(stdout.trim(), "true");

    let (success, stdout, _) = run_cli(&["conforms", "public.data", "public.zip-archive"]);
    assert!(!success);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_extension_command() {
    let (success, stdout, _) = run_cli(&["extension", "Public.JPEG"]);
    assert!(success);
    assert_eq!(stdout.trim(), "jpeg");

    let (success, _, stderr) = run_cli(&["extension", "public.data"]);
    assert!(!success);
    assert!(stderr.contains("No preferred extension"));
}

#[test]
fn test_identify_command() {
    let temp_dir = TempDir::new().unwrap();
    let image = temp_dir.path().join("photo.png");
    fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();
    let folder = temp_dir.path().join("albums");
    fs::create_dir(&folder).unwrap();

    let (success, stdout, _) = run_cli(&[
        "identify",
        image.to_str().unwrap(),
        folder.to_str().unwrap(),
        "--json",
    ]);
    assert!(success);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str(l).expect("Invalid JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["identifier"], "public.png");
    assert_eq!(lines[1]["identifier"], "public.folder");
}

#[test]
fn test_custom_declarations() {
    let temp_dir = TempDir::new().unwrap();
    let declarations = temp_dir.path().join("types.json");
    fs::write(
        &declarations,
        r#"[{
            "identifier": "com.example.sketch",
            "conforms_to": ["public.image"],
            "tags": {"public.filename-extension": ["sketchy"]}
        }]"#,
    )
    .unwrap();

    let (success, stdout, _) = run_cli(&[
        "--declarations",
        declarations.to_str().unwrap(),
        "ext",
        "sketchy",
        "--file",
    ]);
    assert!(success);
    assert!(stdout.contains("com.example.sketch"));
}

#[test]
fn test_invalid_declarations_fail() {
    let temp_dir = TempDir::new().unwrap();
    let declarations = temp_dir.path().join("broken.json");
    fs::write(&declarations, r#"[{"identifier": "public.data"}]"#).unwrap();

    let (success, _, stderr) = run_cli(&[
        "--declarations",
        declarations.to_str().unwrap(),
        "declarations",
    ]);
    assert!(!success);
    assert!(stderr.contains("declared more than once"));
}

#[test]
fn test_declarations_dump() {
    let (success, stdout, _) = run_cli(&["declarations"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let identifiers: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["identifier"].as_str())
        .collect();
    assert!(identifiers.contains(&"public.item"));
    assert!(identifiers.contains(&"com.pkware.zip-archive"));
}
