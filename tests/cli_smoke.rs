use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("signup.json")
}

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_render_workflow_rs"))
}

#[test]
fn cli_renders_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("signup.png");

    cli()
        .args(["draw_workflow", "--input"])
        .arg(fixture())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");
}

#[test]
fn cli_picks_jpeg_from_the_output_extension() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("signup.jpg");

    cli()
        .args(["draw_workflow", "--legend", "--summary", "--input"])
        .arg(fixture())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read jpeg");
    assert!(bytes.starts_with(&[0xff, 0xd8]), "output is not a JPEG");
}

#[test]
fn cli_names_the_file_when_no_output_is_given() {
    let tmp = tempfile::tempdir().expect("tempdir");

    cli()
        .current_dir(tmp.path())
        .args(["draw_workflow", "--format", "jpeg", "--input"])
        .arg(fixture())
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(tmp.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1, "{names:?}");
    assert!(names[0].starts_with("workflow-user_journey-"), "{names:?}");
    assert!(names[0].ends_with(".jpeg"), "{names:?}");
}

#[test]
fn cli_writes_nothing_for_an_empty_workflow() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("empty.json");
    fs::write(&input, r#"{"workflow_type": "feature_flow", "workflow_nodes": []}"#)
        .expect("write input");
    let out = tmp.path().join("empty.png");

    cli()
        .args(["draw_workflow", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert!(!out.exists());
}

#[test]
fn cli_rejects_malformed_json() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("broken.json");
    fs::write(&input, "{ not json").expect("write input");

    cli()
        .args(["draw_workflow", "--input"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn cli_keeps_default_output_inside_the_working_directory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let work = tmp.path().join("work");
    fs::create_dir(&work).expect("create work dir");
    let input = tmp.path().join("sneaky.json");
    fs::write(
        &input,
        r#"{"workflow_type": "../escape", "workflow_nodes": [{"id": "a", "type": "start"}]}"#,
    )
    .expect("write input");

    cli()
        .current_dir(&work)
        .args(["draw_workflow", "--input"])
        .arg(&input)
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&work)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1, "{names:?}");
    assert!(names[0].starts_with("workflow-.._escape-"), "{names:?}");
    assert_eq!(fs::read_dir(tmp.path()).expect("read tmp").count(), 2);
}
