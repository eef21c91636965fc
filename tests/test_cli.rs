
use fixtures::*;

use assert_cmd::prelude::*;
use emfinfo::CommentRecordHeader;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn write_sample(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn emf_dump(args: &[&str], input: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("emf_dump"));
    cmd.args(args).arg(input);
    cmd
}

#[test]
fn it_prints_a_text_report() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());

    emf_dump(&[], &sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("device units: [0,639:0,479]"))
        .stdout(predicate::str::contains("Picture Frame: [0,16933:0,12700]"))
        .stdout(predicate::str::contains("description: Paint / Sunset"))
        .stdout(predicate::str::contains("EMF+ header::"))
        .stdout(predicate::str::contains("GraphicsVersion: 2"))
        .stdout(predicate::str::contains("LogicalDpi: [96,96]"));
}

#[test]
fn it_omits_the_emf_plus_section_silently() {
    let d = tempdir().unwrap();
    let builder = MetafileBuilder {
        comment: CommentRecordHeader {
            signature: *b"GDIC",
            ..CommentRecordHeader::emf_plus(28)
        },
        ..MetafileBuilder::default()
    };
    let sample = write_sample(&d, "plain.emf", &builder.build());

    emf_dump(&[], &sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 65536"))
        .stdout(predicate::str::contains("EMF+").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn it_explains_missing_emf_plus_header() {
    let d = tempdir().unwrap();
    let builder = MetafileBuilder {
        comment: CommentRecordHeader {
            signature: *b"EMF-",
            ..CommentRecordHeader::emf_plus(28)
        },
        ..MetafileBuilder::default()
    };
    let sample = write_sample(&d, "plain.emf", &builder.build());

    emf_dump(&["--explain"], &sample)
        .assert()
        .success()
        .stderr(predicate::str::contains("no EMF+ header"));
}

#[test]
fn it_prints_json() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());

    let output = emf_dump(&["-o", "jsonl"], &sample).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1, "jsonl output should be a single line");

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["emf_plus"]["logical_dpi_x"], 96);
    assert_eq!(value["description"]["application"], "Paint");
}

#[test]
fn it_supports_stdin_input_with_dash() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());

    let out_file = emf_dump(&[], &sample).output().unwrap();
    assert!(out_file.status.success());

    let mut cmd_stdin = emf_dump(&[], Path::new("-"));
    cmd_stdin.stdin(File::open(&sample).unwrap());
    let out_stdin = cmd_stdin.output().unwrap();

    assert!(out_stdin.status.success());
    assert_eq!(out_stdin.stdout, out_file.stdout);
}

#[test]
fn it_fails_on_missing_input() {
    let d = tempdir().unwrap();

    emf_dump(&[], &d.path().join("missing.emf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing.emf"));
}

#[test]
fn it_fails_on_files_that_are_not_emf() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "not.emf", &[0x42; 256]);

    emf_dump(&[], &sample).assert().failure().code(1);
}

#[test]
fn it_respects_output_target() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());
    let f = d.path().join("nested").join("report.txt");

    let output = emf_dump(&["-f", &f.to_string_lossy()], &sample)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(
        output.stdout.is_empty(),
        "Expected output to be printed to file, but was printed to stdout"
    );

    let mut written = String::new();
    File::open(&f)
        .unwrap()
        .read_to_string(&mut written)
        .unwrap();
    assert!(written.contains("LogicalDpi: [96,96]"));
}

#[test]
fn test_it_refuses_to_overwrite_directory() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());

    emf_dump(&["-f", &d.path().to_string_lossy()], &sample)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_it_overwrites_file_anyways_if_passed_flag() {
    let d = tempdir().unwrap();
    let sample = write_sample(&d, "plus.emf", &regular_metafile());
    let f = d.path().join("report.txt");

    let mut file = File::create(&f).unwrap();
    file.write_all(b"I'm a file!").unwrap();

    emf_dump(
        &["-f", &f.to_string_lossy(), "--no-confirm-overwrite"],
        &sample,
    )
    .assert()
    .success();

    let written = fs::read_to_string(&f).unwrap();
    assert!(written.starts_with("device units:"));
}

#[test]
fn it_accepts_a_primary_header_size_override() {
    let d = tempdir().unwrap();
    let builder = MetafileBuilder {
        primary_header_size: 88,
        description: None,
        ..MetafileBuilder::default()
    };
    let sample = write_sample(&d, "plus88.emf", &builder.build());

    emf_dump(&[], &sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("EMF+").not());

    emf_dump(&["--primary-header-size", "88"], &sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("LogicalDpi: [96,96]"));
}

#[test]
fn it_reports_headers_that_declare_less_than_their_own_size() {
    let d = tempdir().unwrap();
    let mut bytes = regular_metafile();
    // total bytes
    bytes[48..52].copy_from_slice(&100_u32.to_le_bytes());
    let sample = write_sample(&d, "short.emf", &bytes);

    emf_dump(&[], &sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("device units: [0,639:0,479]"))
        .stdout(predicate::str::contains("EMF+").not());
}
