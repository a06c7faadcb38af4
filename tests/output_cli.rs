mod common;

use common::{stdout_of, Project};
use std::fs;

#[test]
fn not_found_is_reported_and_exits_zero() {
    let p = Project::new();
    p.write("data/foo.txt", &[b'x'; 500]);

    let out = p.cmd().args(["output", "foo.txt", "bar.txt"]).output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = stdout_of(&out);
    assert!(stdout.contains("moved       foo.txt"), "{stdout}");
    assert!(stdout.contains("missing     bar.txt"), "{stdout}");
    assert!(stdout.contains("not found: 1"));
    assert!(stdout.contains("(500 bytes)"));
    assert_eq!(p.read("output/foo.txt").len(), 500);
    assert!(!p.exists("data/foo.txt"));
}

#[test]
fn second_run_is_a_no_op() {
    let p = Project::new();
    p.write("a/kazakh_clean_cyrillic.txt", "сәлем".as_bytes());
    p.write("b/demo_original.txt", b"demo");

    p.cmd().arg("output").assert().success();
    let after_first = p.snapshot();

    let out = p.cmd().arg("output").output().unwrap();
    assert!(out.status.success());
    assert_eq!(p.snapshot(), after_first);
    let stdout = stdout_of(&out);
    assert!(stdout.contains("moved: 0"));
    assert!(stdout.contains("already present: 2"), "{stdout}");
}

#[test]
fn dry_run_touches_nothing() {
    let p = Project::new();
    p.write("nested/deep/cleaned_transcript.txt", b"text");
    let before = p.snapshot();

    for flags in [&["-d"][..], &["--dry-run", "-c", "-b"][..]] {
        let out = p.cmd().arg("output").args(flags).output().unwrap();
        assert!(out.status.success());
        assert!(stdout_of(&out).contains("would "));
    }
    assert_eq!(p.snapshot(), before);
    assert!(!p.exists("output"), "dry-run must not create the output dir");
    let backups = fs::read_dir(&p.root)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("backup_"))
        .count();
    assert_eq!(backups, 0);
}

#[test]
fn copy_keeps_source_move_does_not() {
    let p = Project::new();
    p.write("src/one.txt", b"1");
    p.write("src/two.txt", b"2");

    p.cmd().args(["output", "-c", "one.txt"]).assert().success();
    assert!(p.exists("src/one.txt"));
    assert_eq!(p.read("output/one.txt"), b"1");

    p.cmd().args(["output", "two.txt"]).assert().success();
    assert!(!p.exists("src/two.txt"));
    assert_eq!(p.read("output/two.txt"), b"2");
}

#[test]
fn backup_holds_identical_bytes() {
    let p = Project::new();
    let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    p.write("results/turkic_classification_results.txt", &payload);

    p.cmd()
        .args(["output", "--backup", "turkic_classification_results.txt"])
        .assert()
        .success();

    let backup = fs::read_dir(&p.root)
        .unwrap()
        .filter_map(Result::ok)
        .find(|e| e.file_name().to_string_lossy().starts_with("backup_"))
        .expect("backup directory created");
    let name = backup.file_name().to_string_lossy().into_owned();
    assert_eq!(name.len(), "backup_YYYYMMDD_HHMMSS".len());
    assert_eq!(fs::read(backup.path().join("turkic_classification_results.txt")).unwrap(), payload);
    assert_eq!(p.read("output/turkic_classification_results.txt"), payload);
}

#[test]
fn duplicate_names_pick_first_sorted_path() {
    let p = Project::new();
    p.write("zeta/r.txt", b"z");
    p.write("alpha/r.txt", b"a");

    let out = p.cmd().args(["output", "r.txt"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(p.read("output/r.txt"), b"a");
    assert!(p.exists("zeta/r.txt"));
    assert!(stdout_of(&out).contains("r.txt (2 candidates)"));
}

#[test]
fn vcs_directories_are_not_searched() {
    let p = Project::new();
    p.write(".git/objects/x.txt", b"git");
    let out = p.cmd().args(["output", "x.txt"]).output().unwrap();
    assert!(out.status.success());
    assert!(stdout_of(&out).contains("missing     x.txt"));
    assert!(p.exists(".git/objects/x.txt"));
}

#[test]
fn missing_project_root_is_fatal() {
    let p = Project::new();
    fs::remove_dir_all(&p.root).unwrap();
    let out = p.cmd().args(["output", "a.txt"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("project_root does not exist"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let p = Project::new();
    p.write("a.txt", b"a");
    let out = p.cmd().args(["output", "--frobnicate"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(p.exists("a.txt"));
}

#[test]
fn help_exits_zero() {
    let p = Project::new();
    let out = p.cmd().args(["output", "-h"]).output().unwrap();
    assert!(out.status.success());
    let stdout = stdout_of(&out);
    assert!(stdout.contains("--dry-run") && stdout.contains("--copy") && stdout.contains("--backup"));
}

#[test]
fn invalid_name_fails_that_item_only() {
    let p = Project::new();
    p.write("ok.txt", b"ok");
    let out = p.cmd().args(["output", "../escape.txt", "ok.txt"]).output().unwrap();
    assert!(out.status.success());
    let stdout = stdout_of(&out);
    assert!(stdout.contains("FAILED      ../escape.txt"), "{stdout}");
    assert!(p.exists("output/ok.txt"));
}
