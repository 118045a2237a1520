use std::process::{Command, Output};

fn certview(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_certview"))
        .args(args)
        .output()
        .expect("failed to run certview")
}

#[test]
fn test_no_source_prints_usage_and_exits_1() {
    let out = certview(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no certificate source given"), "{stderr}");
    assert!(stderr.contains("Usage:"), "{stderr}");
    assert!(stderr.contains("--file"), "{stderr}");
    assert!(stderr.contains("--domain"), "{stderr}");
}

#[test]
fn test_empty_values_count_as_no_source() {
    let out = certview(&["-file", "", "-domain="]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage:"));
}

#[test]
fn test_unreadable_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.pem");
    let out = certview(&["-file", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error:"), "{stderr}");
    assert!(stderr.contains("missing.pem"), "{stderr}");
}

#[test]
fn test_undecodable_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.pem");
    std::fs::write(&path, "not a certificate\n").unwrap();
    let out = certview(&["-file", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("certificate decoding error"));
}
