#![cfg(feature = "cli")]

use std::process::Command;

fn lmkdctl(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_lmkdctl"))
        .args(["--format", "json", "--log-level", "error"])
        .args(args)
        .output()
        .expect("lmkdctl should run")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be json")
}

#[test]
fn encode_target_scenario() {
    let output = lmkdctl(&[
        "encode",
        "target",
        "--entry",
        "18432:0",
        "--entry",
        "23040:100",
    ]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["command"], "LMK_TARGET");
    assert_eq!(json["length"], 20);
    assert_eq!(
        json["words"],
        serde_json::json!([0, 18432, 0, 23040, 100])
    );
    assert_eq!(json["hex"], "00000000000048000000000000005a0000000064");
}

#[test]
fn encode_procprio_then_decode() {
    let output = lmkdctl(&[
        "encode",
        "procprio",
        "--pid",
        "1234",
        "--uid",
        "10001",
        "--oomadj",
        "900",
        "--ptype",
        "service",
    ]);
    assert!(output.status.success());
    let encoded = stdout_json(&output);
    assert_eq!(encoded["length"], 20);

    let hex = encoded["hex"].as_str().expect("hex should be a string");
    let output = lmkdctl(&["decode", hex]);
    assert!(output.status.success());

    let decoded = stdout_json(&output);
    assert_eq!(decoded["role"], "server");
    assert_eq!(decoded["message"]["type"], "proc_prio");
    assert_eq!(decoded["message"]["payload"]["pid"], 1234);
    assert_eq!(decoded["message"]["payload"]["uid"], 10001);
    assert_eq!(decoded["message"]["payload"]["ptype"], "service");
}

#[test]
fn decode_reply_as_client() {
    let output = lmkdctl(&["decode", "00000004 00000011", "--role", "client"]);
    assert!(output.status.success());

    let decoded = stdout_json(&output);
    assert_eq!(decoded["message"]["type"], "get_kill_count_reply");
    assert_eq!(decoded["message"]["payload"]["count"], 17);
}

#[test]
fn decode_misaligned_procs_prio_returns_60() {
    // LMK_PROCS_PRIO with five payload words.
    let output = lmkdctl(&[
        "decode",
        "0000000b 00000001 00000002 00000003 00000000 00000009",
    ]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid field count 5"));
}

#[test]
fn lenient_decode_accepts_extra_words() {
    let packet = "00000003 00000001";
    assert_eq!(lmkdctl(&["decode", packet]).status.code(), Some(60));

    let output = lmkdctl(&["decode", packet, "--lenient"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["message"]["type"], "proc_purge");
}

#[test]
fn encode_too_many_procs_returns_64() {
    let output = lmkdctl(&[
        "encode",
        "procs-prio",
        "--proc",
        "1:1:0",
        "--proc",
        "2:1:0",
        "--proc",
        "3:1:0",
        "--proc",
        "4:1:0",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn limits_reports_capacity() {
    let output = lmkdctl(&["limits"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["packet_max_size"], 52);
    assert_eq!(json["procs_prio_max_records"], 3);
    assert_eq!(json["commands"].as_array().map(Vec::len), Some(12));
}

#[test]
fn version_reports_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_lmkdctl"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("lmkdctl {}", env!("CARGO_PKG_VERSION")));
}
