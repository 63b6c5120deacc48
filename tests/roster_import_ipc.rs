use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_seatboardd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn seatboardd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .pointer("/error/code")
        .and_then(|v| v.as_str())
        .expect("error code")
}

#[test]
fn template_round_trips_through_import() {
    let dir = temp_dir("seatboard-template");
    let path = dir.join("roster_template.csv");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "t1",
        "roster.template",
        json!({ "path": path.to_string_lossy() }),
    );
    assert_eq!(result.get("rows").and_then(|v| v.as_i64()), Some(3));

    let text = std::fs::read_to_string(&path).expect("read template");
    assert!(text.starts_with("번호,이름\n"));
    assert!(text.contains("홍길동"));

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "i1",
        "roster.import",
        json!({ "path": path.to_string_lossy() }),
    );
    assert_eq!(result.get("loaded").and_then(|v| v.as_i64()), Some(3));
    assert_eq!(result.get("occupiedCount").and_then(|v| v.as_i64()), Some(3));
    assert_eq!(
        result.pointer("/seats/0/name").and_then(|v| v.as_str()),
        Some("홍길동")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn import_caps_rows_keeps_gaps_and_replaces_the_board() {
    let dir = temp_dir("seatboard-import");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // A student seated before the import must not survive it.
    request_ok(
        &mut stdin,
        &mut reader,
        "pre",
        "seat.set",
        json!({ "index": 30, "number": "99", "name": "Leftover" }),
    );

    // 40 rows with a name gap on row 2 (positional: seat 1 stays empty).
    let mut csv = String::from("번호,이름\n");
    for i in 0..40 {
        if i == 1 {
            csv.push_str("2,\n");
        } else {
            csv.push_str(&format!("{},S{}\n", i + 1, i));
        }
    }
    let path = dir.join("big_roster.csv");
    std::fs::write(&path, &csv).expect("write roster");

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "i1",
        "roster.import",
        json!({ "path": path.to_string_lossy() }),
    );
    assert_eq!(result.get("loaded").and_then(|v| v.as_i64()), Some(31));
    assert_eq!(result.get("skipped").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(result.get("discarded").and_then(|v| v.as_i64()), Some(8));
    assert_eq!(result.get("occupiedCount").and_then(|v| v.as_i64()), Some(31));

    // Positional mapping: the gap stays a gap, later rows do not shift up.
    assert!(result.pointer("/seats/1").expect("seat 1").is_null());
    assert_eq!(
        result.pointer("/seats/2/name").and_then(|v| v.as_str()),
        Some("S2")
    );
    assert_eq!(
        result.pointer("/seats/31/name").and_then(|v| v.as_str()),
        Some("S31")
    );
    // The pre-import student is gone (full replacement, not a merge).
    assert_eq!(
        result.pointer("/seats/30/name").and_then(|v| v.as_str()),
        Some("S30")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn import_errors_are_reported_without_state_change() {
    let dir = temp_dir("seatboard-import-err");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "pre",
        "seat.set",
        json!({ "index": 0, "number": "1", "name": "Ada" }),
    );

    let missing = dir.join("nope.csv");
    let resp = request(
        &mut stdin,
        &mut reader,
        "e1",
        "roster.import",
        json!({ "path": missing.to_string_lossy() }),
    );
    assert_eq!(error_code(&resp), "file_read_failed");

    let bad = dir.join("bad_header.csv");
    std::fs::write(&bad, "번호,별명\n1,X\n").expect("write bad roster");
    let resp = request(
        &mut stdin,
        &mut reader,
        "e2",
        "roster.import",
        json!({ "path": bad.to_string_lossy() }),
    );
    assert_eq!(error_code(&resp), "bad_roster");

    // Both failures left the board untouched.
    let board = request_ok(&mut stdin, &mut reader, "g1", "board.get", json!({}));
    assert_eq!(board.get("occupiedCount").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(
        board.pointer("/seats/0/name").and_then(|v| v.as_str()),
        Some("Ada")
    );

    drop(stdin);
    let _ = child.wait();
}
