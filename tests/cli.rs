#![cfg(feature = "java-status")]

mod common;

use common::{closed_addr, spawn_server, Reply};
use serde_json::Value;
use std::process::Command;

fn query(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_mcstatus-query"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
    )
}

#[test]
fn no_arguments_prints_no_host() {
    let (success, stdout) = query(&[]);

    assert!(success);
    assert_eq!(stdout, "{\"online\":false,\"error\":\"no_host\"}\n");
}

#[test]
fn unreachable_host_still_exits_zero() {
    let (success, stdout) = query(&[&closed_addr()]);
    let parsed: Value = serde_json::from_str(stdout.trim_end()).unwrap();

    assert!(success);
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(parsed["online"], false);
    assert!(!parsed["error"].as_str().unwrap().is_empty());
}

#[test]
fn live_server_prints_status() {
    let (addr, handle) = spawn_server(Reply::Status(
        r#"{"players":{"online":2,"max":10},"version":{"name":"1.21"},"icon":"X"}"#.into(),
    ));

    let (success, stdout) = query(&[&addr, "ignored"]);
    handle.join().unwrap();

    assert!(success);
    assert_eq!(
        stdout,
        "{\"online\":true,\"players\":2,\"maxPlayers\":10,\"motd\":\"\",\"version\":\"1.21\",\"favicon\":\"X\"}\n"
    );
}
