//! Integration tests for directed message routing.

mod common;

use chitthi::config::{DuplicatePolicy, LimitsConfig};
use common::{TestClient, TestServer};
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_echo_and_delivery() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("bob hello there").await.unwrap();

    assert_eq!(alice.recv().await.unwrap(), "[You] to [bob]: hello there");
    assert_eq!(bob.recv().await.unwrap(), "[Message from alice]: hello there");
}

#[tokio::test]
async fn test_split_on_first_space_only() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("bob  two  spaces and more").await.unwrap();

    assert_eq!(
        alice.recv().await.unwrap(),
        "[You] to [bob]:  two  spaces and more"
    );
    assert_eq!(
        bob.recv().await.unwrap(),
        "[Message from alice]:  two  spaces and more"
    );
}

#[tokio::test]
async fn test_trailing_space_sends_empty_body() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("bob ").await.unwrap();

    assert_eq!(alice.recv().await.unwrap(), "[You] to [bob]: ");
    assert_eq!(bob.recv().await.unwrap(), "[Message from alice]: ");
}

#[tokio::test]
async fn test_crlf_terminated_lines() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = TestClient::connect(server.address()).await.unwrap();
    alice.send_bytes(b"alice\r\n").await.unwrap();
    server.wait_for(|r| r.contains("alice")).await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_bytes(b"bob hi\r\n").await.unwrap();

    assert_eq!(alice.recv().await.unwrap(), "[You] to [bob]: hi");
    assert_eq!(bob.recv().await.unwrap(), "[Message from alice]: hi");
}

#[tokio::test]
async fn test_unknown_recipient() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("carol are you there").await.unwrap();

    assert_eq!(
        alice.recv_n(2).await.unwrap(),
        vec![
            "[You] to [carol]: are you there",
            "ERROR: User carol is not online."
        ]
    );
    bob.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_recipient_names_are_case_sensitive() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("Bob hi").await.unwrap();

    assert_eq!(alice.recv_n(2).await.unwrap()[1], "ERROR: User Bob is not online.");
    bob.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_malformed_line_keeps_session() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice.send_line("hello").await.unwrap();
    assert_eq!(
        alice.recv().await.unwrap(),
        "ERROR: Private message format is [recipient] [message]"
    );

    alice.send_line("").await.unwrap();
    assert_eq!(
        alice.recv().await.unwrap(),
        "ERROR: Private message format is [recipient] [message]"
    );

    alice.send_line("bob still here").await.unwrap();
    assert_eq!(alice.recv().await.unwrap(), "[You] to [bob]: still here");
    assert_eq!(bob.recv().await.unwrap(), "[Message from alice]: still here");
    assert!(server.registry().contains("alice"));
}

#[tokio::test]
async fn test_overlong_line_keeps_session() {
    let limits = LimitsConfig {
        max_line_len: 16,
        ..LimitsConfig::default()
    };
    let server = TestServer::spawn_with(DuplicatePolicy::Reject, limits)
        .await
        .unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    alice
        .send_line("bob this line is far longer than sixteen bytes")
        .await
        .unwrap();
    assert_eq!(
        alice.recv().await.unwrap(),
        "ERROR: Line too long (max 16 bytes)."
    );
    bob.expect_silence(QUIET).await.unwrap();

    alice.send_line("bob short").await.unwrap();
    assert_eq!(alice.recv().await.unwrap(), "[You] to [bob]: short");
    assert_eq!(bob.recv().await.unwrap(), "[Message from alice]: short");
}

#[tokio::test]
async fn test_message_to_self() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();

    alice.send_line("alice note to self").await.unwrap();

    assert_eq!(
        alice.recv_n(2).await.unwrap(),
        vec!["[You] to [alice]: note to self", "[Message from alice]: note to self"]
    );
}

#[tokio::test]
async fn test_per_pair_order() {
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();

    for i in 0..50 {
        alice.send_line(&format!("bob msg {i}")).await.unwrap();
    }

    for i in 0..50 {
        assert_eq!(bob.recv().await.unwrap(), format!("[Message from alice]: msg {i}"));
        assert_eq!(alice.recv().await.unwrap(), format!("[You] to [bob]: msg {i}"));
    }
}

#[tokio::test]
async fn test_slow_reader_receives_every_message() {
    const COUNT: usize = 2000;
    let server = TestServer::spawn(DuplicatePolicy::Reject).await.unwrap();
    let mut alice = server.login("alice").await.unwrap();
    let mut bob = server.login("bob").await.unwrap();
    let body = "x".repeat(3000);

    // Bob reads nothing until alice is done; alice reads her echoes in
    // small batches so her own socket never backs up.
    for batch in 0..COUNT / 10 {
        for i in batch * 10..(batch + 1) * 10 {
            alice.send_line(&format!("bob {i} {body}")).await.unwrap();
        }
        for i in batch * 10..(batch + 1) * 10 {
            assert_eq!(
                alice.recv().await.unwrap(),
                format!("[You] to [bob]: {i} {body}")
            );
        }
    }

    for i in 0..COUNT {
        assert_eq!(
            bob.recv().await.unwrap(),
            format!("[Message from alice]: {i} {body}")
        );
    }
    bob.expect_silence(QUIET).await.unwrap();
}
