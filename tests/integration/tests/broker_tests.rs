//! Broker Integration Tests
//!
//! Each test starts an in-process server on an ephemeral port and talks to it
//! over real WebSocket and HTTP connections. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test broker_tests

use integration_tests::{
    assert_json, assert_status, eventually, fixtures::*, test_config_with, TestServer,
};
use reqwest::StatusCode;
use std::time::Duration;
use stomp_core::{Command, Frame};

const QUIET: Duration = Duration::from_millis(200);

// ============================================================================
// HTTP Surface Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_root_without_upgrade_serves_static_dir() {
    let config = test_config_with(&[("STATIC_DIR", "/nonexistent-static-dir")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    let response = server.get("/").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_connect_on_root_and_ws_paths() {
    let server = TestServer::start().await.unwrap();

    for path in ["/", "/ws"] {
        let mut client = integration_tests::StompClient::connect(&server.ws_url(path))
            .await
            .unwrap();
        let reply = client.handshake().await.unwrap();
        assert_eq!(reply.header("version"), Some("1.2"));
    }
}

#[tokio::test]
async fn test_connected_wire_format() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_raw("CONNECT\naccept-version:1.2\n\n\0").await.unwrap();

    assert_eq!(client.recv_raw().await.unwrap(), "CONNECTED\nversion:1.2\n\n\0");
}

#[tokio::test]
async fn test_subscribe_and_send_end_to_end() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect_negotiated().await.unwrap();
    let mut b = server.connect_negotiated().await.unwrap();

    a.subscribe("/topic/chat").await.unwrap();
    b.send_raw("SEND\ndestination:/topic/chat\n\nhello\0").await.unwrap();

    assert_eq!(
        a.recv_raw().await.unwrap(),
        "MESSAGE\ndestination:/topic/chat\ncontent-type:text/plain\n\nhello\0"
    );
    b.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_fan_out_includes_subscribed_sender() {
    let server = TestServer::start().await.unwrap();
    let destination = unique_destination();

    let mut clients = Vec::new();
    for _ in 0..3 {
        let mut client = server.connect_negotiated().await.unwrap();
        client.subscribe(&destination).await.unwrap();
        clients.push(client);
    }

    clients[0]
        .send_frame(&Frame::send(destination.as_str(), "to everyone"))
        .await
        .unwrap();

    for client in &mut clients {
        let frame = client.recv_frame().await.unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.destination(), Some(destination.as_str()));
        assert_eq!(frame.body, "to everyone");
    }
}

#[tokio::test]
async fn test_messages_only_reach_their_destination() {
    let server = TestServer::start().await.unwrap();
    let mut news = server.connect_negotiated().await.unwrap();
    let mut sports = server.connect_negotiated().await.unwrap();

    news.subscribe("/topic/news").await.unwrap();
    sports.subscribe("/topic/sports").await.unwrap();

    news.send_frame(&Frame::send("/topic/sports", "goal"))
        .await
        .unwrap();

    assert_eq!(sports.recv_frame().await.unwrap().body, "goal");
    news.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_missing_destination_reports_error_and_session_survives() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_negotiated().await.unwrap();

    client.send_raw("SEND\n\nno destination\0").await.unwrap();

    let error = client.recv_frame().await.unwrap();
    assert_eq!(error.command, Command::Error);
    assert_eq!(error.header("message"), Some("missing destination header"));

    client.handshake().await.unwrap();
}

#[tokio::test]
async fn test_invalid_utf8_binary_send_is_delivered() {
    let server = TestServer::start().await.unwrap();
    let mut listener = server.connect_negotiated().await.unwrap();
    let mut sender = server.connect_negotiated().await.unwrap();
    listener.subscribe("/topic/chat").await.unwrap();

    sender
        .send_bytes(b"SEND\ndestination:/topic/chat\n\nh\xffi\0")
        .await
        .unwrap();

    let frame = listener.recv_frame().await.unwrap();
    assert_eq!(frame.command, Command::Message);
    assert_eq!(frame.body, "h\u{fffd}i");
    sender.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_oversized_frame_is_rejected() {
    let config = test_config_with(&[("MAX_FRAME_SIZE", "64")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let mut client = server.connect_negotiated().await.unwrap();

    let body = "x".repeat(128);
    client
        .send_frame(&Frame::send("/topic/chat", body))
        .await
        .unwrap();

    assert_eq!(client.recv_frame().await.unwrap().command, Command::Error);
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_negotiated().await.unwrap();

    client.send_raw("UNSUBSCRIBE\nid:0\n\n\0").await.unwrap();
    client.expect_silence(QUIET).await.unwrap();

    client.handshake().await.unwrap();
}

// ============================================================================
// Teardown Tests
// ============================================================================

#[tokio::test]
async fn test_disconnect_closes_socket_and_clears_subscriptions() {
    let server = TestServer::start().await.unwrap();
    let destination = unique_destination();

    let mut leaving = server.connect_negotiated().await.unwrap();
    let mut staying = server.connect_negotiated().await.unwrap();
    leaving.subscribe(&destination).await.unwrap();
    staying.subscribe(&destination).await.unwrap();
    assert_eq!(server.state.registry().subscriber_count(&destination), 2);

    leaving.send_frame(&Frame::disconnect()).await.unwrap();
    leaving.expect_closed().await.unwrap();

    let registry = server.state.registry();
    eventually(|| registry.subscriber_count(&destination) == 1)
        .await
        .unwrap();

    staying
        .send_frame(&Frame::send(destination.as_str(), "still here"))
        .await
        .unwrap();
    assert_eq!(staying.recv_frame().await.unwrap().body, "still here");
}

#[tokio::test]
async fn test_client_close_removes_empty_destination() {
    let server = TestServer::start().await.unwrap();
    let destination = unique_destination();

    let mut client = server.connect_negotiated().await.unwrap();
    client.subscribe(&destination).await.unwrap();
    assert_eq!(server.state.registry().destination_count(), 1);

    client.close().await.unwrap();

    let registry = server.state.registry();
    eventually(|| registry.destination_count() == 0).await.unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_send_reaches_chat_subscribers() {
    let server = TestServer::start().await.unwrap();
    let mut chat = server.connect_negotiated().await.unwrap();
    let mut other = server.connect_negotiated().await.unwrap();
    chat.subscribe("/topic/chat").await.unwrap();
    other.subscribe("/topic/other").await.unwrap();

    let response = server
        .post("/admin/send", &AdminSendRequest::new("server restart at 5"))
        .await
        .unwrap();
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Message sent.");

    let frame = chat.recv_frame().await.unwrap();
    assert_eq!(frame.command, Command::Message);
    assert_eq!(frame.destination(), Some("/topic/chat"));
    assert_eq!(frame.body, "server restart at 5");
    other.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_admin_send_uses_configured_topic() {
    let config = test_config_with(&[("ADMIN_TOPIC", "/topic/announcements")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let mut client = server.connect_negotiated().await.unwrap();
    client.subscribe("/topic/announcements").await.unwrap();

    let response = server
        .post("/admin/send", &AdminSendRequest::new("hi all"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let frame = client.recv_frame().await.unwrap();
    assert_eq!(frame.destination(), Some("/topic/announcements"));
}

#[tokio::test]
async fn test_admin_send_requires_message() {
    let server = TestServer::start().await.unwrap();

    for body in ["{}", r#"{"message":""}"#] {
        let response = server
            .post_raw("/admin/send", "application/json", body)
            .await
            .unwrap();
        let reply: StatusResponse = assert_json(response, StatusCode::BAD_REQUEST)
            .await
            .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "Message is required.");
    }
}

#[tokio::test]
async fn test_admin_send_rejects_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_raw("/admin/send", "application/json", "{not json")
        .await
        .unwrap();
    let reply: StatusResponse = assert_json(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert!(!reply.success);
    assert_eq!(reply.code.as_deref(), Some("INVALID_BODY"));
}

#[tokio::test]
async fn test_admin_clients_lists_destinations() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/admin/clients").await.unwrap();
    let empty: ClientsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(empty.count, 0);
    assert!(empty.clients.is_empty());

    let mut a = server.connect_negotiated().await.unwrap();
    let mut b = server.connect_negotiated().await.unwrap();
    a.subscribe("/topic/chat").await.unwrap();
    b.subscribe("/topic/chat").await.unwrap();
    b.subscribe("/topic/alerts").await.unwrap();

    let response = server.get("/admin/clients").await.unwrap();
    let listed: ClientsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.count, 2);
    assert_eq!(
        listed.clients,
        vec![
            "/topic/alerts (1 subscribers)".to_string(),
            "/topic/chat (2 subscribers)".to_string(),
        ]
    );
}
