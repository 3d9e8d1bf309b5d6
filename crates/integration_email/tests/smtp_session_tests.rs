//! Runs the client against a scripted plaintext relay on localhost.

use integration_email::{EmailError, OutgoingEmail, SmtpClient, SmtpConfig};
use secrecy::SecretString;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
};

/// Accepts one session and returns every line the client sent.
async fn scripted_relay(auth_reply: &'static str) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut conn = BufReader::new(socket);
        let mut seen = Vec::new();

        conn.write_all(b"220 relay.test ESMTP\r\n").await.unwrap();
        let mut in_data = false;
        loop {
            let mut line = String::new();
            if conn.read_line(&mut line).await.unwrap() == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            seen.push(line.clone());

            let reply: &[u8] = if in_data {
                if line == "." {
                    in_data = false;
                    b"250 queued\r\n"
                } else {
                    continue;
                }
            } else if line.starts_with("EHLO") {
                b"250-relay.test\r\n250 AUTH PLAIN\r\n"
            } else if line.starts_with("AUTH") {
                auth_reply.as_bytes()
            } else if line.starts_with("MAIL") || line.starts_with("RCPT") {
                b"250 ok\r\n"
            } else if line == "DATA" {
                in_data = true;
                b"354 go ahead\r\n"
            } else if line == "QUIT" {
                conn.write_all(b"221 bye\r\n").await.unwrap();
                break;
            } else {
                b"500 unknown\r\n"
            };
            conn.write_all(reply).await.unwrap();
        }
        seen
    });

    (port, handle)
}

fn plaintext_config(port: u16) -> SmtpConfig {
    SmtpConfig::new("127.0.0.1", "alerts@emenutables.com")
        .with_port(port)
        .with_starttls(false)
        .with_timeout_ms(5_000)
}

#[tokio::test]
async fn delivers_message_without_auth() {
    let (port, relay) = scripted_relay("235 ok\r\n").await;
    let client = SmtpClient::new(plaintext_config(port)).unwrap();

    let email = OutgoingEmail::new(
        "manager@bistro.com",
        "URGENT: Allergy/Medical Alert - Reservation r-1",
        "Reason: anaphylaxis\n.hidden",
    );
    let message_id = client.send(&email).await.unwrap();
    assert!(message_id.ends_with("@emenutables.com>"));

    let seen = relay.await.unwrap();
    assert!(seen[0].starts_with("EHLO "));
    assert!(!seen.iter().any(|l| l.starts_with("AUTH")));
    assert!(seen.contains(&"MAIL FROM:<alerts@emenutables.com>".to_string()));
    assert!(seen.contains(&"RCPT TO:<manager@bistro.com>".to_string()));
    assert!(seen.contains(&"Subject: URGENT: Allergy/Medical Alert - Reservation r-1".to_string()));
    assert!(seen.contains(&"..hidden".to_string()));
    assert_eq!(seen.last().map(String::as_str), Some("QUIT"));
}

#[tokio::test]
async fn authenticates_with_plain_mechanism() {
    let (port, relay) = scripted_relay("235 ok\r\n").await;
    let config = plaintext_config(port).with_credentials("alerts", SecretString::from("pw"));
    let client = SmtpClient::new(config).unwrap();

    client
        .send(&OutgoingEmail::new("manager@bistro.com", "s", "b"))
        .await
        .unwrap();

    let seen = relay.await.unwrap();
    // base64("\0alerts\0pw")
    assert!(seen.contains(&"AUTH PLAIN AGFsZXJ0cwBwdw==".to_string()));
}

#[tokio::test]
async fn rejected_credentials_fail() {
    let (port, _relay) = scripted_relay("535 bad credentials\r\n").await;
    let config = plaintext_config(port).with_credentials("alerts", SecretString::from("wrong"));
    let client = SmtpClient::new(config).unwrap();

    let result = client
        .send(&OutgoingEmail::new("manager@bistro.com", "s", "b"))
        .await;
    assert!(matches!(result, Err(EmailError::AuthenticationFailed)));
}

#[tokio::test]
async fn unreachable_relay_is_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = SmtpClient::new(plaintext_config(port)).unwrap();
    let result = client
        .send(&OutgoingEmail::new("manager@bistro.com", "s", "b"))
        .await;
    assert!(matches!(result, Err(EmailError::ConnectionFailed(_))));
}
