//! SMTP session handling
//!
//! Speaks just enough ESMTP to hand one message to a relay: EHLO, optional
//! STARTTLS, optional AUTH PLAIN, MAIL/RCPT/DATA and QUIT.

use std::time::Duration;

use base64::Engine;
use secrecy::ExposeSecret;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tracing::{debug, instrument, trace};

use crate::{
    EmailError, SmtpConfig,
    config::is_plausible_address,
    tls,
};

/// A plain-text message addressed to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EmailError> {
        if !is_plausible_address(&self.to) {
            return Err(EmailError::InvalidAddress(self.to.clone()));
        }
        Ok(())
    }
}

/// Async SMTP client
#[derive(Debug, Clone)]
pub struct SmtpClient {
    config: SmtpConfig,
}

impl SmtpClient {
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Delivers `email` and returns the generated Message-ID
    #[instrument(skip(self, email), fields(host = %self.config.host, port = self.config.port))]
    pub async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError> {
        email.validate()?;

        let message_id = format!(
            "<{}@{}>",
            uuid::Uuid::new_v4(),
            domain_of(&self.config.from)
        );
        let content = self.render(email, &message_id);

        let timeout = Duration::from_millis(self.config.timeout_ms);
        tokio::time::timeout(timeout, self.transmit(&email.to, &content))
            .await
            .map_err(|_| EmailError::Timeout)??;

        debug!(message_id = %message_id, "Email accepted by relay");
        Ok(message_id)
    }

    /// Checks that the relay accepts TCP connections
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> bool {
        let addr = (self.config.host.as_str(), self.config.port);
        let timeout = Duration::from_millis(self.config.timeout_ms);
        matches!(
            tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }

    /// Renders headers and dot-stuffed body in RFC 5322 form
    fn render(&self, email: &OutgoingEmail, message_id: &str) -> String {
        let date = chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S +0000");
        let subject = single_line(&email.subject);

        let mut content = format!(
            "From: {}\r\n\
             To: {}\r\n\
             Subject: {subject}\r\n\
             Date: {date}\r\n\
             Message-ID: {message_id}\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             Content-Transfer-Encoding: 8bit\r\n\r\n",
            self.config.from, email.to
        );

        for line in email.body.lines() {
            if line.starts_with('.') {
                content.push('.');
            }
            content.push_str(line);
            content.push_str("\r\n");
        }
        content
    }

    async fn transmit(&self, to: &str, content: &str) -> Result<(), EmailError> {
        let addr = (self.config.host.as_str(), self.config.port);
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| EmailError::ConnectionFailed(format!("SMTP connection failed: {e}")))?;

        if self.config.uses_implicit_tls() {
            let stream = tls::wrap(&self.config, stream).await?;
            let mut conn = BufReader::new(stream);
            expect(&mut conn, "220").await?;
            ehlo(&mut conn).await?;
            return self.deliver(&mut conn, to, content).await;
        }

        let mut conn = BufReader::new(stream);
        expect(&mut conn, "220").await?;
        ehlo(&mut conn).await?;

        if self.config.starttls {
            command(&mut conn, "STARTTLS", "220").await?;
            let stream = tls::wrap(&self.config, conn.into_inner()).await?;
            let mut conn = BufReader::new(stream);
            ehlo(&mut conn).await?;
            return self.deliver(&mut conn, to, content).await;
        }

        self.deliver(&mut conn, to, content).await
    }

    async fn deliver<S>(
        &self,
        conn: &mut BufReader<S>,
        to: &str,
        content: &str,
    ) -> Result<(), EmailError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if self.config.requires_auth() {
            let password = self
                .config
                .password
                .as_ref()
                .ok_or(EmailError::AuthenticationFailed)?;
            let token = base64::engine::general_purpose::STANDARD.encode(format!(
                "\0{}\0{}",
                self.config.username,
                password.expose_secret()
            ));
            send_line(conn, &format!("AUTH PLAIN {token}")).await?;
            let reply = read_reply(conn).await?;
            if !reply.starts_with("235") {
                return Err(EmailError::AuthenticationFailed);
            }
        }

        command(conn, &format!("MAIL FROM:<{}>", self.config.from), "250").await?;
        command(conn, &format!("RCPT TO:<{to}>"), "250").await?;
        command(conn, "DATA", "354").await?;

        conn.write_all(content.as_bytes())
            .await
            .map_err(|e| EmailError::Smtp(format!("Failed to send content: {e}")))?;
        command(conn, ".", "250").await?;

        // The relay may drop the connection right after QUIT.
        send_line(conn, "QUIT").await.ok();
        Ok(())
    }
}

async fn ehlo<S>(conn: &mut BufReader<S>) -> Result<String, EmailError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let name = hostname::get().map_or_else(
        |_| "localhost".to_string(),
        |h| h.to_string_lossy().into_owned(),
    );
    command(conn, &format!("EHLO {name}"), "250").await
}

async fn command<S>(
    conn: &mut BufReader<S>,
    line: &str,
    expected: &str,
) -> Result<String, EmailError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    send_line(conn, line).await?;
    expect(conn, expected).await
}

async fn send_line<S>(conn: &mut BufReader<S>, line: &str) -> Result<(), EmailError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    trace!(verb = %line.split(' ').next().unwrap_or(line), "SMTP command");
    conn.write_all(format!("{line}\r\n").as_bytes())
        .await
        .map_err(|e| EmailError::Smtp(format!("Failed to send command: {e}")))?;
    conn.flush()
        .await
        .map_err(|e| EmailError::Smtp(format!("Failed to flush command: {e}")))
}

async fn expect<S>(conn: &mut BufReader<S>, code: &str) -> Result<String, EmailError>
where
    S: AsyncRead + Unpin,
{
    let reply = read_reply(conn).await?;
    if reply.starts_with(code) {
        Ok(reply)
    } else {
        Err(EmailError::Smtp(format!(
            "Expected {code}, got: {}",
            reply.trim_end()
        )))
    }
}

/// Reads a possibly multi-line reply (`250-...` continues, `250 ...` ends)
async fn read_reply<S>(conn: &mut BufReader<S>) -> Result<String, EmailError>
where
    S: AsyncRead + Unpin,
{
    let mut reply = String::new();
    loop {
        let mut line = String::new();
        let read = conn
            .read_line(&mut line)
            .await
            .map_err(|e| EmailError::Smtp(format!("Failed to read reply: {e}")))?;
        if read == 0 {
            return Err(EmailError::Smtp("Connection closed by relay".to_string()));
        }
        trace!(line = %line.trim_end(), "SMTP reply");
        reply.push_str(&line);

        if line.len() < 4 || line.as_bytes()[3] != b'-' {
            return Ok(reply);
        }
    }
}

fn domain_of(address: &str) -> &str {
    address
        .split_once('@')
        .map_or("localhost", |(_, domain)| domain)
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}
