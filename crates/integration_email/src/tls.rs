use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, TlsStream};
use tracing::warn;

use crate::{EmailError, SmtpConfig};

fn build_connector(config: &SmtpConfig) -> Result<TlsConnector, EmailError> {
    let mut builder = native_tls::TlsConnector::builder();

    if config.accept_invalid_certs {
        warn!(host = %config.host, "TLS certificate verification disabled for SMTP relay");
        builder.danger_accept_invalid_certs(true);
    }
    builder.min_protocol_version(Some(native_tls::Protocol::Tlsv12));

    let connector = builder
        .build()
        .map_err(|e| EmailError::Tls(format!("TLS builder failed: {e}")))?;
    Ok(TlsConnector::from(connector))
}

/// Runs the TLS handshake against the configured host
pub(crate) async fn wrap(
    config: &SmtpConfig,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>, EmailError> {
    build_connector(config)?
        .connect(&config.host, stream)
        .await
        .map_err(|e| EmailError::Tls(format!("TLS handshake failed: {e}")))
}
