//! Network infrastructure: implements `NetworkProbe` with tokio sockets.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::application::ports::NetworkProbe;
use crate::domain::probe::{DockerEndpoint, PING_READ_LIMIT, PING_REQUEST, whole_seconds};
use crate::infra::tls;

/// Production implementation that performs real network checks.
pub struct TokioNetworkProbe;

impl NetworkProbe for TokioNetworkProbe {
    async fn tcp_connect(&self, host: &str, port: u16, timeout: Duration) -> Result<()> {
        bounded(host, port, timeout, async {
            connect(host, port).await?;
            Ok(())
        })
        .await
    }

    async fn docker_ping(&self, endpoint: &DockerEndpoint, timeout: Duration) -> Result<Vec<u8>> {
        let host = endpoint.host.as_str();
        bounded(host, endpoint.port, timeout, async {
            let mut tcp = connect(host, endpoint.port).await?;
            if !endpoint.tls {
                return exchange(&mut tcp).await;
            }

            let ca_cert = endpoint.ca_cert.as_deref().map(Path::new);
            let config = tls::client_config(endpoint.insecure, ca_cert)?;
            let name = ServerName::try_from(host.to_string())
                .with_context(|| format!("invalid TLS server name: {host}"))?;
            let mut stream = TlsConnector::from(config)
                .connect(name, tcp)
                .await
                .with_context(|| format!("TLS handshake with {host}:{} failed", endpoint.port))?;
            exchange(&mut stream).await
        })
        .await
    }
}

async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    TcpStream::connect((host, port))
        .await
        .with_context(|| format!("connection to {host}:{port} failed"))
}

/// Send the ping and return the first chunk of the response.
async fn exchange<S>(stream: &mut S) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(PING_REQUEST)
        .await
        .context("failed to send ping")?;
    let mut buf = vec![0u8; PING_READ_LIMIT];
    let n = stream
        .read(&mut buf)
        .await
        .context("failed to read ping response")?;
    buf.truncate(n);
    Ok(buf)
}

async fn bounded<T>(
    host: &str,
    port: u16,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        anyhow::anyhow!(
            "connection to {host}:{port} timed out after {}s",
            whole_seconds(timeout)
        )
    })?
}
