use crate::error::{ProbeError, Result};
use crate::probe_config::ProbeConfig;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

type TlsStream = rustls::StreamOwned<rustls::ClientConnection, TcpStream>;

/// A connected client socket, plain or wrapped in TLS.
///
/// Dropping it closes the underlying TCP stream.
pub enum Connection {
    Plain(TcpStream),
    Tls(Box<TlsStream>),
}

impl Connection {
    pub fn open(config: &ProbeConfig) -> Result<Self> {
        // TLS setup can fail on local input alone, so it happens before the
        // target is dialed
        let tls_connection = if config.tls {
            Some(Self::client_connection(config)?)
        } else {
            None
        };

        log::debug!("connecting to {}", config.address());

        let stream = TcpStream::connect((config.host.as_str(), config.port))?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        let Some(tls_connection) = tls_connection else {
            return Ok(Connection::Plain(stream));
        };

        Ok(Connection::Tls(Box::new(rustls::StreamOwned::new(
            tls_connection,
            stream,
        ))))
    }

    fn client_connection(config: &ProbeConfig) -> Result<rustls::ClientConnection> {
        let client_config = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(config.load_root_store()?)
            .with_no_client_auth();
        let server_name = rustls::ServerName::try_from(config.host.as_str())
            .map_err(|_| ProbeError::InvalidServerName(config.host.clone()))?;
        let tls_connection = rustls::ClientConnection::new(Arc::new(client_config), server_name)?;

        log::debug!("tls session prepared for {}", config.host);

        Ok(tls_connection)
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Connection::Tls(_))
    }

    fn tcp(&self) -> &TcpStream {
        match self {
            Connection::Plain(stream) => stream,
            Connection::Tls(tls) => &tls.sock,
        }
    }

    pub fn peer_addr(&self) -> Option<std::net::SocketAddr> {
        self.tcp().peer_addr().ok()
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.read(buf),
            Connection::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.write(buf),
            Connection::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.flush(),
            Connection::Tls(tls) => tls.flush(),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Connection::Tls(tls) = self {
            tls.conn.send_close_notify();
            // best effort, the socket is going away either way
            while tls.conn.wants_write() {
                if tls.conn.write_tls(&mut tls.sock).is_err() {
                    break;
                }
            }
        }
        log::trace!("connection to {:?} released", self.peer_addr());
    }
}
