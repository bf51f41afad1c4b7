//! Sends a request head and a bare header terminator, then walks away
//! without reading. Used to see how a server copes with clients that stall
//! mid-request.

use crate::connection::Connection;
use crate::error::Result;
use crate::probe_config::ProbeConfig;
use crate::request::Request;
use crate::request_method::RequestMethod;
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_CGI_PATH: &str = "/cgi/no_inf_test.py";
pub static HEADERS_TERMINATOR: &[u8] = b"\r\n\r\n";

/// How the request head goes out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SendMode {
    /// One write for the head, one for the terminator.
    #[default]
    Whole,
    /// The head one byte at a time with `delay` after every byte, then the
    /// terminator in one write. Only used when asked for explicitly.
    Trickle { delay: Duration },
}

#[derive(Debug, Clone)]
pub struct PartialRequestProbe {
    config: ProbeConfig,
    path: String,
    host_header: Option<String>,
    mode: SendMode,
    hold_open: Option<Duration>,
}

impl PartialRequestProbe {
    pub fn new(config: ProbeConfig) -> Self {
        PartialRequestProbe {
            config,
            path: String::from(DEFAULT_CGI_PATH),
            host_header: None,
            mode: SendMode::Whole,
            hold_open: None,
        }
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();

        self
    }

    /// Value of the `Host` header. Defaults to the configured host.
    pub fn host_header(mut self, host: &str) -> Self {
        self.host_header = Some(host.to_string());

        self
    }

    pub fn mode(mut self, mode: SendMode) -> Self {
        self.mode = mode;

        self
    }

    /// Keep the socket open this long after the last write.
    pub fn hold_open(mut self, hold_open: Duration) -> Self {
        self.hold_open = Some(hold_open);

        self
    }

    pub fn head_bytes(&self) -> Result<Vec<u8>> {
        let host = self.host_header.as_deref().unwrap_or(&self.config.host);

        let request = Request::builder(RequestMethod::Get, &self.path)
            .header("Host", host)
            .get()?;

        Ok(request.head_bytes())
    }

    /// Writes the head and the terminator to `stream`, returning everything
    /// written.
    pub fn send_on<W: Write>(&self, stream: &mut W) -> Result<Vec<u8>> {
        let head = self.head_bytes()?;

        match self.mode {
            SendMode::Whole => stream.write_all(&head)?,
            SendMode::Trickle { delay } => {
                for byte in &head {
                    stream.write_all(std::slice::from_ref(byte))?;
                    stream.flush()?;
                    log::trace!("sent {:?}", *byte as char);
                    std::thread::sleep(delay);
                }
            }
        }
        stream.write_all(HEADERS_TERMINATOR)?;
        stream.flush()?;

        let mut sent = head;
        sent.extend_from_slice(HEADERS_TERMINATOR);
        log::debug!("sent {} bytes in {:?} mode", sent.len(), self.mode);

        Ok(sent)
    }

    /// Connects, sends, optionally lingers, then releases the socket.
    pub fn run(&self) -> Result<Vec<u8>> {
        let mut connection = Connection::open(&self.config)?;
        let sent = self.send_on(&mut connection)?;

        if let Some(hold_open) = self.hold_open {
            log::info!("holding connection open for {hold_open:?}");
            std::thread::sleep(hold_open);
        }

        drop(connection);
        log::info!("sent {} bytes to {}, connection released", sent.len(), self.config.address());

        Ok(sent)
    }
}
