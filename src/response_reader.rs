//! Write a request, then drain the peer until it closes the stream.

use crate::error::Result;
use std::io::{ErrorKind, Read, Write};

/// Size of the buffer handed to each `read` call.
pub const CHUNK_SIZE: usize = 8192;

/// Receives a callback for every non-empty chunk read from the peer.
pub trait ProgressSink {
    fn on_chunk(&mut self, chunk_len: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_chunk(&mut self, chunk_len: usize, total: usize) {
        self(chunk_len, total)
    }
}

/// Prints one progress line per chunk on stdout.
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn on_chunk(&mut self, chunk_len: usize, total: usize) {
        println!("📦 Received {chunk_len} bytes, total: {total}");
    }
}

/// Everything read back from the peer for one request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseCapture {
    bytes: Vec<u8>,
    chunks: Vec<usize>,
}

impl ResponseCapture {
    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
        self.chunks.push(chunk.len());
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sizes of the individual reads, in arrival order.
    pub fn chunks(&self) -> &[usize] {
        &self.chunks
    }

    pub fn total(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The response decoded as UTF-8, undecodable bytes replaced with U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Sends `request` in one go and reads until end of stream.
///
/// Blocks for as long as the peer keeps the connection open without sending
/// anything, unless the stream has a read timeout of its own.
pub fn exchange<S, P>(stream: &mut S, request: &[u8], progress: &mut P) -> Result<ResponseCapture>
where
    S: Read + Write,
    P: ProgressSink + ?Sized,
{
    stream.write_all(request)?;
    stream.flush()?;
    log::debug!("request written, {} bytes", request.len());

    let mut capture = ResponseCapture::default();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            // rustls reports a peer that hung up without close_notify this way
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                log::warn!("peer closed the stream without a clean shutdown");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        capture.push(&buf[..n]);
        log::trace!("read {n} bytes, total {}", capture.total());
        progress.on_chunk(n, capture.total());
    }

    log::debug!(
        "peer closed the stream after {} bytes in {} reads",
        capture.total(),
        capture.chunks().len()
    );

    Ok(capture)
}
