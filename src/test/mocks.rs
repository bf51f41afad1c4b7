use std::io::{ErrorKind, Read, Write};

/// In-memory stand-in for a socket: serves `read_buf` back in reads of at most
/// `max_read` bytes and records every write.
pub struct MockReadWrite {
    pub(crate) read_buf: Vec<u8>,
    pub(crate) write_buf: Vec<u8>,
    pub(crate) writes: Vec<Vec<u8>>,
    max_read: usize,
    next_read_error: Option<ErrorKind>,
    end_of_data_error: Option<ErrorKind>,
}

impl MockReadWrite {
    pub fn new(read_buf: Vec<u8>) -> Self {
        MockReadWrite {
            read_buf,
            write_buf: vec![],
            writes: vec![],
            max_read: usize::MAX,
            next_read_error: None,
            end_of_data_error: None,
        }
    }

    pub fn max_read(mut self, max_read: usize) -> Self {
        self.max_read = max_read;

        self
    }

    pub fn fail_next_read(mut self, kind: ErrorKind) -> Self {
        self.next_read_error = Some(kind);

        self
    }

    /// Report `kind` once the scripted data runs out, instead of a clean EOF.
    pub fn fail_after_data(mut self, kind: ErrorKind) -> Self {
        self.end_of_data_error = Some(kind);

        self
    }
}

impl Read for MockReadWrite {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(kind) = self.next_read_error.take() {
            return Err(kind.into());
        }

        if self.read_buf.is_empty() {
            return match self.end_of_data_error.take() {
                Some(kind) => Err(kind.into()),
                None => Ok(0),
            };
        }

        let n = buf.len().min(self.max_read).min(self.read_buf.len());
        buf[..n].copy_from_slice(&self.read_buf[..n]);
        self.read_buf.drain(..n);

        Ok(n)
    }
}

impl Write for MockReadWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_buf.extend_from_slice(buf);
        self.writes.push(buf.to_vec());

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
