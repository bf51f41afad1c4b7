use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("`{0}` is not a valid TLS server name")]
    InvalidServerName(String),

    #[error("invalid request target {0:?}")]
    InvalidRequestTarget(String),

    #[error("invalid header `{name}: {value}`")]
    InvalidHeader { name: String, value: String },

    #[error("could not load CA certificates: {0}")]
    CaCertificates(String),

    #[error("could not read body file {path:?}: {source}")]
    BodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    /// True when the underlying socket gave up waiting (read/write timeout hit).
    pub fn is_timeout(&self) -> bool {
        match self {
            ProbeError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}
