//! Large POST body against a CGI endpoint, response streamed back.

use crate::connection::Connection;
use crate::error::{ProbeError, Result};
use crate::header::CONTENT_LENGTH;
use crate::probe_config::ProbeConfig;
use crate::request::Request;
use crate::request_method::RequestMethod;
use crate::response_head::{parse_response_head, ResponseHead};
use crate::response_reader::{exchange, ProgressSink, ResponseCapture, StdoutProgress};
use crate::utils::format_kib;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

pub const DEFAULT_CGI_PATH: &str = "/cgi/no_access.py";
pub const DEFAULT_BODY_SIZE: usize = 1024 * 1024;
pub const DEFAULT_FILL: u8 = b'0';
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone)]
pub enum BodySource {
    /// `size` copies of `byte`.
    Fill { size: usize, byte: u8 },
    File(PathBuf),
}

impl BodySource {
    fn load(&self) -> Result<Vec<u8>> {
        match self {
            BodySource::Fill { size, byte } => Ok(vec![*byte; *size]),
            BodySource::File(path) => fs::read(path).map_err(|source| ProbeError::BodyFile {
                path: path.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug)]
pub struct BulkPostReport {
    pub request_len: usize,
    pub body_len: usize,
    pub capture: ResponseCapture,
    pub head: Option<ResponseHead>,
}

impl BulkPostReport {
    pub fn print_summary(&self) {
        println!("\n✅ Final total received: {}", format_kib(self.capture.total()));
        println!("\n🔽 Response:");
        println!("{}", self.capture.text());
    }
}

#[derive(Debug, Clone)]
pub struct BulkPostProbe {
    config: ProbeConfig,
    path: String,
    body: BodySource,
    content_type: Option<String>,
}

impl BulkPostProbe {
    pub fn new(config: ProbeConfig) -> Self {
        BulkPostProbe {
            config,
            path: String::from(DEFAULT_CGI_PATH),
            body: BodySource::Fill {
                size: DEFAULT_BODY_SIZE,
                byte: DEFAULT_FILL,
            },
            content_type: None,
        }
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();

        self
    }

    pub fn body_size(mut self, size: usize) -> Self {
        let byte = match self.body {
            BodySource::Fill { byte, .. } => byte,
            BodySource::File(_) => DEFAULT_FILL,
        };
        self.body = BodySource::Fill { size, byte };

        self
    }

    pub fn fill(mut self, byte: u8) -> Self {
        let size = match self.body {
            BodySource::Fill { size, .. } => size,
            BodySource::File(_) => DEFAULT_BODY_SIZE,
        };
        self.body = BodySource::Fill { size, byte };

        self
    }

    pub fn body_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.body = BodySource::File(path.into());

        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());

        self
    }

    fn resolve_content_type(&self) -> String {
        if let Some(content_type) = &self.content_type {
            return content_type.clone();
        }

        match &self.body {
            BodySource::File(path) => mime_guess::from_path(path)
                .first_or_text_plain()
                .essence_str()
                .to_string(),
            BodySource::Fill { .. } => DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn build_request(&self) -> Result<Request> {
        let body = self.body.load()?;

        Request::builder(RequestMethod::Post, &self.path)
            .header("Host", &self.config.host)
            .header(CONTENT_LENGTH, &body.len().to_string())
            .header("Content-Type", &self.resolve_content_type())
            .header("Connection", "close")
            .body(body)
            .get()
    }

    /// Runs the probe over an already connected stream without printing
    /// anything besides what `progress` does.
    pub fn run_on<S, P>(&self, stream: &mut S, progress: &mut P) -> Result<BulkPostReport>
    where
        S: Read + Write,
        P: ProgressSink + ?Sized,
    {
        let request = self.build_request()?;

        self.send(&request, stream, progress)
    }

    /// Sends an already built request over `stream` and collects the answer.
    pub fn send<S, P>(&self, request: &Request, stream: &mut S, progress: &mut P) -> Result<BulkPostReport>
    where
        S: Read + Write,
        P: ProgressSink + ?Sized,
    {
        log::debug!("{request:?}");

        let request_bytes = request.as_bytes();
        let capture = exchange(stream, &request_bytes, progress)?;
        let head = parse_response_head(capture.bytes());

        match &head {
            Some(head) => log::info!(
                "server answered {} {} {}",
                head.version,
                head.status_code,
                head.reason
            ),
            None if capture.is_empty() => log::info!("server closed without answering"),
            None => log::info!("response does not start with a status line"),
        }

        Ok(BulkPostReport {
            request_len: request_bytes.len(),
            body_len: request.body().len(),
            capture,
            head,
        })
    }

    /// Builds the request, then connects, sends it, streams the response to
    /// stdout and closes the connection. Nothing is dialed if the request
    /// cannot be built.
    pub fn run(&self) -> Result<BulkPostReport> {
        let request = self.build_request()?;
        println!(
            "📤 Sending {} body to CGI script...",
            format_kib(request.body().len())
        );

        let report = {
            let mut connection = Connection::open(&self.config)?;
            self.send(&request, &mut connection, &mut StdoutProgress)?
        };

        report.print_summary();

        Ok(report)
    }
}

#[cfg(test)]
mod test {
    mod bulk_post {
        use crate::bulk_post::{BulkPostProbe, DEFAULT_BODY_SIZE};
        use crate::error::ProbeError;
        use crate::probe_config::ProbeConfig;
        use crate::test::mocks::MockReadWrite;

        #[test]
        fn default_request_matches_original_layout() {
            let request = BulkPostProbe::new(ProbeConfig::bulk_post_default())
                .build_request()
                .unwrap();

            let bytes = request.as_bytes();
            let head = b"POST /cgi/no_access.py HTTP/1.1\r\nHost: 127.0.0.1\r\nContent-Length: 1048576\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n";

            assert_eq!(&bytes[..head.len()], head);
            assert_eq!(bytes.len(), head.len() + DEFAULT_BODY_SIZE);
            assert!(bytes[head.len()..].iter().all(|&b| b == b'0'));
        }

        #[test]
        fn content_length_tracks_body_size() {
            for size in [0, 1, 8192, DEFAULT_BODY_SIZE] {
                let request = BulkPostProbe::new(ProbeConfig::default())
                    .body_size(size)
                    .build_request()
                    .unwrap();

                assert_eq!(request.content_length(), Some(request.body().len()));
                assert_eq!(request.body().len(), size);
            }
        }

        #[test]
        fn fill_and_size_combine() {
            let request = BulkPostProbe::new(ProbeConfig::default())
                .fill(b'a')
                .body_size(3)
                .build_request()
                .unwrap();

            assert_eq!(request.body(), b"aaa");
        }

        #[test]
        fn content_type_guessed_from_body_file() {
            let path = std::env::temp_dir().join("http_probe_body_test.json");
            std::fs::write(&path, br#"{"a":1}"#).unwrap();

            let request = BulkPostProbe::new(ProbeConfig::default())
                .body_file(&path)
                .build_request()
                .unwrap();

            assert_eq!(request.get_header("Content-Type"), Some("application/json"));
            assert_eq!(request.content_length(), Some(7));

            std::fs::remove_file(path).unwrap();
        }

        #[test]
        fn explicit_content_type_wins_over_guess() {
            let path = std::env::temp_dir().join("http_probe_override_test.json");
            std::fs::write(&path, b"[]").unwrap();

            let request = BulkPostProbe::new(ProbeConfig::default())
                .body_file(&path)
                .content_type("application/x-www-form-urlencoded")
                .build_request()
                .unwrap();

            assert_eq!(
                request.get_header("Content-Type"),
                Some("application/x-www-form-urlencoded")
            );

            std::fs::remove_file(path).unwrap();
        }

        #[test]
        fn missing_body_file_is_reported() {
            let result = BulkPostProbe::new(ProbeConfig::default())
                .body_file("does/not/exist.bin")
                .build_request();

            assert!(matches!(result, Err(ProbeError::BodyFile { .. })));
        }

        #[test]
        fn run_on_reports_response_head() {
            let mut stream = MockReadWrite::new(
                b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n".to_vec(),
            );

            let report = BulkPostProbe::new(ProbeConfig::default())
                .body_size(16)
                .run_on(&mut stream, &mut |_: usize, _: usize| {})
                .unwrap();

            assert_eq!(report.body_len, 16);
            assert_eq!(report.request_len, stream.write_buf.len());
            assert_eq!(report.head.map(|head| head.status_code), Some(403));
        }
    }
}
