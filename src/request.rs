use crate::error::{ProbeError, Result};
use crate::header::{is_header_valid, CONTENT_LENGTH};
use crate::http_version::HttpVersion;
use crate::request_method::RequestMethod;
use crate::token::is_valid_request_target;
use std::fmt;

const SPACE: u8 = b' ';
pub(crate) static CRLF: [u8; 2] = [b'\r', b'\n'];

/// A request exactly as it will go on the wire.
///
/// Headers keep their insertion order, so probes can reproduce a specific
/// header layout byte for byte.
pub struct Request {
    method: RequestMethod,
    url: String,
    version: HttpVersion,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    pub fn builder(method: RequestMethod, url: &str) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn get_header(&self, header_name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header_name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_length(&self) -> Option<usize> {
        self.get_header(CONTENT_LENGTH)
            .and_then(|value| value.parse::<usize>().ok())
    }

    /// Request line followed by every header line, without the blank line
    /// that closes the header block.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::with_capacity(128);

        bytes.extend_from_slice(self.method.as_str().as_bytes());
        bytes.push(SPACE);
        bytes.extend_from_slice(self.url.as_bytes());
        bytes.push(SPACE);
        bytes.extend_from_slice(self.version.as_str().as_bytes());
        bytes.extend_from_slice(&CRLF);

        for (header_name, header_value) in &self.headers {
            bytes.extend_from_slice(header_name.as_bytes());
            bytes.push(b':');
            bytes.push(SPACE);
            bytes.extend_from_slice(header_value.as_bytes());
            bytes.extend_from_slice(&CRLF);
        }

        bytes
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = self.head_bytes();

        bytes.reserve(CRLF.len() + self.body.len());
        bytes.extend_from_slice(&CRLF);
        bytes.extend_from_slice(&self.body);

        bytes
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &format!("{} bytes", self.body.len()))
            .finish()
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    pub fn new(method: RequestMethod, url: &str) -> Self {
        RequestBuilder {
            request: Request {
                method,
                url: url.to_string(),
                version: HttpVersion::Http1_1,
                headers: vec![],
                body: vec![],
            },
        }
    }

    pub fn header(mut self, header_name: &str, header_value: &str) -> Self {
        self.request
            .headers
            .push((header_name.to_string(), header_value.to_string()));

        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.request.body = body;

        self
    }

    /// Validates the request target and every header, and fills in
    /// `Content-Length` when the body needs one and none was given.
    pub fn get(mut self) -> Result<Request> {
        if !is_valid_request_target(&self.request.url) {
            return Err(ProbeError::InvalidRequestTarget(self.request.url));
        }

        if let Some((name, value)) = self
            .request
            .headers
            .iter()
            .find(|(name, value)| !is_header_valid(name, value))
        {
            return Err(ProbeError::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            });
        }

        let needs_length = !self.request.body.is_empty() || self.request.method.sends_body();
        if needs_length && self.request.get_header(CONTENT_LENGTH).is_none() {
            let len = self.request.body.len();
            self = self.header(CONTENT_LENGTH, &len.to_string());
        }

        Ok(self.request)
    }
}
