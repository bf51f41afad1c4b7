use crate::http_version::HttpVersion;
use std::str::FromStr;

/// Status line and headers found at the start of a captured response.
#[derive(Debug, PartialEq, Eq)]
pub struct ResponseHead {
    pub version: HttpVersion,
    pub status_code: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    /// Offset of the first body byte in the captured bytes.
    pub body_offset: usize,
}

impl ResponseHead {
    pub fn get_header(&self, header_name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header_name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

fn take_until_crlf<'a>(iterator: &mut impl Iterator<Item = &'a u8>) -> Option<Vec<u8>> {
    let mut values: Vec<u8> = vec![];

    for value in iterator {
        if *value == b'\n' {
            return match values.pop() {
                Some(b'\r') => Some(values),
                _ => None,
            };
        }

        values.push(*value);
    }

    None
}

fn parse_status_line(line: &[u8]) -> Option<(HttpVersion, u16, String)> {
    let line = std::str::from_utf8(line).ok()?;
    let mut parts = line.splitn(3, ' ');

    let version = HttpVersion::from_str(parts.next()?).ok()?;
    let status_code = parts.next()?.parse::<u16>().ok()?;
    if !(100..=599).contains(&status_code) {
        return None;
    }
    let reason = parts.next().unwrap_or_default().to_string();

    Some((version, status_code, reason))
}

/// Best-effort parse of a response head. Returns `None` when the bytes do not
/// start with a complete, well-formed status line and header block.
pub fn parse_response_head(bytes: &[u8]) -> Option<ResponseHead> {
    let mut bytes_iter = bytes.iter();

    let status_line = take_until_crlf(bytes_iter.by_ref())?;
    let (version, status_code, reason) = parse_status_line(&status_line)?;

    let mut headers: Vec<(String, String)> = vec![];
    loop {
        let line = take_until_crlf(bytes_iter.by_ref())?;
        if line.is_empty() {
            break;
        }

        let line = String::from_utf8_lossy(&line);
        let (name, value) = line.split_once(':')?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    Some(ResponseHead {
        version,
        status_code,
        reason,
        headers,
        body_offset: bytes.len() - bytes_iter.as_slice().len(),
    })
}
