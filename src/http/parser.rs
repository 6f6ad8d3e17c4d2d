use crate::config::HttpConfig;
use crate::http::request::{is_chunked, Method, Request};
use crate::http::response::StatusCode;
use std::collections::HashMap;

/// Longest chunk-size line accepted before the terminator shows up.
const MAX_CHUNK_LINE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("unknown method")]
    InvalidMethod,
    #[error("method not implemented")]
    UnsupportedMethod,
    #[error("HTTP version not supported")]
    UnsupportedVersion,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("invalid Content-Length")]
    InvalidContentLength,
    #[error("request body needs a Content-Length")]
    LengthRequired,
    #[error("malformed chunked body")]
    InvalidChunk,
    #[error("request head too large")]
    HeadersTooLarge,
    #[error("request body too large")]
    BodyTooLarge,
    #[error("request incomplete")]
    Incomplete,
}

impl ParseError {
    /// Status line sent back for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::InvalidMethod => StatusCode::MethodNotAllowed,
            ParseError::UnsupportedMethod => StatusCode::NotImplemented,
            ParseError::UnsupportedVersion => StatusCode::VersionNotSupported,
            ParseError::LengthRequired => StatusCode::LengthRequired,
            ParseError::InvalidRequest
            | ParseError::InvalidHeader
            | ParseError::InvalidContentLength
            | ParseError::InvalidChunk
            | ParseError::HeadersTooLarge
            | ParseError::BodyTooLarge
            | ParseError::Incomplete => StatusCode::BadRequest,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for ParseLimits {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            max_header_bytes: cfg.max_header_bytes,
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}

pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_http_request_with(buf, &ParseLimits::default())
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// `ParseError::Incomplete` when more input is needed. A malformed request
/// line is reported as soon as its terminator arrives, without waiting for
/// the rest of the head.
pub fn parse_http_request_with(
    buf: &[u8],
    limits: &ParseLimits,
) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let Some(headers_end) = find_headers_end(buf) else {
        if let Some(line_end) = find_crlf(buf) {
            parse_request_line(&buf[..line_end])?;
        }
        if buf.len() > limits.max_header_bytes {
            return Err(ParseError::HeadersTooLarge);
        }
        return Err(ParseError::Incomplete);
    };

    if headers_end > limits.max_header_bytes {
        return Err(ParseError::HeadersTooLarge);
    }

    let header_bytes = &buf[..headers_end];
    let body_start = headers_end + 4;

    let mut lines = header_bytes.split_crlf();

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method, uri, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let (key, value) = parse_header_line(line)?;
        headers.insert(key.to_string(), value.to_string());
    }

    // Body
    let (body, total_consumed) = if is_chunked(&headers) {
        let (body, used) = decode_chunked(&buf[body_start..], limits)?;
        (body, body_start + used)
    } else if let Some(value) = headers.get("Content-Length") {
        let content_length = value
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)?;

        if content_length > limits.max_body_bytes {
            return Err(ParseError::BodyTooLarge);
        }
        if buf.len() - body_start < content_length {
            return Err(ParseError::Incomplete);
        }

        (
            buf[body_start..body_start + content_length].to_vec(),
            body_start + content_length,
        )
    } else if method.is_bodyless() {
        (Vec::new(), body_start)
    } else {
        return Err(ParseError::LengthRequired);
    };

    let request = Request {
        method,
        uri: uri.to_string(),
        version: version.to_string(),
        headers,
        body,
    };

    Ok((request, total_consumed))
}

/// `METHOD SP URI SP HTTP-VERSION`, nothing else.
fn parse_request_line(line: &[u8]) -> Result<(Method, &str, &str), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidRequest)?;

    let mut parts = line.split(' ');
    let (Some(method_str), Some(uri), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequest);
    };

    if method_str.is_empty() || !method_str.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidRequest);
    }
    if uri.is_empty() || uri.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidRequest);
    }
    if !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    if !method.is_routable() {
        return Err(ParseError::UnsupportedMethod);
    }
    if version != "HTTP/1.1" {
        return Err(ParseError::UnsupportedVersion);
    }

    Ok((method, uri, version))
}

/// `name: value`, where the first colon is followed by exactly one space.
fn parse_header_line(line: &[u8]) -> Result<(&str, &str), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidHeader)?;

    let (key, rest) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
    let value = rest.strip_prefix(' ').ok_or(ParseError::InvalidHeader)?;

    if key.is_empty() {
        return Err(ParseError::InvalidHeader);
    }

    Ok((key, value))
}

/// Decodes a chunked body from the front of `buf`, trailers included.
///
/// Chunk data counts against `max_body_bytes`; the trailer section,
/// including any line still waiting for its CRLF, against `max_header_bytes`.
fn decode_chunked(buf: &[u8], limits: &ParseLimits) -> Result<(Vec<u8>, usize), ParseError> {
    let mut body = Vec::new();
    let mut pos = 0;

    loop {
        let Some(line_len) = find_crlf(&buf[pos..]) else {
            if buf.len() - pos > MAX_CHUNK_LINE {
                return Err(ParseError::InvalidChunk);
            }
            return Err(ParseError::Incomplete);
        };

        let size = parse_chunk_size(&buf[pos..pos + line_len])?;
        pos += line_len + 2;

        if size == 0 {
            // Trailer section ends at the first empty line
            let trailer_start = pos;
            loop {
                let Some(line_len) = find_crlf(&buf[pos..]) else {
                    if buf.len() - trailer_start > limits.max_header_bytes {
                        return Err(ParseError::HeadersTooLarge);
                    }
                    return Err(ParseError::Incomplete);
                };
                pos += line_len + 2;
                if line_len == 0 {
                    return Ok((body, pos));
                }
                if pos - trailer_start > limits.max_header_bytes {
                    return Err(ParseError::HeadersTooLarge);
                }
            }
        }

        let new_len = body
            .len()
            .checked_add(size)
            .ok_or(ParseError::BodyTooLarge)?;
        if new_len > limits.max_body_bytes {
            return Err(ParseError::BodyTooLarge);
        }
        if buf.len() - pos < size + 2 {
            return Err(ParseError::Incomplete);
        }

        body.extend_from_slice(&buf[pos..pos + size]);
        pos += size;

        if &buf[pos..pos + 2] != b"\r\n" {
            return Err(ParseError::InvalidChunk);
        }
        pos += 2;
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidChunk)?;
    // Chunk extensions are ignored
    let digits = line.split_once(';').map_or(line, |(size, _)| size).trim();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidChunk);
    }

    usize::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidChunk)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2)
        .position(|w| w == b"\r\n")
}

trait SplitCrlf {
    fn split_crlf(&self) -> CrlfLines<'_>;
}

impl SplitCrlf for [u8] {
    fn split_crlf(&self) -> CrlfLines<'_> {
        CrlfLines { rest: Some(self) }
    }
}

struct CrlfLines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for CrlfLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match find_crlf(rest) {
            Some(end) => {
                self.rest = Some(&rest[end + 2..]);
                Some(&rest[..end])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}
