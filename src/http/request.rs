use std::collections::HashMap;

/// The request methods the parser recognizes.
///
/// Only GET, HEAD and POST are routable; the rest are answered with
/// 501 Not Implemented. Anything outside this set is a 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
}

const METHODS: [(&str, Method); 7] = [
    ("GET", Method::GET),
    ("HEAD", Method::HEAD),
    ("POST", Method::POST),
    ("PUT", Method::PUT),
    ("DELETE", Method::DELETE),
    ("CONNECT", Method::CONNECT),
    ("OPTIONS", Method::OPTIONS),
];

/// One parsed request.
///
/// Header names are kept exactly as received, so lookups are case-sensitive.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Target including any query string, e.g. `/play.html/guess?word=CRANE`.
    pub uri: String,
    /// Always `HTTP/1.1` once parsed.
    pub version: String,
    pub headers: HashMap<String, String>,
    /// Fixed-length or de-chunked body.
    pub body: Vec<u8>,
}

/// Assembles a [`Request`] by hand; the version defaults to `HTTP/1.1`.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    uri: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Case-sensitive lookup of a method token.
    ///
    /// ```
    /// # use wordle_server::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("TRACE"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        METHODS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, method)| *method)
    }

    pub fn as_str(&self) -> &'static str {
        METHODS
            .iter()
            .find(|(_, method)| method == self)
            .map_or("", |(name, _)| *name)
    }

    /// Whether the server has any route that accepts this method.
    pub fn is_routable(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD | Method::POST)
    }

    /// GET and HEAD carry no body and need no `Content-Length`.
    pub fn is_bodyless(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            uri: self.uri.ok_or("uri missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// The target without its query string.
    pub fn path(&self) -> &str {
        self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _)| path)
    }

    /// The raw query string, if the target has one.
    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }

    /// Whether the body was framed with chunked transfer-encoding.
    pub fn is_chunked(&self) -> bool {
        is_chunked(&self.headers)
    }

    /// The raw value of the `SESSID` pair in the `Cookie` header.
    pub fn session_cookie(&self) -> Option<&str> {
        self.header("Cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == "SESSID")
            .map(|(_, value)| value)
    }
}

pub(crate) fn is_chunked(headers: &HashMap<String, String>) -> bool {
    headers
        .get("Transfer-Encoding")
        .is_some_and(|v| v.contains("chunked"))
}
