use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::http::writer::serialize_response;

/// HTTP status codes the responder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use tunnel_responder::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
        }
    }
}

/// Protocol version written on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
}

impl HttpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
        }
    }
}

/// Line terminator used between the status line, headers and body.
///
/// Both styles exist on the wire and are reproduced as-is, never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    Lf,
    #[default]
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// A complete HTTP response before serialization.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub version: HttpVersion,
    pub line_ending: LineEnding,
    /// Headers in wire order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Looks up a header value, ignoring name case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Freezes the serialized response into a payload.
    pub fn to_payload(&self) -> ResponsePayload {
        ResponsePayload::from_bytes(serialize_response(self))
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use tunnel_responder::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hi".to_vec())
///     .build();
/// assert_eq!(response.header("content-length"), Some("2"));
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    version: HttpVersion,
    line_ending: LineEnding,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    auto_content_length: bool,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            version: HttpVersion::default(),
            line_ending: LineEnding::default(),
            headers: Vec::new(),
            body: Vec::new(),
            auto_content_length: true,
        }
    }

    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Adds a header, replacing an existing one with the same name
    /// (case-insensitive) in place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Whether `build` appends a Content-Length header when none was set.
    pub fn auto_content_length(mut self, enabled: bool) -> Self {
        self.auto_content_length = enabled;
        self
    }

    /// Builds the final Response.
    ///
    /// An explicit Content-Length header is kept verbatim even if it does not
    /// match the body.
    pub fn build(mut self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));
        if self.auto_content_length && !has_length {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            version: self.version,
            line_ending: self.line_ending,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// The immutable bytes written to every connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload(Bytes);

impl ResponsePayload {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// `HTTP/1.0 200 OK\n\nHello from ngrok!`
    pub fn ngrok_greeting() -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .version(HttpVersion::Http10)
            .line_ending(LineEnding::Lf)
            .auto_content_length(false)
            .body("Hello from ngrok!")
            .build()
            .to_payload()
    }

    /// HTTP/1.1 plain-text greeting with explicit headers.
    ///
    /// The advertised length of 18 excludes the trailing newline; it is kept
    /// as-is to match the established wire bytes.
    pub fn plain_text_greeting() -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Content-Length", "18")
            .body("Hello from Java 21\n")
            .build()
            .to_payload()
    }

    pub fn from_template(template: ResponseTemplate) -> Self {
        match template {
            ResponseTemplate::Ngrok => Self::ngrok_greeting(),
            ResponseTemplate::PlainText => Self::plain_text_greeting(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which built-in response the whole process answers with.
///
/// Chosen once at startup and shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseTemplate {
    #[default]
    Ngrok,
    PlainText,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown response template {0:?} (expected \"ngrok\" or \"plain\")")]
pub struct UnknownTemplate(pub String);

impl FromStr for ResponseTemplate {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ngrok" => Ok(ResponseTemplate::Ngrok),
            "plain" | "plain-text" => Ok(ResponseTemplate::PlainText),
            _ => Err(UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for ResponseTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseTemplate::Ngrok => f.write_str("ngrok"),
            ResponseTemplate::PlainText => f.write_str("plain"),
        }
    }
}
