//! The raw, per-request view the engine reads from.
//!
//! A [`RawView`] is filled by the transport layer before validation and is
//! never modified by the engine. Path captures stay percent-encoded, the
//! query string stays raw, and headers keep arrival order with duplicates.

use std::io::{self, Read};

use bytes::Bytes;

// ============================================================================
// MULTIPART PART
// ============================================================================

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Full size when the part was read from a stream and only a prefix was
    /// buffered.
    pub declared_size: Option<u64>,
    /// Whether `data` holds only a prefix of the part.
    pub truncated: bool,
}

impl Part {
    /// A plain form field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Bytes::from(value.into()),
            ..Self::default()
        }
    }

    /// A file part held fully in memory.
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
            ..Self::default()
        }
    }

    /// A file part read from a stream, buffering at most `limit` bytes.
    ///
    /// The rest of the stream is drained and counted so that size checks
    /// see the real length without holding it in memory.
    pub fn from_reader(
        name: impl Into<String>,
        filename: Option<String>,
        content_type: Option<String>,
        mut reader: impl Read,
        limit: u64,
    ) -> io::Result<Self> {
        let mut buffer = Vec::new();
        (&mut reader).take(limit).read_to_end(&mut buffer)?;
        let rest = io::copy(&mut reader, &mut io::sink())?;
        let buffered = buffer.len() as u64;
        Ok(Self {
            name: name.into(),
            filename,
            content_type,
            data: Bytes::from(buffer),
            declared_size: Some(buffered + rest),
            truncated: rest > 0,
        })
    }

    /// Part size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.declared_size.unwrap_or(self.data.len() as u64)
    }

    /// Whether the part was sent as a file (carries a filename).
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }

    /// The part content as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text_value(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

// ============================================================================
// BODY
// ============================================================================

/// The request body as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawBody {
    #[default]
    None,
    Json(Bytes),
    Form(Bytes),
    Multipart(Vec<Part>),
}

// ============================================================================
// RAW VIEW
// ============================================================================

/// Raw request data keyed by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawView {
    path: Vec<(String, String)>,
    query: String,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: RawBody,
}

impl RawView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path capture, still percent-encoded.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.push((name.into(), value.into()));
        self
    }

    /// Sets the raw query string, without the leading `?`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = match query.strip_prefix('?') {
            Some(rest) => rest.to_owned(),
            None => query,
        };
        self
    }

    /// Adds a header. A `Cookie` header also fills the cookie list.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        if name.eq_ignore_ascii_case("cookie") {
            self.cookies.extend(parse_cookie_header(&value));
        }
        self.headers.push((name, value));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Adds every cookie of a `Cookie` header value (`a=1; b=2`).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        self.cookies.extend(parse_cookie_header(header));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_json_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RawBody::Json(body.into());
        self
    }

    /// Sets an `application/x-www-form-urlencoded` body.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_form_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RawBody::Form(body.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_multipart(mut self, parts: Vec<Part>) -> Self {
        self.body = RawBody::Multipart(parts);
        self
    }

    /// Appends one multipart part, switching the body to multipart.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_part(mut self, part: Part) -> Self {
        match &mut self.body {
            RawBody::Multipart(parts) => parts.push(part),
            _ => self.body = RawBody::Multipart(vec![part]),
        }
        self
    }

    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Headers in arrival order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn body(&self) -> &RawBody {
        &self.body
    }

    /// Multipart parts, empty for other bodies.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        match &self.body {
            RawBody::Multipart(parts) => parts,
            _ => &[],
        }
    }

    /// The first multipart part with this name.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts().iter().find(|part| part.name == name)
    }
}

fn parse_cookie_header(header: &str) -> impl Iterator<Item = (String, String)> + '_ {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        let name = name.trim();
        (!name.is_empty()).then(|| {
            let value = value.trim().trim_matches('"');
            (name.to_owned(), value.to_owned())
        })
    })
}
