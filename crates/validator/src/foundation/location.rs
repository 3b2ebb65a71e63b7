//! Error locations (`loc`).
//!
//! A location is the ordered path from the request source down to the
//! offending value: `["body", "items", "2", "name"]`. Array indices are kept
//! as integers internally and stringified on serialization.

use std::borrow::Cow;
use std::fmt;

use gatehouse_schema::Source;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// One step of a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(Cow<'static, str>),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ordered path identifying where in the request an error occurred.
///
/// Most locations are two or three segments deep, so they live inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location(SmallVec<[Segment; 4]>);

impl Location {
    /// An empty location, used by leaf validators before the caller
    /// positions the error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A location rooted at a request source.
    #[must_use]
    pub fn root(source: Source) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Segment::Key(Cow::Borrowed(source.as_str())));
        Self(segments)
    }

    /// A copy of this location extended by an object key.
    #[must_use]
    pub fn key(&self, key: impl Into<Cow<'static, str>>) -> Self {
        let mut next = self.clone();
        next.0.push(Segment::Key(key.into()));
        next
    }

    /// A copy of this location extended by an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.0.push(Segment::Index(index));
        next
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// The segments as strings, as they appear on the wire.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(ToString::to_string))
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Location {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.0.len() == N
            && self
                .0
                .iter()
                .zip(other)
                .all(|(segment, expected)| segment.to_string() == *expected)
    }
}
