//! Sort value representation.
//!
//! A sort value is an opaque, immutable byte sequence ordered by unsigned
//! lexicographic comparison. A document's value may be absent, which the
//! engine models as `Option<SortValue>::None`. Segments with a degraded
//! storage format cannot represent absence and substitute
//! [`SortValue::EMPTY`] instead; see [`crate::segment::ValueSource`].

use bytes::Bytes;
use std::fmt;

/// An immutable byte-sequence sort value.
///
/// Ordering is unsigned lexicographic over the raw bytes. Cloning is cheap:
/// the payload is reference-counted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SortValue(Bytes);

impl SortValue {
    /// The empty value, which sorts before every other value.
    ///
    /// Degraded segments report this for documents whose value is absent.
    pub const EMPTY: Self = Self(Bytes::new());

    /// Creates a value from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes of this value.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of this value in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this is the empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SortValue {
    fn from(s: &str) -> Self {
        Self(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for SortValue {
    fn from(s: String) -> Self {
        Self(Bytes::from(s.into_bytes()))
    }
}

impl From<Vec<u8>> for SortValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{s:?}"),
            Err(_) => write!(f, "0x{}", hex(&self.0)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
