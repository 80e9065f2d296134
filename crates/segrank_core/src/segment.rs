//! Immutable segments and their value sources.
//!
//! A segment is a sealed, ordered run of documents. Each segment exposes a
//! [`ValueSource`] that resolves a document's sort value, and the engine
//! never mutates a segment after it has been built.
//!
//! ## Exact vs. degraded representation
//!
//! Not every segment format can represent an absent value. An *exact*
//! source reports `None` when a document carries no value. A *degraded*
//! source stands in the empty byte sequence for every absent document and
//! therefore never reports `None`. The distinction is a representation
//! limitation, not a semantic one: consumers that compare against true
//! semantics must treat the empty value and absence as equivalent for
//! degraded segments only.

use crate::error::{CoreError, CoreResult, LookupError};
use crate::types::{DocId, SegmentDocId, SegmentId};
use crate::value::SortValue;
use std::sync::Arc;

/// Resolves the stored sort value for a segment-local document position.
///
/// # Contract
///
/// Lookups must be deterministic for a given position for the lifetime of
/// the segment, and must tolerate being queried more than once per document
/// in any order. Lookups are synchronous and must not block.
pub trait ValueLookup: Send + Sync {
    /// Returns the number of documents this lookup covers.
    fn doc_count(&self) -> u32;

    /// Returns the stored value for `doc`, or `None` if the document has no
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be resolved. The engine treats
    /// this as a data-integrity failure and fails the whole query.
    fn value(&self, doc: SegmentDocId) -> Result<Option<SortValue>, LookupError>;
}

/// A segment's value source, tagged by representation.
///
/// The tag is dispatched explicitly wherever values are realized so that
/// degraded behavior is visible at the call site rather than hidden behind
/// null-coalescing.
#[derive(Clone)]
pub enum ValueSource {
    /// Exact representation: absent values are reported as `None`.
    Exact(Arc<dyn ValueLookup>),
    /// Degraded representation: absent values are reported as the empty
    /// value, never as `None`.
    Degraded(Arc<dyn ValueLookup>),
}

impl ValueSource {
    /// Creates an exact source over in-memory stored values.
    #[must_use]
    pub fn exact(values: Vec<Option<SortValue>>) -> Self {
        Self::Exact(Arc::new(StoredValues::new(values)))
    }

    /// Creates a degraded source over in-memory stored values.
    #[must_use]
    pub fn degraded(values: Vec<Option<SortValue>>) -> Self {
        Self::Degraded(Arc::new(StoredValues::new(values)))
    }

    /// Returns true if this source uses the degraded representation.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Returns the number of documents covered by this source.
    #[must_use]
    pub fn doc_count(&self) -> u32 {
        match self {
            Self::Exact(lookup) | Self::Degraded(lookup) => lookup.doc_count(),
        }
    }

    /// Returns the realized value for `doc`: the value actually used for
    /// ranking.
    ///
    /// An exact source passes stored values through unchanged. A degraded
    /// source substitutes [`SortValue::EMPTY`] for absent values, so it
    /// never returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    pub fn realized(&self, doc: SegmentDocId) -> Result<Option<SortValue>, LookupError> {
        match self {
            Self::Exact(lookup) => lookup.value(doc),
            Self::Degraded(lookup) => {
                Ok(Some(lookup.value(doc)?.unwrap_or(SortValue::EMPTY)))
            }
        }
    }
}

impl std::fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(lookup) => f
                .debug_struct("ValueSource::Exact")
                .field("doc_count", &lookup.doc_count())
                .finish(),
            Self::Degraded(lookup) => f
                .debug_struct("ValueSource::Degraded")
                .field("doc_count", &lookup.doc_count())
                .finish(),
        }
    }
}

/// In-memory stored values for a bulk-loaded segment.
#[derive(Debug, Clone, Default)]
pub struct StoredValues {
    values: Vec<Option<SortValue>>,
}

impl StoredValues {
    /// Creates stored values from a per-document value list.
    #[must_use]
    pub fn new(values: Vec<Option<SortValue>>) -> Self {
        Self { values }
    }
}

impl ValueLookup for StoredValues {
    fn doc_count(&self) -> u32 {
        self.values.len() as u32
    }

    fn value(&self, doc: SegmentDocId) -> Result<Option<SortValue>, LookupError> {
        self.values
            .get(doc.as_u32() as usize)
            .cloned()
            .ok_or_else(|| LookupError::new(format!("{doc} out of range")))
    }
}

/// An immutable segment: a sealed run of documents plus their value source.
#[derive(Debug, Clone)]
pub struct Segment {
    id: SegmentId,
    doc_base: DocId,
    doc_count: u32,
    values: ValueSource,
}

impl Segment {
    /// Creates a new sealed segment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLayout`] if the value source does not
    /// cover exactly `doc_count` documents, and [`CoreError::DocIdOverflow`]
    /// if the segment's doc range would exceed the addressable ID space.
    pub fn new(
        id: SegmentId,
        doc_base: DocId,
        doc_count: u32,
        values: ValueSource,
    ) -> CoreResult<Self> {
        if values.doc_count() != doc_count {
            return Err(CoreError::invalid_layout(format!(
                "{id}: value source covers {} docs, segment declares {doc_count}",
                values.doc_count()
            )));
        }
        if doc_base.as_u32().checked_add(doc_count).is_none() {
            return Err(CoreError::DocIdOverflow {
                doc: DocId::new(u32::MAX),
            });
        }
        Ok(Self {
            id,
            doc_base,
            doc_count,
            values,
        })
    }

    /// Returns this segment's ID.
    #[must_use]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Returns the global ID of this segment's first document.
    #[must_use]
    pub fn doc_base(&self) -> DocId {
        self.doc_base
    }

    /// Returns the number of documents in this segment.
    #[must_use]
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    /// Returns this segment's value source.
    #[must_use]
    pub fn values(&self) -> &ValueSource {
        &self.values
    }

    /// Returns true if this segment uses the degraded value representation.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.values.is_degraded()
    }

    /// Maps a segment-local position to its global doc ID.
    #[must_use]
    pub fn global_id(&self, doc: SegmentDocId) -> DocId {
        DocId::new(self.doc_base.as_u32() + doc.as_u32())
    }

    /// Returns the realized value for a local position, attaching segment
    /// context to lookup failures.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SourceUnavailable`] if the lookup fails.
    pub fn realized_value(&self, doc: SegmentDocId) -> CoreResult<Option<SortValue>> {
        self.values
            .realized(doc)
            .map_err(|err| CoreError::source_unavailable(self.id, doc, err.message))
    }
}
