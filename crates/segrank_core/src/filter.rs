//! Document acceptance filters.

use crate::types::{SegmentDocId, SegmentId};

/// Decides whether a document participates in a query's candidate set.
///
/// # Contract
///
/// Within one query execution a filter must be a pure function of
/// `(segment, doc)`: the engine may invoke it in any order, more than once
/// per document, and expects the same answer every time. Violating this is
/// undefined behavior for the query; the hot path does not defensively
/// re-check answers. Filters that capture shared state (for example a test
/// filter recording which documents it accepted) must synchronize that
/// state themselves.
pub trait DocFilter: Send + Sync {
    /// Returns true if the document at `doc` in `segment` is a candidate.
    fn accepts(&self, segment: SegmentId, doc: SegmentDocId) -> bool;
}

/// A filter that accepts every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DocFilter for AcceptAll {
    fn accepts(&self, _segment: SegmentId, _doc: SegmentDocId) -> bool {
        true
    }
}

impl<F> DocFilter for F
where
    F: Fn(SegmentId, SegmentDocId) -> bool + Send + Sync,
{
    fn accepts(&self, segment: SegmentId, doc: SegmentDocId) -> bool {
        self(segment, doc)
    }
}
