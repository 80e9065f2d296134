//! Top-K collection across segments.
//!
//! The collector keeps the best `limit` documents seen so far in a bounded
//! binary heap keyed by the requested sort order, with the worst kept entry
//! on top. Segment and document visitation order is arbitrary; the doc ID
//! tie-break makes the final ranking independent of traversal order.

use crate::error::{CoreError, CoreResult};
use crate::filter::DocFilter;
use crate::segment::Segment;
use crate::sort::SortField;
use crate::types::{DocId, SegmentDocId};
use crate::value::SortValue;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// Inputs for one top-K query.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest {
    sort: SortField,
    limit: usize,
}

impl SearchRequest {
    /// Creates a request for the top `limit` documents under `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLimit`] if `limit` is zero.
    pub fn new(sort: SortField, limit: usize) -> CoreResult<Self> {
        if limit == 0 {
            return Err(CoreError::invalid_limit(limit));
        }
        Ok(Self { sort, limit })
    }

    /// Returns the requested sort order.
    #[must_use]
    pub fn sort(&self) -> SortField {
        self.sort
    }

    /// Returns the requested result limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One ranked result: a document and the realized value it was ranked by.
///
/// The value is `None` when the document's value is absent, or the empty
/// value when it came from a degraded segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The document's global ID.
    pub doc: DocId,
    /// The realized sort value used for ranking.
    pub value: Option<SortValue>,
}

/// A heap entry carrying its sort order so the heap can compare entries.
///
/// `Ordering::Less` means "ranks earlier". The heap is a max-heap, so its
/// top is the worst kept entry.
#[derive(Debug, Clone)]
struct HeapEntry {
    field: SortField,
    value: Option<SortValue>,
    doc: DocId,
}

impl HeapEntry {
    fn into_hit(self) -> SearchHit {
        SearchHit {
            doc: self.doc,
            value: self.value,
        }
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.field
            .compare_realized(self.value.as_ref(), other.value.as_ref())
            .then_with(|| self.doc.cmp(&other.doc))
    }
}

/// Collects the top `limit` documents under one sort order.
///
/// One collector serves one query and is not shared across threads. For a
/// parallel plan, run one collector per segment and merge the partial
/// results with [`merge_hits`].
#[derive(Debug)]
pub struct TopKCollector {
    field: SortField,
    limit: usize,
    heap: BinaryHeap<HeapEntry>,
}

impl TopKCollector {
    /// Creates a collector for `request`.
    #[must_use]
    pub fn new(request: &SearchRequest) -> Self {
        Self {
            field: request.sort(),
            limit: request.limit(),
            heap: BinaryHeap::with_capacity(request.limit().min(1024) + 1),
        }
    }

    /// Returns the number of documents currently kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no documents have been kept yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offers one candidate to the collector.
    ///
    /// Kept if the heap has room, or if the candidate ranks earlier than
    /// the worst kept entry (which it then evicts).
    pub fn offer(&mut self, doc: DocId, value: Option<SortValue>) {
        let entry = HeapEntry {
            field: self.field,
            value,
            doc,
        };
        if self.heap.len() < self.limit {
            self.heap.push(entry);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if entry < *worst {
                *worst = entry;
            }
        }
    }

    /// Scans one segment, offering every accepted document.
    ///
    /// # Errors
    ///
    /// Fails the whole query on a value source failure; no partial results
    /// survive an error.
    pub fn collect_segment(
        &mut self,
        segment: &Segment,
        filter: &dyn DocFilter,
    ) -> CoreResult<()> {
        let mut accepted = 0u32;
        for pos in 0..segment.doc_count() {
            let doc = SegmentDocId::new(pos);
            if !filter.accepts(segment.id(), doc) {
                continue;
            }
            let value = segment.realized_value(doc)?;
            self.offer(segment.global_id(doc), value);
            accepted += 1;
        }
        debug!(
            segment = %segment.id(),
            scanned = segment.doc_count(),
            accepted,
            kept = self.heap.len(),
            "segment collected"
        );
        Ok(())
    }

    /// Drains the collector into final rank order, best first.
    #[must_use]
    pub fn into_hits(self) -> Vec<SearchHit> {
        // Max-heap sorted ascending is exactly rank order.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(HeapEntry::into_hit)
            .collect()
    }
}

/// Runs one top-K query over a set of segments.
///
/// Segments may be given in any order; the result is identical to a single
/// global sort over all accepted documents, truncated to the request's
/// limit. Returns `min(limit, accepted)` hits.
///
/// # Errors
///
/// Returns [`CoreError::SourceUnavailable`] if any accepted document's
/// value cannot be resolved. No partial results are returned on failure.
pub fn search_top_k(
    segments: &[Segment],
    filter: &dyn DocFilter,
    request: &SearchRequest,
) -> CoreResult<Vec<SearchHit>> {
    let mut collector = TopKCollector::new(request);
    for segment in segments {
        collector.collect_segment(segment, filter)?;
    }
    let hits = collector.into_hits();
    debug!(
        segments = segments.len(),
        limit = request.limit(),
        hits = hits.len(),
        "query complete"
    );
    Ok(hits)
}

/// Merges partial per-segment rankings into one global top-K.
///
/// Re-applies the global sort order including the doc ID tie-break, so a
/// parallel per-segment plan yields the same result as a serial scan.
#[must_use]
pub fn merge_hits(
    partials: Vec<Vec<SearchHit>>,
    request: &SearchRequest,
) -> Vec<SearchHit> {
    let mut collector = TopKCollector::new(request);
    for partial in partials {
        for hit in partial {
            collector.offer(hit.doc, hit.value);
        }
    }
    collector.into_hits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::filter::AcceptAll;
    use crate::segment::{ValueLookup, ValueSource};
    use crate::types::SegmentId;

    /// Builds one segment per value run, assigning dense global IDs.
    fn collection(runs: &[&[Option<&str>]]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut base = 0u32;
        for (idx, run) in runs.iter().enumerate() {
            let values: Vec<Option<SortValue>> =
                run.iter().map(|v| v.map(SortValue::from)).collect();
            let count = values.len() as u32;
            segments.push(
                Segment::new(
                    SegmentId::new(idx as u32),
                    DocId::new(base),
                    count,
                    ValueSource::exact(values),
                )
                .unwrap(),
            );
            base += count;
        }
        segments
    }

    fn ids(hits: &[SearchHit]) -> Vec<u32> {
        hits.iter().map(|h| h.doc.as_u32()).collect()
    }

    #[test]
    fn rejects_zero_limit() {
        let result = SearchRequest::new(SortField::ascending(), 0);
        assert!(matches!(result, Err(CoreError::InvalidLimit { limit: 0 })));
    }

    #[test]
    fn ascending_missing_last() {
        // True values: ["b", absent, "a", absent] for ids 0..3.
        let segments = collection(&[&[Some("b"), None, Some("a"), None]]);
        let request = SearchRequest::new(SortField::ascending().missing_last(), 4).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![2, 0, 1, 3]);
    }

    #[test]
    fn ascending_missing_first() {
        let segments = collection(&[&[Some("b"), None, Some("a"), None]]);
        let request = SearchRequest::new(SortField::ascending().missing_first(), 4).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![1, 3, 2, 0]);
    }

    #[test]
    fn truncates_to_limit() {
        let segments = collection(&[&[Some("b"), None, Some("a"), None]]);
        let request = SearchRequest::new(SortField::ascending().missing_last(), 2).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![2, 0]);
    }

    #[test]
    fn limit_larger_than_candidates() {
        let segments = collection(&[&[Some("b"), Some("a")]]);
        let request = SearchRequest::new(SortField::ascending(), 100).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![1, 0]);
    }

    #[test]
    fn segment_order_does_not_matter() {
        let forward = collection(&[&[Some("d"), Some("b")], &[Some("a"), Some("c")]]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let request = SearchRequest::new(SortField::ascending(), 3).unwrap();
        let fwd = search_top_k(&forward, &AcceptAll, &request).unwrap();
        let rev = search_top_k(&reversed, &AcceptAll, &request).unwrap();
        assert_eq!(fwd, rev);
        assert_eq!(ids(&fwd), vec![2, 1, 3]);
    }

    #[test]
    fn equal_values_break_ties_by_doc_id() {
        // Duplicates across segments: ids 0..3 all hold "x".
        let segments = collection(&[&[Some("x"), Some("x")], &[Some("x"), Some("x")]]);
        let request = SearchRequest::new(SortField::descending(), 4).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![0, 1, 2, 3]);
    }

    #[test]
    fn descending_keeps_missing_placement() {
        let segments = collection(&[&[Some("b"), None, Some("a"), None]]);
        let request = SearchRequest::new(SortField::descending().missing_last(), 4).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        // Present values reverse ("b" before "a"); absent docs stay last.
        assert_eq!(ids(&hits), vec![0, 2, 1, 3]);
    }

    #[test]
    fn filter_restricts_candidates() {
        let segments = collection(&[&[Some("d"), Some("c"), Some("b"), Some("a")]]);
        let odd = |_segment: SegmentId, doc: SegmentDocId| doc.as_u32() % 2 == 1;
        let request = SearchRequest::new(SortField::ascending(), 10).unwrap();
        let hits = search_top_k(&segments, &odd, &request).unwrap();
        assert_eq!(ids(&hits), vec![3, 1]);
    }

    #[test]
    fn hits_expose_realized_values() {
        let segments = collection(&[&[Some("b"), None]]);
        let request = SearchRequest::new(SortField::ascending().missing_last(), 2).unwrap();
        let hits = search_top_k(&segments, &AcceptAll, &request).unwrap();
        assert_eq!(hits[0].value, Some(SortValue::from("b")));
        assert_eq!(hits[1].value, None);
    }

    #[test]
    fn degraded_segment_realizes_empty() {
        let values = vec![Some(SortValue::from("b")), None];
        let segment = Segment::new(
            SegmentId::new(0),
            DocId::new(0),
            2,
            ValueSource::degraded(values),
        )
        .unwrap();
        let request = SearchRequest::new(SortField::ascending(), 2).unwrap();
        let hits = search_top_k(&[segment], &AcceptAll, &request).unwrap();
        assert_eq!(ids(&hits), vec![1, 0]);
        assert_eq!(hits[0].value, Some(SortValue::EMPTY));
    }

    struct FailingLookup;

    impl ValueLookup for FailingLookup {
        fn doc_count(&self) -> u32 {
            1
        }

        fn value(&self, _doc: SegmentDocId) -> Result<Option<SortValue>, LookupError> {
            Err(LookupError::new("page torn"))
        }
    }

    #[test]
    fn source_failure_fails_whole_query() {
        let segment = Segment::new(
            SegmentId::new(0),
            DocId::new(0),
            1,
            ValueSource::Exact(std::sync::Arc::new(FailingLookup)),
        )
        .unwrap();
        let request = SearchRequest::new(SortField::ascending(), 1).unwrap();
        let result = search_top_k(&[segment], &AcceptAll, &request);
        assert!(matches!(result, Err(CoreError::SourceUnavailable { .. })));
    }

    #[test]
    fn merge_matches_serial_collection() {
        let segments = collection(&[
            &[Some("d"), None, Some("b")],
            &[Some("a"), Some("c")],
            &[None, Some("e")],
        ]);
        let request = SearchRequest::new(SortField::ascending().missing_last(), 4).unwrap();

        let serial = search_top_k(&segments, &AcceptAll, &request).unwrap();

        let partials = segments
            .iter()
            .map(|segment| {
                search_top_k(std::slice::from_ref(segment), &AcceptAll, &request).unwrap()
            })
            .collect();
        let merged = merge_hits(partials, &request);

        assert_eq!(serial, merged);
    }
}
