//! Test fixtures: collection building and randomized filtering.
//!
//! [`CollectionBuilder`] bulk-loads documents into sealed segments with
//! explicit flush points, mirroring how a real collection accumulates
//! segments over time. It also remembers every document's *true* value so
//! tests can check engine output against the oracle.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use segrank_core::{
    DocFilter, DocId, Segment, SegmentDocId, SegmentId, SortValue, ValueSource,
};
use std::collections::HashMap;

/// Builds an immutable multi-segment collection for tests.
pub struct CollectionBuilder {
    pending: Vec<Option<SortValue>>,
    segments: Vec<Segment>,
    true_values: Vec<Option<SortValue>>,
    degraded_segments: Vec<bool>,
}

impl CollectionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            segments: Vec::new(),
            true_values: Vec::new(),
            degraded_segments: Vec::new(),
        }
    }

    /// Adds one document with an optional string value.
    pub fn doc(&mut self, value: Option<&str>) -> &mut Self {
        self.push(value.map(SortValue::from))
    }

    /// Adds one document with an optional value.
    pub fn push(&mut self, value: Option<SortValue>) -> &mut Self {
        self.true_values.push(value.clone());
        self.pending.push(value);
        self
    }

    /// Seals pending documents into a segment with the exact value
    /// representation. A no-op when nothing is pending.
    pub fn flush(&mut self) -> &mut Self {
        self.seal(false)
    }

    /// Seals pending documents into a degraded segment: its value source
    /// reports the empty value instead of absence.
    pub fn flush_degraded(&mut self) -> &mut Self {
        self.seal(true)
    }

    fn seal(&mut self, degraded: bool) -> &mut Self {
        if self.pending.is_empty() {
            return self;
        }
        let values = std::mem::take(&mut self.pending);
        let doc_count = values.len() as u32;
        let doc_base = self.true_values.len() as u32 - doc_count;
        let source = if degraded {
            ValueSource::degraded(values)
        } else {
            ValueSource::exact(values)
        };
        let id = SegmentId::new(self.segments.len() as u32);
        self.segments.push(
            Segment::new(id, DocId::new(doc_base), doc_count, source)
                .expect("builder produces consistent segment geometry"),
        );
        self.degraded_segments.push(degraded);
        self
    }

    /// Finishes the collection, sealing any pending documents into a final
    /// exact segment.
    #[must_use]
    pub fn build(mut self) -> Collection {
        self.flush();
        Collection {
            segments: self.segments,
            true_values: self.true_values,
            degraded_segments: self.degraded_segments,
        }
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built test collection: sealed segments plus the true value of every
/// document.
pub struct Collection {
    segments: Vec<Segment>,
    true_values: Vec<Option<SortValue>>,
    degraded_segments: Vec<bool>,
}

impl Collection {
    /// Returns the sealed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the total number of documents.
    #[must_use]
    pub fn doc_count(&self) -> u32 {
        self.true_values.len() as u32
    }

    /// Returns a document's true value, independent of representation.
    #[must_use]
    pub fn true_value(&self, doc: DocId) -> Option<&SortValue> {
        self.true_values
            .get(doc.as_u32() as usize)
            .and_then(|v| v.as_ref())
    }

    /// Returns `(doc, true value)` pairs for every document accepted by
    /// `filter`, for feeding the oracle.
    #[must_use]
    pub fn accepted_true_values(
        &self,
        filter: &dyn DocFilter,
    ) -> Vec<(DocId, Option<SortValue>)> {
        let mut accepted = Vec::new();
        for segment in &self.segments {
            for pos in 0..segment.doc_count() {
                let doc = SegmentDocId::new(pos);
                if filter.accepts(segment.id(), doc) {
                    let global = segment.global_id(doc);
                    accepted.push((
                        global,
                        self.true_values[global.as_u32() as usize].clone(),
                    ));
                }
            }
        }
        accepted
    }

    /// Returns `(doc, realized value)` pairs for every document accepted by
    /// `filter`.
    ///
    /// Realized values differ from true values only in degraded segments,
    /// where absence becomes the empty value. The engine ranks by realized
    /// values, so the oracle applied to these pairs must reproduce its
    /// output exactly.
    #[must_use]
    pub fn accepted_realized_values(
        &self,
        filter: &dyn DocFilter,
    ) -> Vec<(DocId, Option<SortValue>)> {
        self.accepted_true_values(filter)
            .into_iter()
            .map(|(doc, _)| (doc, self.expected_realized(doc)))
            .collect()
    }

    /// Returns true if the segment owning `doc` uses the degraded
    /// representation.
    #[must_use]
    pub fn is_degraded(&self, doc: DocId) -> bool {
        self.segments
            .iter()
            .position(|segment| {
                let base = segment.doc_base().as_u32();
                (base..base + segment.doc_count()).contains(&doc.as_u32())
            })
            .is_some_and(|idx| self.degraded_segments[idx])
    }

    /// Returns the value the engine is expected to realize for `doc`: the
    /// true value, except that degraded segments stand in the empty value
    /// for absence.
    #[must_use]
    pub fn expected_realized(&self, doc: DocId) -> Option<SortValue> {
        match self.true_value(doc) {
            Some(value) => Some(value.clone()),
            None if self.is_degraded(doc) => Some(SortValue::EMPTY),
            None => None,
        }
    }
}

/// A density-based random acceptance filter.
///
/// Each document's accept/reject decision is sampled on first query and
/// memoized, so repeated queries for the same document within one run give
/// the same answer, as the filter contract requires. The memo table and
/// RNG live behind a mutex because the engine may probe from any context.
pub struct RandomFilter {
    density: f64,
    state: Mutex<FilterState>,
}

struct FilterState {
    rng: StdRng,
    decisions: HashMap<(SegmentId, SegmentDocId), bool>,
}

impl RandomFilter {
    /// Creates a filter accepting roughly `density` (0.0..=1.0) of
    /// documents, driven by the given RNG.
    #[must_use]
    pub fn new(rng: StdRng, density: f64) -> Self {
        Self {
            density,
            state: Mutex::new(FilterState {
                rng,
                decisions: HashMap::new(),
            }),
        }
    }
}

impl DocFilter for RandomFilter {
    fn accepts(&self, segment: SegmentId, doc: SegmentDocId) -> bool {
        let mut state = self.state.lock();
        if let Some(&decision) = state.decisions.get(&(segment, doc)) {
            return decision;
        }
        let decision = state.rng.gen_bool(self.density);
        state.decisions.insert((segment, doc), decision);
        decision
    }
}

/// Installs a fmt tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
