//! Property-based test generators using proptest.
//!
//! Provides strategies for random sort values, sort orders, and segmented
//! collection layouts. Value strategies mix short ASCII strings with
//! arbitrary unicode so both cheap and multi-byte comparisons are covered.

use crate::fixtures::{Collection, CollectionBuilder};
use proptest::prelude::*;
use segrank_core::{SortField, SortValue};

/// Strategy for short ASCII sort values.
pub fn simple_value_strategy(max_len: usize) -> impl Strategy<Value = SortValue> {
    prop::collection::vec(prop::char::range('a', 'z'), 0..=max_len)
        .prop_map(|chars| SortValue::from(chars.into_iter().collect::<String>()))
}

/// Strategy for arbitrary unicode sort values.
pub fn unicode_value_strategy(max_len: usize) -> impl Strategy<Value = SortValue> {
    prop::collection::vec(any::<char>(), 0..=max_len)
        .prop_map(|chars| SortValue::from(chars.into_iter().collect::<String>()))
}

/// Strategy mixing simple and unicode sort values.
pub fn sort_value_strategy(max_len: usize) -> impl Strategy<Value = SortValue> {
    prop_oneof![
        simple_value_strategy(max_len),
        unicode_value_strategy(max_len),
    ]
}

/// Strategy for optional values with roughly one in ten absent.
pub fn optional_value_strategy(max_len: usize) -> impl Strategy<Value = Option<SortValue>> {
    prop_oneof![
        1 => Just(None),
        9 => sort_value_strategy(max_len).prop_map(Some),
    ]
}

/// Strategy covering all four sort orders.
pub fn sort_field_strategy() -> impl Strategy<Value = SortField> {
    prop_oneof![
        Just(SortField::ascending().missing_first()),
        Just(SortField::ascending().missing_last()),
        Just(SortField::descending().missing_first()),
        Just(SortField::descending().missing_last()),
    ]
}

/// A reproducible plan for building a segmented collection.
///
/// Each document carries its value, whether a segment boundary follows it,
/// and whether the segment it closes uses the degraded representation.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    /// Per-document `(value, flush after, degraded flush)` entries.
    pub docs: Vec<(Option<SortValue>, bool, bool)>,
}

impl CollectionPlan {
    /// Builds the collection this plan describes.
    #[must_use]
    pub fn build(&self) -> Collection {
        let mut builder = CollectionBuilder::new();
        for (value, flush, degraded) in &self.docs {
            builder.push(value.clone());
            if *flush {
                if *degraded {
                    builder.flush_degraded();
                } else {
                    builder.flush();
                }
            }
        }
        builder.build()
    }

    /// Returns the number of documents in this plan.
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }
}

/// Strategy for collection plans of up to `max_docs` documents.
///
/// Segment boundaries land after roughly one in eight documents and a
/// quarter of the sealed segments are degraded, so multi-segment layouts
/// and both representations show up routinely.
pub fn collection_plan_strategy(max_docs: usize) -> impl Strategy<Value = CollectionPlan> {
    prop::collection::vec(
        (
            optional_value_strategy(8),
            prop::bool::weighted(0.125),
            prop::bool::weighted(0.25),
        ),
        1..=max_docs,
    )
    .prop_map(|docs| CollectionPlan { docs })
}

/// Strategy for collection plans whose segments are all exact.
pub fn exact_collection_plan_strategy(
    max_docs: usize,
) -> impl Strategy<Value = CollectionPlan> {
    collection_plan_strategy(max_docs).prop_map(|mut plan| {
        for (_, _, degraded) in &mut plan.docs {
            *degraded = false;
        }
        plan
    })
}
