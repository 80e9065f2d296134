//! Sort order definition and comparators.
//!
//! A [`SortField`] describes how documents are ranked: comparison direction
//! over the byte value plus a placement policy for documents with no value.
//!
//! ## Missing placement is absolute
//!
//! Direction only reverses present-vs-present comparisons. Whether absent
//! documents come first or last is decided by [`MissingPolicy`] alone and is
//! never flipped by a descending sort. A "reverse everything" shortcut gets
//! this wrong.

use crate::error::CoreResult;
use crate::segment::Segment;
use crate::types::SegmentDocId;
use crate::value::SortValue;
use std::cmp::Ordering;

/// Comparison direction for present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest value ranks first.
    #[default]
    Ascending,
    /// Largest value ranks first.
    Descending,
}

/// Placement of documents whose value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Absent documents rank before every present value.
    #[default]
    First,
    /// Absent documents rank after every present value.
    Last,
}

/// The sort order for one query: direction plus missing-value placement.
///
/// Ties on the value are always broken by ascending doc ID, which keeps
/// results deterministic and independent of segment visitation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortField {
    /// Comparison direction for present values.
    pub direction: Direction,
    /// Placement of absent values.
    pub missing: MissingPolicy,
}

impl SortField {
    /// Creates an ascending sort with missing-first placement.
    #[must_use]
    pub const fn ascending() -> Self {
        Self {
            direction: Direction::Ascending,
            missing: MissingPolicy::First,
        }
    }

    /// Creates a descending sort with missing-first placement.
    #[must_use]
    pub const fn descending() -> Self {
        Self {
            direction: Direction::Descending,
            missing: MissingPolicy::First,
        }
    }

    /// Places absent documents before every present value.
    #[must_use]
    pub const fn missing_first(mut self) -> Self {
        self.missing = MissingPolicy::First;
        self
    }

    /// Places absent documents after every present value.
    #[must_use]
    pub const fn missing_last(mut self) -> Self {
        self.missing = MissingPolicy::Last;
        self
    }

    /// Compares two realized values under this sort order.
    ///
    /// `Ordering::Less` means the left value ranks earlier. Direction
    /// applies only when both values are present; missing placement is
    /// absolute.
    #[must_use]
    pub fn compare_realized(
        &self,
        a: Option<&SortValue>,
        b: Option<&SortValue>,
    ) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match self.missing {
                MissingPolicy::First => Ordering::Less,
                MissingPolicy::Last => Ordering::Greater,
            },
            (Some(_), None) => match self.missing {
                MissingPolicy::First => Ordering::Greater,
                MissingPolicy::Last => Ordering::Less,
            },
            (Some(a), Some(b)) => {
                let ord = a.cmp(b);
                match self.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            }
        }
    }
}

/// Orders document positions within one segment under a [`SortField`].
///
/// Values are resolved through the segment's value source, so a degraded
/// segment compares its absent documents as the empty value.
#[derive(Debug)]
pub struct SegmentComparator<'a> {
    segment: &'a Segment,
    field: SortField,
}

impl<'a> SegmentComparator<'a> {
    /// Creates a comparator over `segment`.
    #[must_use]
    pub fn new(segment: &'a Segment, field: SortField) -> Self {
        Self { segment, field }
    }

    /// Compares two local positions, breaking value ties by ascending
    /// position.
    ///
    /// # Errors
    ///
    /// Propagates value source failures.
    pub fn compare(&self, a: SegmentDocId, b: SegmentDocId) -> CoreResult<Ordering> {
        let va = self.segment.realized_value(a)?;
        let vb = self.segment.realized_value(b)?;
        Ok(self
            .field
            .compare_realized(va.as_ref(), vb.as_ref())
            .then(a.cmp(&b)))
    }
}
