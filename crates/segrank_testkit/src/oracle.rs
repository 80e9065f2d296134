//! Reference sort order over true document values.
//!
//! The oracle recomputes the expected ranking directly from each document's
//! true value, independent of segment layout and of the degraded value
//! representation. Engine output is checked against it hit by hit.

use segrank_core::{Direction, DocId, MissingPolicy, SortField, SortValue};
use std::cmp::Ordering;

/// Compares two true values under `field`.
///
/// Absent documents are placed by the missing policy alone; direction
/// reverses the comparison only when both values are present.
#[must_use]
pub fn oracle_cmp(
    field: SortField,
    a: Option<&SortValue>,
    b: Option<&SortValue>,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => missing_rank(field.missing),
        (Some(_), None) => missing_rank(field.missing).reverse(),
        (Some(a), Some(b)) => match field.direction {
            Direction::Ascending => a.cmp(b),
            Direction::Descending => b.cmp(a),
        },
    }
}

fn missing_rank(policy: MissingPolicy) -> Ordering {
    match policy {
        MissingPolicy::First => Ordering::Less,
        MissingPolicy::Last => Ordering::Greater,
    }
}

/// Sorts `(doc, true value)` pairs into the expected rank order.
///
/// Value ties are broken by ascending doc ID, matching the engine's
/// tie-break. The caller truncates to the query limit.
#[must_use]
pub fn expected_ranking(
    mut candidates: Vec<(DocId, Option<SortValue>)>,
    field: SortField,
) -> Vec<(DocId, Option<SortValue>)> {
    candidates.sort_by(|(doc_a, val_a), (doc_b, val_b)| {
        oracle_cmp(field, val_a.as_ref(), val_b.as_ref()).then_with(|| doc_a.cmp(doc_b))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[Option<&str>]) -> Vec<(DocId, Option<SortValue>)> {
        values
            .iter()
            .enumerate()
            .map(|(id, v)| (DocId::new(id as u32), v.map(SortValue::from)))
            .collect()
    }

    fn ids(ranking: &[(DocId, Option<SortValue>)]) -> Vec<u32> {
        ranking.iter().map(|(doc, _)| doc.as_u32()).collect()
    }

    #[test]
    fn ascending_missing_last_ranking() {
        let ranking = expected_ranking(
            pairs(&[Some("b"), None, Some("a"), None]),
            SortField::ascending().missing_last(),
        );
        assert_eq!(ids(&ranking), vec![2, 0, 1, 3]);
    }

    #[test]
    fn ascending_missing_first_ranking() {
        let ranking = expected_ranking(
            pairs(&[Some("b"), None, Some("a"), None]),
            SortField::ascending().missing_first(),
        );
        assert_eq!(ids(&ranking), vec![1, 3, 2, 0]);
    }

    #[test]
    fn descending_does_not_move_missing() {
        let ranking = expected_ranking(
            pairs(&[Some("b"), None, Some("a"), None]),
            SortField::descending().missing_last(),
        );
        assert_eq!(ids(&ranking), vec![0, 2, 1, 3]);
    }

    #[test]
    fn oracle_agrees_with_engine_comparison() {
        let field = SortField::descending().missing_first();
        let a = Some(SortValue::from("alpha"));
        let b = Some(SortValue::from("beta"));
        assert_eq!(
            oracle_cmp(field, a.as_ref(), b.as_ref()),
            field.compare_realized(a.as_ref(), b.as_ref())
        );
        assert_eq!(
            oracle_cmp(field, None, b.as_ref()),
            field.compare_realized(None, b.as_ref())
        );
    }
}
