//! # SegRank Core
//!
//! Segment-sharded top-K sort engine.
//!
//! Documents live in immutable segments, each exposing an optional byte
//! sort value per document. A query asks for the top K documents under a
//! [`SortField`] (ascending or descending, absent values placed first or
//! last) and gets a result identical to a single global sort over every
//! accepted document, regardless of how the collection is split into
//! segments.
//!
//! ## Design Principles
//!
//! - Segments are sealed and never mutated; queries share them freely.
//! - Missing placement is absolute: descending order reverses value
//!   comparisons but never where absent documents go.
//! - Ties are broken by the stable doc ID, so results are deterministic
//!   and independent of segment visitation order.
//! - Segments whose storage format cannot represent absence report the
//!   empty value instead; the engine preserves that representation rather
//!   than papering over it.
//!
//! ## Example
//!
//! ```rust
//! use segrank_core::{
//!     search_top_k, AcceptAll, DocId, SearchRequest, Segment, SegmentId,
//!     SortField, SortValue, ValueSource,
//! };
//!
//! let values = vec![Some(SortValue::from("b")), None, Some(SortValue::from("a"))];
//! let segment = Segment::new(
//!     SegmentId::new(0),
//!     DocId::new(0),
//!     3,
//!     ValueSource::exact(values),
//! )
//! .unwrap();
//!
//! let request = SearchRequest::new(SortField::ascending().missing_last(), 2).unwrap();
//! let hits = search_top_k(&[segment], &AcceptAll, &request).unwrap();
//! assert_eq!(hits[0].doc, DocId::new(2));
//! assert_eq!(hits[1].doc, DocId::new(0));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collector;
mod error;
mod filter;
mod segment;
mod sort;
mod types;
mod value;

pub use collector::{merge_hits, search_top_k, SearchHit, SearchRequest, TopKCollector};
pub use error::{CoreError, CoreResult, LookupError};
pub use filter::{AcceptAll, DocFilter};
pub use segment::{Segment, StoredValues, ValueLookup, ValueSource};
pub use sort::{Direction, MissingPolicy, SegmentComparator, SortField};
pub use types::{DocId, SegmentDocId, SegmentId};
pub use value::SortValue;
