//! # SegRank Testkit
//!
//! Test utilities for SegRank.
//!
//! This crate provides:
//! - Collection fixtures with explicit segment boundaries and degraded
//!   representation control
//! - A randomized, memoizing acceptance filter
//! - The reference (oracle) sort order used to check engine output
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use segrank_core::{search_top_k, AcceptAll, SearchRequest, SortField};
//! use segrank_testkit::prelude::*;
//!
//! let mut builder = CollectionBuilder::new();
//! builder.doc(Some("b")).doc(None).flush();
//! builder.doc(Some("a"));
//! let collection = builder.build();
//!
//! let field = SortField::ascending().missing_last();
//! let request = SearchRequest::new(field, 3).unwrap();
//! let hits = search_top_k(collection.segments(), &AcceptAll, &request).unwrap();
//!
//! let expected = expected_ranking(collection.accepted_true_values(&AcceptAll), field);
//! assert_eq!(hits[0].doc, expected[0].0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod oracle;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::oracle::*;
}

pub use fixtures::*;
pub use generators::*;
pub use oracle::*;
