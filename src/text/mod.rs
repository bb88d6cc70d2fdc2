//! Text utilities shared by the extraction pipeline.
//!
//! Normalization turns raw markup text into single-line (or paragraph-preserving)
//! prose; stemming turns identifier-like titles into keyword expansions.

pub(crate) mod normalize;
pub(crate) mod stems;

pub use normalize::{normalize, normalize_summary};
pub(crate) use normalize::{collapse_summary, collapse_whitespace};
pub use stems::{aggregations, keywords_for_title, stems};
