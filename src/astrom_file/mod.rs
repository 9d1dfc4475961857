//! # The astrom file format
//!
//! Reading and writing of the fixed-layout text interchange format describing
//! astronomical exposures and the point-source detections measured across them.
//!
//! ## Layout
//! -----------------
//! A document has four sections, in order:
//! 1. the observation list — one `# <rawname>` marker line per exposure/CCD,
//! 2. one six-line header block per observation (`## MOPversion`, the version
//!    value, and two column-names/values row pairs),
//! 3. the two-line system header (RMIN, RMAX, ANGLE, AWIDTH),
//! 4. the source table — a column-names row, then one blank-line-separated
//!    group per source with one six-field reading line per observation.
//!
//! Modules
//! -----------------
//! * [`reader`] – [`AstromParser`](reader::AstromParser), four passes over the
//!   raw text with strict ordering/count cross-checks.
//! * [`writer`] – bulk and streaming serializers sharing one set of row
//!   formatters.
//! * `format` (crate-private) – the fixed-width row formatting contract, kept
//!   in one place so the two writer modes cannot drift apart.

pub mod reader;
pub mod writer;

pub(crate) mod format;

use crate::astrom_errors::ParseAstromError;

/// Parse a required finite floating-point field.
pub(crate) fn parse_f64(field: &'static str, value: &str) -> Result<f64, ParseAstromError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseAstromError::InvalidNumericField {
            field,
            value: value.to_string(),
        })
}

/// Parse a required unsigned integer field.
pub(crate) fn parse_u64(field: &'static str, value: &str) -> Result<u64, ParseAstromError> {
    value
        .parse::<u64>()
        .map_err(|_| ParseAstromError::InvalidNumericField {
            field,
            value: value.to_string(),
        })
}
