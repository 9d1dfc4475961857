//! # astrom
//!
//! Reads and writes astrom files: the fixed-layout text interchange format
//! describing astronomical exposures and the point-source detections
//! (candidate moving objects) measured across them.
//!
//! Parsing produces an [`AstromData`] entity graph — the ordered observation
//! list, the shared system header, and one [`Source`] per candidate with one
//! [`SourceReading`] per observation. The graph can be serialized back with
//! [`BulkAstromWriter`] (whole document at once) or [`StreamingAstromWriter`]
//! (source-by-source, with resume detection), reproducing the exact column
//! layout the parser consumes.

pub mod astrom_data;
pub mod astrom_errors;
pub mod astrom_file;
pub mod constants;
pub mod observations;
pub mod sources;

pub use astrom_data::AstromData;
pub use astrom_errors::{AstromError, ParseAstromError, WriterUsageError};
pub use astrom_file::reader::AstromParser;
pub use astrom_file::writer::{BulkAstromWriter, StreamingAstromWriter};
pub use observations::Observation;
pub use sources::{Source, SourceReading};

use camino::Utf8Path;

/// Parse the astrom file at `filename`.
pub fn parse(filename: &Utf8Path) -> Result<AstromData, AstromError> {
    AstromParser::new().parse_file(filename)
}

/// Parse the astrom file at `filename` and return its sources.
pub fn parse_sources(filename: &Utf8Path) -> Result<Vec<Source>, AstromError> {
    Ok(parse(filename)?.into_sources())
}
