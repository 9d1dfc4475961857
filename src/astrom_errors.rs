use thiserror::Error;

/// Top-level error type of the crate.
///
/// Three kinds are distinguished so callers can tell a corrupt document from a
/// missing one, and a misused writer from either:
/// * I/O failures from the underlying read/write collaborator, propagated unchanged,
/// * format errors, raised whenever a structural expectation of the astrom
///   layout is violated,
/// * writer usage errors, raised when a writer is driven out of protocol.
#[derive(Error, Debug)]
pub enum AstromError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid astrom document: {0}")]
    AstromFormatError(#[from] ParseAstromError),

    #[error("Astrom writer misuse: {0}")]
    WriterUsageError(#[from] WriterUsageError),
}

/// Structural violations found while parsing (or re-serializing) an astrom document.
///
/// Variants
/// -----------------
/// * `RawnameMismatch` – An observation marker line does not re-assemble from its parts.
/// * `InvalidExposureType` – The processing-stage letter is not one of `o`, `p`, `s`.
/// * `TruncatedObservationHeader` – A `## MOPversion` block ends before its six lines.
/// * `MalformedHeaderColumns` – A column-name row does not carry the expected names.
/// * `MalformedHeaderRow` – A header value row is missing its `#` prefix or has the
///   wrong number of fields.
/// * `HeaderCountMismatch` – Number of header blocks differs from the observation list.
/// * `MissingSystemHeader` – No RMIN/RMAX/ANGLE/AWIDTH block in the document.
/// * `MissingSourceList` – No source-table column row in the document.
/// * `ReadingCountMismatch` – A source group row count differs from the observation list.
/// * `ReadingFieldCount` – A reading line does not have exactly six fields.
/// * `InvalidNumericField` – A field did not parse as a finite number.
/// * `MissingHeaderKey` – A header value required for serialization is absent.
#[derive(Error, Debug, PartialEq)]
pub enum ParseAstromError {
    #[error("rawname {rawname} does not match its parsed parts {reconstructed}")]
    RawnameMismatch {
        rawname: String,
        reconstructed: String,
    },

    #[error("invalid exposure type letter: {0}")]
    InvalidExposureType(char),

    #[error("observation header block starting at line {line} is truncated")]
    TruncatedObservationHeader { line: usize },

    #[error("observation header block at line {line} has unexpected column names")]
    MalformedHeaderColumns { line: usize },

    #[error("observation header value row at line {line} is malformed")]
    MalformedHeaderRow { line: usize },

    #[error("number of observation headers ({headers}) doesn't match length of observation list ({observations})")]
    HeaderCountMismatch {
        headers: usize,
        observations: usize,
    },

    #[error("could not parse system header")]
    MissingSystemHeader,

    #[error("could not find the source list")]
    MissingSourceList,

    #[error("source has {readings} readings but the observation list has {observations}")]
    ReadingCountMismatch {
        readings: usize,
        observations: usize,
    },

    #[error("expected 6 fields in a source reading line, found {found}")]
    ReadingFieldCount { found: usize },

    #[error("invalid numeric value for {field}: {value}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("missing header key {0}")]
    MissingHeaderKey(&'static str),
}

/// Writer protocol violations, kept distinct from document format errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WriterUsageError {
    #[error("astrom file already has headers")]
    HeadersAlreadyWritten,
}
