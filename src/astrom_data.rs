//! The parsed astrom document: observations, system header, sources.

use crate::constants::{Observations, SysHeader};
use crate::sources::Source;

/// Encapsulates data extracted from an astrom file.
///
/// Constructed once by [`AstromParser`](crate::astrom_file::reader::AstromParser)
/// and read-only at the document level thereafter.
///
/// Invariant: every source has exactly as many readings as the document has
/// observations, in the same order.
#[derive(Debug, Clone)]
pub struct AstromData {
    observations: Observations,
    sys_header: SysHeader,
    sources: Vec<Source>,
}

impl AstromData {
    /// Constructs a new astronomy data set.
    ///
    /// Arguments
    /// ---------
    /// * `observations`: the observations that are part of the data set, in file order.
    /// * `sys_header`: key-value pairs of system settings applicable to the
    ///   data set (RMIN, RMAX, ANGLE, AWIDTH).
    /// * `sources`: the point sources found in the data set. By convention the
    ///   ordering of each source's readings matches the ordering of
    ///   `observations`.
    pub fn new(observations: Observations, sys_header: SysHeader, sources: Vec<Source>) -> Self {
        AstromData {
            observations,
            sys_header,
            sources,
        }
    }

    pub fn get_observations(&self) -> &Observations {
        &self.observations
    }

    pub fn get_sys_header(&self) -> &SysHeader {
        &self.sys_header
    }

    pub fn get_sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn into_sources(self) -> Vec<Source> {
        self.sources
    }

    pub fn get_source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of readings across all sources.
    pub fn get_reading_count(&self) -> usize {
        self.sources.iter().map(Source::num_readings).sum()
    }
}
