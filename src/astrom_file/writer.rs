//! # Astrom document writers
//!
//! Serializes an entity graph back to the exact column layout consumed by
//! [`reader::AstromParser`](super::reader::AstromParser).
//!
//! ## Modes
//! -----------------
//! * [`BulkAstromWriter`] – write a whole [`AstromData`] in one call; one-shot.
//! * [`StreamingAstromWriter`] – write sources one by one as they are
//!   validated. The first `write_source` emits the headers (derived from that
//!   source's own readings' observations) unless the underlying file already
//!   starts with a valid observation marker, in which case the session resumes
//!   in append-only mode without duplicating them.
//!
//! Both modes drive the same crate-private base so the fixed-width formatting
//! contract cannot drift between them.

use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use log::debug;

use super::format;
use super::parse_f64;
use super::reader::match_observation_line;
use crate::astrom_data::AstromData;
use crate::astrom_errors::{AstromError, ParseAstromError, WriterUsageError};
use crate::constants::{
    ObservationHeader, Observations, SysHeader, ANGLE, AWIDTH, CHIP, CRPIX1, CRPIX2, CRVAL1,
    CRVAL2, DETECTOR, EXPNUM, EXPTIME, FWHM, HEADER_LINE_LENGTH, MAXCOUNT, MJD_OBS_CENTER,
    MOPVERSION, NAX1, NAX2, PHADU, RDNOIS, RMAX, RMIN, SCALE, THRES,
};
use crate::observations::Observation;
use crate::sources::Source;

/// Fetch a header value as a string, or fail with the missing key.
fn header_str<'a>(header: &'a ObservationHeader, key: &'static str) -> Result<&'a str, AstromError> {
    header
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ParseAstromError::MissingHeaderKey(key).into())
}

/// Fetch a header value as a finite float.
fn header_f64(header: &ObservationHeader, key: &'static str) -> Result<f64, AstromError> {
    Ok(parse_f64(key, header_str(header, key)?)?)
}

/// Fetch a header value as an integer, truncating any fractional part.
fn header_i64(header: &ObservationHeader, key: &'static str) -> Result<i64, AstromError> {
    Ok(header_f64(header, key)? as i64)
}

/// Shared line-emission and section logic of both writer modes.
struct AstromWriterBase<W: Write> {
    sink: W,
    header_written: bool,
}

impl<W: Write> AstromWriterBase<W> {
    fn new(sink: W) -> Self {
        AstromWriterBase {
            sink,
            header_written: false,
        }
    }

    /// Header lines are left-justified to the fixed width on disk.
    fn write_line(&mut self, line: &str) -> Result<(), AstromError> {
        writeln!(self.sink, "{:<width$}", line, width = HEADER_LINE_LENGTH)?;
        Ok(())
    }

    /// Reading rows and source separators are written unpadded.
    fn write_raw_line(&mut self, line: &str) -> Result<(), AstromError> {
        writeln!(self.sink, "{line}")?;
        Ok(())
    }

    fn write_blank_line(&mut self) -> Result<(), AstromError> {
        self.write_raw_line("")
    }

    fn write_observation_list(
        &mut self,
        observations: &[Arc<Observation>],
    ) -> Result<(), AstromError> {
        for observation in observations {
            self.write_line(&format::observation_list_row(observation.rawname()))?;
        }
        Ok(())
    }

    fn write_observation_headers(
        &mut self,
        observations: &[Arc<Observation>],
    ) -> Result<(), AstromError> {
        for observation in observations {
            let header = observation.header();

            self.write_line(format::MOPVERSION_ROW)?;
            self.write_line(&format::mopversion_value_row(header_str(
                header, MOPVERSION,
            )?))?;
            self.write_line(format::OBS_HEADER_NAMES_ROW_1)?;
            self.write_line(&format::observation_header_row_1(
                header_str(header, MJD_OBS_CENTER)?,
                header_f64(header, EXPTIME)?,
                header_f64(header, THRES)?,
                header_f64(header, FWHM)?,
                header_f64(header, MAXCOUNT)?,
                header_f64(header, CRVAL1)?,
                header_f64(header, CRVAL2)?,
                header_i64(header, EXPNUM)?,
            ))?;
            self.write_line(format::OBS_HEADER_NAMES_ROW_2)?;
            self.write_line(&format::observation_header_row_2(
                header_f64(header, SCALE)?,
                header_i64(header, CHIP)?,
                header_f64(header, CRPIX1)?,
                header_f64(header, CRPIX2)?,
                header_i64(header, NAX1)?,
                header_i64(header, NAX2)?,
                header_str(header, DETECTOR)?,
                header_f64(header, PHADU)?,
                header_f64(header, RDNOIS)?,
            ))?;
        }
        Ok(())
    }

    fn write_sys_header(&mut self, sys_header: &SysHeader) -> Result<(), AstromError> {
        self.write_line(format::SYS_HEADER_NAMES_ROW)?;
        self.write_line(&format::sys_header_row(
            header_f64(sys_header, RMIN)?,
            header_f64(sys_header, RMAX)?,
            header_f64(sys_header, ANGLE)?,
            header_f64(sys_header, AWIDTH)?,
        ))
    }

    fn write_source_header(&mut self) -> Result<(), AstromError> {
        self.write_line(format::SOURCE_LIST_NAMES_ROW)
    }

    /// Writes the header part of the astrom file so that only the source data
    /// has to be filled in.
    fn write_headers(
        &mut self,
        observations: &[Arc<Observation>],
        sys_header: &SysHeader,
    ) -> Result<(), AstromError> {
        if self.header_written {
            return Err(WriterUsageError::HeadersAlreadyWritten.into());
        }

        self.write_observation_list(observations)?;
        self.write_observation_headers(observations)?;
        self.write_sys_header(sys_header)?;
        self.write_source_header()?;

        self.header_written = true;
        Ok(())
    }

    fn write_source(&mut self, source: &Source) -> Result<(), AstromError> {
        self.write_blank_line()?;
        for reading in source.get_readings() {
            self.write_raw_line(&format::reading_row(reading))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AstromError> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Use if you want to write out an entire [`AstromData`] structure at once.
/// See also [`StreamingAstromWriter`].
pub struct BulkAstromWriter<W: Write> {
    base: AstromWriterBase<W>,
}

impl<W: Write> BulkAstromWriter<W> {
    pub fn new(sink: W) -> Self {
        BulkAstromWriter {
            base: AstromWriterBase::new(sink),
        }
    }

    /// Writes a full [`AstromData`] structure at once.
    ///
    /// One-shot: a second call fails with
    /// [`WriterUsageError::HeadersAlreadyWritten`].
    pub fn write_astrom_data(&mut self, astrom_data: &AstromData) -> Result<(), AstromError> {
        self.base
            .write_headers(astrom_data.get_observations(), astrom_data.get_sys_header())?;
        for source in astrom_data.get_sources() {
            self.base.write_source(source)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), AstromError> {
        self.base.flush()
    }

    /// Flush and release the underlying sink.
    pub fn close(mut self) -> Result<(), AstromError> {
        self.base.flush()
    }
}

/// Use if you want to write out sources one-by-one as they are validated.
/// See also [`BulkAstromWriter`].
pub struct StreamingAstromWriter<W: Read + Write + Seek> {
    base: AstromWriterBase<W>,
    sys_header: SysHeader,
}

impl<W: Read + Write + Seek> StreamingAstromWriter<W> {
    /// Open a streaming session over `sink`.
    ///
    /// The headers might have been written out in a previous session by a
    /// different writer; in that case we just want to be able to add more
    /// sources. The sink is read once from the start to decide, then left
    /// positioned at the end for append-only writes.
    pub fn new(mut sink: W, sys_header: SysHeader) -> Result<Self, AstromError> {
        sink.seek(SeekFrom::Start(0))?;
        let mut existing = String::new();
        sink.read_to_string(&mut existing)?;

        let mut base = AstromWriterBase::new(sink);
        if existing
            .lines()
            .next()
            .is_some_and(|line| match_observation_line(line).is_some())
        {
            debug!("existing astrom headers detected, resuming appends");
            base.header_written = true;
        }

        Ok(StreamingAstromWriter { base, sys_header })
    }

    /// Writes out data for a single source.
    ///
    /// On the first call of a fresh file this emits the observation list and
    /// header blocks, derived from the source's own readings' observations.
    pub fn write_source(&mut self, source: &Source) -> Result<(), AstromError> {
        if !self.base.header_written {
            let observations: Observations = source
                .get_readings()
                .iter()
                .map(|reading| Arc::clone(reading.get_observation()))
                .collect();
            self.base.write_headers(&observations, &self.sys_header)?;
        }

        self.base.write_source(source)
    }

    pub fn flush(&mut self) -> Result<(), AstromError> {
        self.base.flush()
    }

    /// Flush and release the underlying sink.
    pub fn close(mut self) -> Result<(), AstromError> {
        self.base.flush()
    }
}

#[cfg(test)]
mod test_writer {
    use super::*;

    fn sys_header() -> SysHeader {
        let mut header = SysHeader::default();
        header.insert(RMIN.to_string(), "0.5".to_string());
        header.insert(RMAX.to_string(), "10.3".to_string());
        header.insert(ANGLE.to_string(), "-19.9".to_string());
        header.insert(AWIDTH.to_string(), "22.5".to_string());
        header
    }

    #[test]
    fn test_double_header_write_is_usage_error() {
        let mut buffer = Vec::new();
        let mut base = AstromWriterBase::new(&mut buffer);
        let sys_header = sys_header();

        base.write_headers(&[], &sys_header).unwrap();
        let result = base.write_headers(&[], &sys_header);
        assert!(matches!(
            result,
            Err(AstromError::WriterUsageError(
                WriterUsageError::HeadersAlreadyWritten
            ))
        ));
    }

    #[test]
    fn test_missing_sys_header_key_is_format_error() {
        let mut buffer = Vec::new();
        let mut base = AstromWriterBase::new(&mut buffer);
        let result = base.write_headers(&[], &SysHeader::default());
        assert!(matches!(
            result,
            Err(AstromError::AstromFormatError(
                ParseAstromError::MissingHeaderKey(RMIN)
            ))
        ));
    }
}
