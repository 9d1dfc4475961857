//! # Astrom document parser
//!
//! Turns the raw text of an astrom file into a validated
//! [`AstromData`] entity graph.
//!
//! ## Overview
//! -----------------
//! [`AstromParser`] makes four passes over the same in-memory text, one per
//! structural section:
//! 1. the observation list (`# <rawname>` marker lines),
//! 2. the per-observation six-line header blocks,
//! 3. the system header,
//! 4. the source table.
//!
//! Matching is a small hand-written line parser with explicit section cursors;
//! the ordering and count cross-checks between sections are enforced
//! explicitly rather than being a side effect of pattern matching:
//! * the number of header blocks must equal the number of observations, and
//!   blocks bind to observations in file order,
//! * every source group must carry exactly one reading line per observation,
//!   index-aligned with the observation list.
//!
//! ## Error Handling
//! -----------------
//! Structural violations surface as
//! [`AstromError::AstromFormatError`] with a payload naming the failed
//! invariant; I/O failures from reading the underlying file are propagated
//! unchanged as [`AstromError::IoError`].

use std::sync::Arc;

use camino::Utf8Path;
use log::debug;

use super::{parse_f64, parse_u64};
use crate::astrom_data::AstromData;
use crate::astrom_errors::{AstromError, ParseAstromError};
use crate::constants::{
    Observations, Readings, SysHeader, ANGLE, AWIDTH, CHIP, CRPIX1, CRPIX2, CRVAL1, CRVAL2,
    EXPNUM, EXPTIME, FAKE_PREFIX, FWHM, MAXCOUNT, MJD_OBS_CENTER, MOPVERSION, NAX1, NAX2, PHADU,
    RDNOIS, RMAX, RMIN, SCALE, THRES,
};
use crate::observations::Observation;
use crate::sources::{Source, SourceReading};

/// Column names of the first per-observation header row, in file order.
const OBS_HEADER_COLS_1: [&str; 8] = [
    "MJD-OBS-CENTER",
    "EXPTIME",
    "THRES",
    "FWHM",
    "MAXCOUNT",
    "CRVAL1",
    "CRVAL2",
    "EXPNUM",
];

/// Column names of the second per-observation header row, in file order.
const OBS_HEADER_COLS_2: [&str; 9] = [
    "SCALE", "CHIP", "CRPIX1", "CRPIX2", "NAX1", "NAX2", "DETECTOR", "PHADU", "RDNOIS",
];

const SYS_HEADER_COLS: [&str; 4] = [RMIN, RMAX, ANGLE, AWIDTH];

const SOURCE_LIST_COLS: [&str; 6] = ["X", "Y", "X_0", "Y_0", "R.A.", "DEC"];

/// Parts of a matched `# <rawname>` observation marker line.
pub(crate) struct ObsLineParts<'a> {
    pub rawname: &'a str,
    pub fk: &'a str,
    pub expnum: &'a str,
    pub ftype: char,
    pub ccdnum: &'a str,
}

/// Match one observation marker line: `#`, whitespace, then a rawname made of
/// an optional fake prefix, a 7-digit exposure number, a processing-stage
/// letter and the CCD digits, with nothing else on the line.
pub(crate) fn match_observation_line(line: &str) -> Option<ObsLineParts<'_>> {
    let rest = line.strip_prefix('#')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rawname = rest.trim();
    if rawname.is_empty() || rawname.contains(char::is_whitespace) {
        return None;
    }

    let (fk, body) = match rawname.strip_prefix(FAKE_PREFIX) {
        Some(body) => (FAKE_PREFIX, body),
        None => ("", rawname),
    };
    if body.len() < 9 {
        return None;
    }
    let (expnum, rest) = body.split_at(7);
    if !expnum.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let ftype = rest.chars().next()?;
    if !matches!(ftype, 'o' | 'p' | 's') {
        return None;
    }
    let ccdnum = &rest[1..];
    if ccdnum.is_empty() || !ccdnum.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(ObsLineParts {
        rawname,
        fk,
        expnum,
        ftype,
        ccdnum,
    })
}

/// A `## <names...>` column-names row, tokenized.
fn column_names(line: &str) -> Option<Vec<&str>> {
    let rest = line.strip_prefix("##")?;
    Some(rest.split_whitespace().collect())
}

/// A `# <values...>` row: the content after the marker, or `None` when the
/// line does not have the single-hash prefix.
fn value_row(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest)
}

/// Parses an astrom file which specifies exposure numbers, identified point
/// sources, their x/y locations and source readings for potential moving
/// objects.
#[derive(Debug, Default)]
pub struct AstromParser;

impl AstromParser {
    /// Creates the parser.
    pub fn new() -> Self {
        AstromParser
    }

    /// Parses a file into an [`AstromData`] structure.
    ///
    /// Arguments
    /// ---------
    /// * `filename`: the path of the file whose contents will be parsed.
    ///
    /// Return
    /// ------
    /// * the file contents extracted into a data structure for programmatic
    ///   access.
    pub fn parse_file(&self, filename: &Utf8Path) -> Result<AstromData, AstromError> {
        let filestr = std::fs::read_to_string(filename)?;
        self.parse_str(&filestr)
    }

    /// Parses raw astrom text into an [`AstromData`] structure.
    pub fn parse_str(&self, filestr: &str) -> Result<AstromData, AstromError> {
        let mut observations = self.parse_observation_list(filestr)?;
        self.parse_observation_headers(filestr, &mut observations)?;
        let sys_header = self.parse_system_header(filestr)?;

        let observations: Observations = observations.into_iter().map(Arc::new).collect();
        let sources = self.parse_source_data(filestr, &observations)?;

        debug!(
            "parsed astrom document: {} observations, {} sources",
            observations.len(),
            sources.len()
        );

        Ok(AstromData::new(observations, sys_header, sources))
    }

    fn parse_observation_list(&self, filestr: &str) -> Result<Vec<Observation>, AstromError> {
        let mut observations = Vec::new();
        for line in filestr.lines() {
            if let Some(parts) = match_observation_line(line) {
                observations.push(Observation::from_parse_data(
                    parts.rawname,
                    parts.fk,
                    parts.expnum,
                    parts.ftype,
                    parts.ccdnum,
                )?);
            }
        }
        Ok(observations)
    }

    fn parse_observation_headers(
        &self,
        filestr: &str,
        observations: &mut [Observation],
    ) -> Result<(), AstromError> {
        let lines: Vec<&str> = filestr.lines().collect();
        let mut parsed = 0usize;
        let mut i = 0usize;
        while i < lines.len() {
            let is_block_start =
                column_names(lines[i]).is_some_and(|names| names == [MOPVERSION]);
            if !is_block_start {
                i += 1;
                continue;
            }
            if i + 6 > lines.len() {
                return Err(ParseAstromError::TruncatedObservationHeader { line: i + 1 }.into());
            }

            let block = &lines[i..i + 6];
            if let Some(obs) = observations.get_mut(parsed) {
                parse_header_block(block, i + 1, obs)?;
            }
            parsed += 1;
            i += 6;
        }

        if parsed != observations.len() {
            return Err(ParseAstromError::HeaderCountMismatch {
                headers: parsed,
                observations: observations.len(),
            }
            .into());
        }
        Ok(())
    }

    fn parse_system_header(&self, filestr: &str) -> Result<SysHeader, AstromError> {
        let lines: Vec<&str> = filestr.lines().collect();
        let marker = lines
            .iter()
            .position(|line| column_names(line).is_some_and(|names| names == SYS_HEADER_COLS))
            .ok_or(ParseAstromError::MissingSystemHeader)?;

        let values = lines
            .get(marker + 1)
            .and_then(|line| value_row(line))
            .ok_or(ParseAstromError::MissingSystemHeader)?;
        let fields: Vec<&str> = values.split_whitespace().collect();
        if fields.len() != SYS_HEADER_COLS.len() {
            return Err(ParseAstromError::MissingSystemHeader.into());
        }

        let mut sys_header = SysHeader::default();
        for (&key, &value) in SYS_HEADER_COLS.iter().zip(fields.iter()) {
            parse_f64(key, value)?;
            sys_header.insert(key.to_string(), value.to_string());
        }
        Ok(sys_header)
    }

    fn parse_source_data(
        &self,
        filestr: &str,
        observations: &Observations,
    ) -> Result<Vec<Source>, AstromError> {
        // Locate the source-table column row and keep a cursor to the raw text
        // after it: group separation is a byte-level contract (one blank line
        // per source), so the section body is split as text, not as lines.
        let mut offset = 0usize;
        let mut body: Option<&str> = None;
        for line in filestr.split_inclusive('\n') {
            offset += line.len();
            if column_names(line.trim_end()).is_some_and(|names| names == SOURCE_LIST_COLS) {
                body = Some(&filestr[offset..]);
                break;
            }
        }
        let body = body.ok_or(ParseAstromError::MissingSourceList)?.trim_start();

        let mut sources = Vec::new();
        for raw_source in body.split("\n\n") {
            let source_lines: Vec<&str> = raw_source.trim().lines().collect();
            if source_lines.len() != observations.len() {
                return Err(ParseAstromError::ReadingCountMismatch {
                    readings: source_lines.len(),
                    observations: observations.len(),
                }
                .into());
            }

            let mut readings = Readings::new();
            let mut xref = 0.0;
            let mut yref = 0.0;
            for (i, line) in source_lines.iter().enumerate() {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() != 6 {
                    return Err(ParseAstromError::ReadingFieldCount {
                        found: fields.len(),
                    }
                    .into());
                }
                let x = parse_f64("x", fields[0])?;
                let y = parse_f64("y", fields[1])?;
                let x0 = parse_f64("x0", fields[2])?;
                let y0 = parse_f64("y0", fields[3])?;
                let ra = parse_f64("ra", fields[4])?;
                let dec = parse_f64("dec", fields[5])?;

                // The first line of a group is the reference reading: its raw
                // position seeds xref/yref for every reading of the source.
                if i == 0 {
                    xref = x;
                    yref = y;
                }

                readings.push(SourceReading::new(
                    x,
                    y,
                    x0,
                    y0,
                    ra,
                    dec,
                    xref,
                    yref,
                    Arc::clone(&observations[i]),
                )?);
            }
            sources.push(Source::new(readings));
        }

        Ok(sources)
    }
}

/// Parse one six-line observation header block into `obs`'s header map.
///
/// `line_no` is the 1-based line number of the `## MOPversion` row, used only
/// for error reporting. All values are stored as the exact strings found in
/// the file.
fn parse_header_block(
    block: &[&str],
    line_no: usize,
    obs: &mut Observation,
) -> Result<(), AstromError> {
    // line 1: version value
    let version = value_row(block[1])
        .map(str::trim)
        .ok_or(ParseAstromError::MalformedHeaderRow { line: line_no + 1 })?;
    if !is_version(version) {
        return Err(ParseAstromError::InvalidNumericField {
            field: MOPVERSION,
            value: version.to_string(),
        }
        .into());
    }

    // line 2: first column-names row
    if !column_names(block[2]).is_some_and(|names| names == OBS_HEADER_COLS_1) {
        return Err(ParseAstromError::MalformedHeaderColumns { line: line_no + 2 }.into());
    }

    // line 3: first values row. MJD-OBS-CENTER spans the first three tokens
    // (YYYY MM DD.ddddd), so the row carries 10 tokens for 8 keys.
    let values = value_row(block[3])
        .ok_or(ParseAstromError::MalformedHeaderRow { line: line_no + 3 })?;
    let fields: Vec<&str> = values.split_whitespace().collect();
    if fields.len() != 10 {
        return Err(ParseAstromError::MalformedHeaderRow { line: line_no + 3 }.into());
    }
    let (year, month, day) = (fields[0], fields[1], fields[2]);
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseAstromError::InvalidNumericField {
            field: MJD_OBS_CENTER,
            value: year.to_string(),
        }
        .into());
    }
    if month.len() != 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseAstromError::InvalidNumericField {
            field: MJD_OBS_CENTER,
            value: month.to_string(),
        }
        .into());
    }
    if !day.contains('.') {
        return Err(ParseAstromError::InvalidNumericField {
            field: MJD_OBS_CENTER,
            value: day.to_string(),
        }
        .into());
    }
    parse_f64(MJD_OBS_CENTER, day)?;
    parse_f64(EXPTIME, fields[3])?;
    parse_f64(THRES, fields[4])?;
    parse_f64(FWHM, fields[5])?;
    parse_f64(MAXCOUNT, fields[6])?;
    parse_f64(CRVAL1, fields[7])?;
    parse_f64(CRVAL2, fields[8])?;
    parse_u64(EXPNUM, fields[9])?;

    // line 4: second column-names row
    if !column_names(block[4]).is_some_and(|names| names == OBS_HEADER_COLS_2) {
        return Err(ParseAstromError::MalformedHeaderColumns { line: line_no + 4 }.into());
    }

    // line 5: second values row
    let values = value_row(block[5])
        .ok_or(ParseAstromError::MalformedHeaderRow { line: line_no + 5 })?;
    let fields2: Vec<&str> = values.split_whitespace().collect();
    if fields2.len() != OBS_HEADER_COLS_2.len() {
        return Err(ParseAstromError::MalformedHeaderRow { line: line_no + 5 }.into());
    }
    parse_f64(SCALE, fields2[0])?;
    parse_u64(CHIP, fields2[1])?;
    parse_f64(CRPIX1, fields2[2])?;
    parse_f64(CRPIX2, fields2[3])?;
    parse_u64(NAX1, fields2[4])?;
    parse_u64(NAX2, fields2[5])?;
    parse_f64(PHADU, fields2[7])?;
    parse_f64(RDNOIS, fields2[8])?;

    let header = obs.header_mut();
    header.insert(MOPVERSION.to_string(), version.to_string());
    header.insert(
        MJD_OBS_CENTER.to_string(),
        format!("{year} {month} {day}"),
    );
    for (&key, &value) in [EXPTIME, THRES, FWHM, MAXCOUNT, CRVAL1, CRVAL2, EXPNUM]
        .iter()
        .zip(fields[3..].iter())
    {
        header.insert(key.to_string(), value.to_string());
    }
    for (&key, &value) in OBS_HEADER_COLS_2.iter().zip(fields2.iter()) {
        header.insert(key.to_string(), value.to_string());
    }

    Ok(())
}

/// Version strings look like `1.20`: digits, a dot, then digits or letters.
fn is_version(value: &str) -> bool {
    let Some((major, minor)) = value.split_once('.') else {
        return false;
    };
    !major.is_empty()
        && major.chars().all(|c| c.is_ascii_digit())
        && !minor.is_empty()
        && minor.chars().all(|c| c.is_ascii_alphanumeric())
}
