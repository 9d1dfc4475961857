//! # Exposure/CCD observations
//!
//! One [`Observation`] identifies a single exposure/CCD pair together with the
//! processing header parsed from its astrom header block.
//!
//! ## Identity
//! -----------------
//! An observation is identified by the tuple *(exposure number, processing-stage
//! letter, CCD number)* plus the fake-planted marker. The concatenation of those
//! parts is the `rawname` that appears on the `# <rawname>` marker lines of an
//! astrom file. Identity fields are immutable after construction; only the
//! header map may gain entries later (e.g. an FWHM synthesized by an external
//! header fetch).
//!
//! ## Equality
//! -----------------
//! Two observations are equal iff their identity tuples match. Header content is
//! deliberately ignored so that a freshly parsed observation compares equal to
//! one whose header was enriched afterwards.

use crate::astrom_errors::{AstromError, ParseAstromError};
use crate::constants::{ObservationHeader, DATASET_ROOT, FAKE_PREFIX};

/// Stores data for a single observation (which may be associated with many
/// point sources/readings).
#[derive(Debug, Clone)]
pub struct Observation {
    expnum: String,
    ftype: char,
    ccdnum: String,
    ccd: u32,
    fake: bool,
    rawname: String,
    header: ObservationHeader,
}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        // Identity tuple only; the header map is not part of identity.
        self.fake == other.fake
            && self.expnum == other.expnum
            && self.ftype == other.ftype
            && self.ccdnum == other.ccdnum
    }
}

impl Eq for Observation {}

impl Observation {
    /// Create a new observation.
    ///
    /// Arguments
    /// ---------
    /// * `expnum`: the exposure number (decimal digits, as written in the rawname)
    /// * `ftype`: the processing-stage letter, one of `o`, `p`, `s`
    /// * `ccdnum`: the CCD number (decimal digits, leading zeros preserved)
    /// * `fake`: whether the exposure is a fake-planted one (`fk` rawname prefix)
    ///
    /// Return
    /// ------
    /// * a new Observation, or an [`AstromError::AstromFormatError`] when one of
    ///   the identity fields does not have the required shape.
    pub fn new(expnum: &str, ftype: char, ccdnum: &str, fake: bool) -> Result<Self, AstromError> {
        if !matches!(ftype, 'o' | 'p' | 's') {
            return Err(ParseAstromError::InvalidExposureType(ftype).into());
        }
        if expnum.is_empty() || !expnum.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseAstromError::InvalidNumericField {
                field: "expnum",
                value: expnum.to_string(),
            }
            .into());
        }
        let ccd: u32 = ccdnum
            .parse()
            .map_err(|_| ParseAstromError::InvalidNumericField {
                field: "ccdnum",
                value: ccdnum.to_string(),
            })?;

        let prefix = if fake { FAKE_PREFIX } else { "" };
        let rawname = format!("{prefix}{expnum}{ftype}{ccdnum}");

        Ok(Observation {
            expnum: expnum.to_string(),
            ftype,
            ccdnum: ccdnum.to_string(),
            ccd,
            fake,
            rawname,
            header: ObservationHeader::default(),
        })
    }

    /// Build an observation from the parts of a `# <rawname>` marker line.
    ///
    /// The reconstructed rawname must equal the concatenation of its parsed
    /// parts; this is a sanity cross-check on the parse, not a tolerant
    /// re-assembly.
    pub fn from_parse_data(
        rawname: &str,
        fk: &str,
        expnum: &str,
        ftype: char,
        ccdnum: &str,
    ) -> Result<Self, AstromError> {
        let reconstructed = format!("{fk}{expnum}{ftype}{ccdnum}");
        if rawname != reconstructed {
            return Err(ParseAstromError::RawnameMismatch {
                rawname: rawname.to_string(),
                reconstructed,
            }
            .into());
        }
        Self::new(expnum, ftype, ccdnum, fk == FAKE_PREFIX)
    }

    /// The exposure number as written in the rawname.
    pub fn expnum(&self) -> &str {
        &self.expnum
    }

    /// The processing-stage letter (`o`, `p` or `s`).
    pub fn ftype(&self) -> char {
        self.ftype
    }

    /// The CCD number as written in the rawname (leading zeros preserved).
    pub fn ccdnum(&self) -> &str {
        &self.ccdnum
    }

    /// The CCD number as an integer.
    pub fn ccd_num(&self) -> u32 {
        self.ccd
    }

    /// The full `<fk?><expnum><ftype><ccdnum>` name of this observation.
    pub fn rawname(&self) -> &str {
        &self.rawname
    }

    pub fn is_fake(&self) -> bool {
        self.fake
    }

    /// The processing header parsed from this observation's header block.
    pub fn header(&self) -> &ObservationHeader {
        &self.header
    }

    /// Mutable access to the header map.
    ///
    /// Used by the parser while populating the block, and by external header
    /// fetch paths that inject synthesized entries (FWHM, MAXCOUNT) afterwards.
    pub fn header_mut(&mut self) -> &mut ObservationHeader {
        &mut self.header
    }

    /// URI of the image this observation was measured on.
    ///
    /// Fake-planted exposures are stored per CCD under a `ccd<n>/` subdirectory;
    /// real exposures resolve to the full multi-extension file.
    pub fn get_image_uri(&self) -> String {
        if self.is_fake() {
            format!(
                "{}/{}/ccd{}/{}.fits",
                DATASET_ROOT, self.expnum, self.ccdnum, self.rawname
            )
        } else {
            format!(
                "{}/{}/{}{}.fits",
                DATASET_ROOT, self.expnum, self.expnum, self.ftype
            )
        }
    }

    /// URI of the list of artificial objects planted on this CCD.
    pub fn get_object_planted_uri(&self) -> String {
        format!(
            "{}/{}/ccd{}/Object.planted",
            DATASET_ROOT, self.expnum, self.ccdnum
        )
    }

    /// URI of the aperture-correction file for this observation.
    pub fn get_apcor_uri(&self) -> String {
        format!(
            "{}/{}/ccd{:02}/{}.apcor",
            DATASET_ROOT, self.expnum, self.ccd, self.rawname
        )
    }
}
