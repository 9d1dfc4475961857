//! # Sources and their readings
//!
//! A [`Source`] is one candidate moving object: an ordered collection of
//! [`SourceReading`]s, one per observation of the document, in observation
//! order. A [`SourceReading`] is a single measurement of the source on one
//! exposure, together with the bookkeeping that relates its pixel position to
//! the frame of the source's first (reference) observation.
//!
//! ## Reference-frame bookkeeping
//! -----------------
//! Each reading carries both its raw position `(x, y)` and the same position
//! expressed in the reference observation's frame `(x0, y0)`. The offset
//! between the two is computed once at construction and never recomputed, so
//! two readings from different exposures can be compared in one consistent
//! frame without re-deriving a transform.
//!
//! ## Orientation
//! -----------------
//! The lower half of the mosaic (CCDs <= [`MAX_INVERTED_CCD`]) is physically
//! flipped relative to the upper half. Whether a stored image *is* inverted and
//! whether it *should be* flipped for display are two independent predicates
//! selecting opposite exposure kinds; see [`SourceReading::is_inverted`] and
//! [`SourceReading::should_invert`].

use std::sync::Arc;

use log::debug;

use crate::astrom_errors::{AstromError, ParseAstromError};
use crate::constants::{
    Degree, ObservationHeader, Pixel, Readings, MAX_INVERTED_CCD, NAX1, NAX2,
};
use crate::observations::Observation;

/// Data for a detected point source (which is a potential moving object).
#[derive(Debug, Clone)]
pub struct SourceReading {
    /// Pixel position of the source in this reading's image.
    pub x: Pixel,
    pub y: Pixel,
    /// The same position, in the coordinate frame of the reference image.
    pub x0: Pixel,
    pub y0: Pixel,
    pub ra: Degree,
    pub dec: Degree,
    /// Position of the source in the reference image, in the reference
    /// image's own frame.
    pub xref: Pixel,
    pub yref: Pixel,

    x_ref_offset: Pixel,
    y_ref_offset: Pixel,

    obs: Arc<Observation>,

    /// Cross-matched comparison reading; selects the inversion policy.
    pub ssos: bool,
    pub from_input_file: bool,
    pub null_observation: bool,
    pub discovery: bool,
}

impl SourceReading {
    /// Create a new reading.
    ///
    /// Arguments
    /// ---------
    /// * `x`, `y`: the coordinates of the source in this reading.
    /// * `x0`, `y0`: the coordinates of the source in this reading, but in
    ///   the coordinate frame of the reference image.
    /// * `ra`, `dec`: sky position at the time of this reading, in degrees.
    /// * `xref`, `yref`: coordinates of the source in the reference image, in
    ///   the reference image's coordinate frame.
    /// * `obs`: the observation in which this reading was taken.
    ///
    /// Return
    /// ------
    /// * a new reading with all flags cleared, or an
    ///   [`AstromError::AstromFormatError`] when any numeric field is not finite.
    ///
    /// The reference offsets `x - x0` and `y - y0` are derived here, once, and
    /// are invariant for the lifetime of the reading.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: Pixel,
        y: Pixel,
        x0: Pixel,
        y0: Pixel,
        ra: Degree,
        dec: Degree,
        xref: Pixel,
        yref: Pixel,
        obs: Arc<Observation>,
    ) -> Result<Self, AstromError> {
        for (field, value) in [
            ("x", x),
            ("y", y),
            ("x0", x0),
            ("y0", y0),
            ("ra", ra),
            ("dec", dec),
            ("xref", xref),
            ("yref", yref),
        ] {
            if !value.is_finite() {
                return Err(ParseAstromError::InvalidNumericField {
                    field,
                    value: value.to_string(),
                }
                .into());
            }
        }

        Ok(SourceReading {
            x,
            y,
            x0,
            y0,
            ra,
            dec,
            xref,
            yref,
            x_ref_offset: x - x0,
            y_ref_offset: y - y0,
            obs,
            ssos: false,
            from_input_file: false,
            null_observation: false,
            discovery: false,
        })
    }

    /// The raw position of the source in this reading's image.
    pub fn source_point(&self) -> (Pixel, Pixel) {
        (self.x, self.y)
    }

    /// Offset between this reading's frame and the reference frame, derived at
    /// construction.
    pub fn x_ref_offset(&self) -> Pixel {
        self.x_ref_offset
    }

    pub fn y_ref_offset(&self) -> Pixel {
        self.y_ref_offset
    }

    /// The location of the source in the reference image, in terms of the
    /// current image coordinates.
    pub fn reference_source_point(&self) -> (Pixel, Pixel) {
        (
            self.xref + self.x_ref_offset,
            self.yref + self.y_ref_offset,
        )
    }

    /// Calculates the offsets between readings' coordinate systems.
    ///
    /// Arguments
    /// ---------
    /// * `other_reading`: the reading to compare coordinate systems with.
    ///
    /// Return
    /// ------
    /// * the x and y offsets between this reading and the other reading's
    ///   coordinate systems. Used to decide whether two candidates from
    ///   independently parsed sessions are the same physical detection.
    pub fn get_coordinate_offset(&self, other_reading: &SourceReading) -> (Pixel, Pixel) {
        let (my_x, my_y) = self.reference_source_point();
        let (other_x, other_y) = other_reading.reference_source_point();
        (my_x - other_x, my_y - other_y)
    }

    /// The observation in which this reading was taken.
    pub fn get_observation(&self) -> &Arc<Observation> {
        &self.obs
    }

    pub fn get_observation_header(&self) -> &ObservationHeader {
        self.obs.header()
    }

    /// Pixel dimensions (NAX1, NAX2) of the original image.
    pub fn get_original_image_size(&self) -> Result<(u32, u32), AstromError> {
        let header = self.get_observation_header();
        let axis = |key: &'static str| -> Result<u32, AstromError> {
            let value = header
                .get(key)
                .ok_or(ParseAstromError::MissingHeaderKey(key))?;
            value
                .parse()
                .map_err(|_| {
                    ParseAstromError::InvalidNumericField {
                        field: key,
                        value: value.clone(),
                    }
                    .into()
                })
        };
        Ok((axis(NAX1)?, axis(NAX2)?))
    }

    pub fn get_exposure_number(&self) -> &str {
        self.obs.expnum()
    }

    pub fn get_image_uri(&self) -> String {
        self.obs.get_image_uri()
    }

    pub fn get_apcor_uri(&self) -> String {
        self.obs.get_apcor_uri()
    }

    /// The number of the CCD that the image is on.
    pub fn get_ccd_num(&self) -> u32 {
        self.obs.ccd_num()
    }

    /// The FITS file extension holding this reading's image.
    ///
    /// Fake-planted exposures are stored as single-extension per-CCD files, so
    /// their extension is always 0. For real exposures the CCD is the
    /// extension, but FITS extensions start at 1: ccd n lives in extension n + 1.
    pub fn get_extension(&self) -> u32 {
        if self.obs.is_fake() {
            return 0;
        }
        self.get_ccd_num() + 1
    }

    /// True if the stored image is inverted.
    pub fn is_inverted(&self) -> bool {
        debug!(
            "checking invert on {} {}",
            self.obs.expnum(),
            self.obs.ccdnum()
        );
        if self.ssos || self.obs.is_fake() {
            // Comparison and fake images come from the per-CCD directory and
            // have already been corrected for inversion.
            debug!("inversion override for {}", self.obs.rawname());
            return false;
        }
        self.get_ccd_num() <= MAX_INVERTED_CCD
    }

    /// True if the stored image should be flipped for display.
    ///
    /// The opposite exposure-kind selection from [`Self::is_inverted`]:
    /// comparison and fake images are fetched from the full MEF, so only those
    /// need the display-time flip on the lower half of the mosaic.
    pub fn should_invert(&self) -> bool {
        if self.ssos || self.obs.is_fake() {
            return self.get_ccd_num() <= MAX_INVERTED_CCD;
        }
        false
    }
}

/// A collection of source readings, one per observation of the document.
#[derive(Debug, Clone)]
pub struct Source {
    readings: Readings,
    provisional_name: Option<String>,
}

impl Source {
    pub fn new(readings: Readings) -> Self {
        Source {
            readings,
            provisional_name: None,
        }
    }

    pub fn get_reading(&self, index: usize) -> &SourceReading {
        &self.readings[index]
    }

    pub fn get_readings(&self) -> &[SourceReading] {
        &self.readings
    }

    pub fn num_readings(&self) -> usize {
        self.readings.len()
    }

    pub fn has_provisional_name(&self) -> bool {
        self.provisional_name.is_some()
    }

    pub fn get_provisional_name(&self) -> Option<&str> {
        self.provisional_name.as_deref()
    }

    /// Assigned by an external naming collaborator, never by the parser.
    pub fn set_provisional_name(&mut self, provisional_name: String) {
        self.provisional_name = Some(provisional_name);
    }
}
