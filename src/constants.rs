//! # Constants and type definitions for astrom
//!
//! This module centralizes the **camera constants**, **header keys**, and **common type
//! definitions** used throughout the `astrom` library. It also defines the container
//! types used to organize observations and source readings.
//!
//! ## Overview
//!
//! - Mosaic-camera geometry constants (CCD inversion boundary, fake-exposure prefix)
//! - Keys of the per-observation and system header blocks
//! - Core type aliases used across the crate
//! - Container types for storing observations and readings

use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::observations::Observation;
use crate::sources::SourceReading;

// -------------------------------------------------------------------------------------------------
// Camera and file-layout constants
// -------------------------------------------------------------------------------------------------

/// Root of the image archive all derived URIs point into.
pub const DATASET_ROOT: &str = "vos://cadc.nrc.ca~vospace/OSSOS/dbimages";

/// Images from CCDs <= 17 have their coordinate axes flipped
pub const MAX_INVERTED_CCD: u32 = 17;

/// Header lines are left-justified to this width on disk.
pub const HEADER_LINE_LENGTH: usize = 80;

/// Rawname prefix marking a fake-planted exposure.
pub const FAKE_PREFIX: &str = "fk";

// -------------------------------------------------------------------------------------------------
// Observation header keys
// -------------------------------------------------------------------------------------------------

pub const MOPVERSION: &str = "MOPversion";

// NOTE: MJD_OBS_CENTER is spelled MJD-OBS-CENTER in the files; the dashed form
// only appears in the column-name rows.
pub const MJD_OBS_CENTER: &str = "MJD_OBS_CENTER";
pub const EXPTIME: &str = "EXPTIME";
pub const THRES: &str = "THRES";
pub const FWHM: &str = "FWHM";
pub const MAXCOUNT: &str = "MAXCOUNT";
pub const CRVAL1: &str = "CRVAL1";
pub const CRVAL2: &str = "CRVAL2";
pub const EXPNUM: &str = "EXPNUM";
pub const SCALE: &str = "SCALE";
pub const CHIP: &str = "CHIP";
pub const CRPIX1: &str = "CRPIX1";
pub const CRPIX2: &str = "CRPIX2";
pub const NAX1: &str = "NAX1";
pub const NAX2: &str = "NAX2";
pub const DETECTOR: &str = "DETECTOR";
pub const PHADU: &str = "PHADU";
pub const RDNOIS: &str = "RDNOIS";

// System header keys
pub const RMIN: &str = "RMIN";
pub const RMAX: &str = "RMAX";
pub const ANGLE: &str = "ANGLE";
pub const AWIDTH: &str = "AWIDTH";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Position on a CCD in pixels
pub type Pixel = f64;
/// Angle in degrees
pub type Degree = f64;

/// String-keyed header block of a single observation.
///
/// Values are kept as the exact strings found in the file so that
/// re-serialization does not lose the on-disk representation.
pub type ObservationHeader = HashMap<String, String, ahash::RandomState>;

/// The four-field system header shared by a whole astrom document
/// (RMIN, RMAX, ANGLE, AWIDTH).
pub type SysHeader = HashMap<String, String, ahash::RandomState>;

/// The ordered observation list of one document.
///
/// Candidate files carry exposure triplets, hence the inline capacity of 3.
pub type Observations = SmallVec<[Arc<Observation>; 3]>;

/// The ordered readings of one source, index-aligned with [`Observations`].
pub type Readings = SmallVec<[SourceReading; 3]>;
