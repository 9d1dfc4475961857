//! Fixed-width row formatting shared by the bulk and streaming writers.
//!
//! Every row shape the parser recognizes is produced here and nowhere else, so
//! the on-disk contract cannot drift between the two writer modes. Widths and
//! precisions mirror the pipeline steps that originally emitted these files.

use crate::sources::SourceReading;

/// Marker row opening each per-observation header block.
pub(crate) const MOPVERSION_ROW: &str = "## MOPversion";

/// Column names of the first per-observation header row.
pub(crate) const OBS_HEADER_NAMES_ROW_1: &str =
    "## MJD-OBS-CENTER  EXPTIME THRES FWHM  MAXCOUNT CRVAL1     CRVAL2     EXPNUM";

/// Column names of the second per-observation header row.
pub(crate) const OBS_HEADER_NAMES_ROW_2: &str =
    "## SCALE CHIP CRPIX1    CRPIX2    NAX1  NAX2   DETECTOR           PHADU RDNOIS";

/// Column names of the system header.
pub(crate) const SYS_HEADER_NAMES_ROW: &str = "##     RMIN    RMAX   ANGLE   AWIDTH";

/// Column names of the source table.
pub(crate) const SOURCE_LIST_NAMES_ROW: &str =
    "##   X        Y        X_0     Y_0          R.A.          DEC";

pub(crate) fn observation_list_row(rawname: &str) -> String {
    format!("# {rawname}")
}

pub(crate) fn mopversion_value_row(version: &str) -> String {
    format!("#  {version}")
}

/// First header values row. `mjd_obs_center` is written verbatim: it is the
/// `YYYY MM DD.ddddd` string captured at parse time, not a recomputed value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn observation_header_row_1(
    mjd_obs_center: &str,
    exptime: f64,
    thres: f64,
    fwhm: f64,
    maxcount: f64,
    crval1: f64,
    crval2: f64,
    expnum: i64,
) -> String {
    format!(
        "# {mjd_obs_center}{exptime:8.2}{thres:6.2}{fwhm:6.2}{maxcount:9.1}{crval1:11.5}{crval2:11.5}{expnum:9}"
    )
}

/// Second header values row; the detector name occupies a fixed 20-column field.
#[allow(clippy::too_many_arguments)]
pub(crate) fn observation_header_row_2(
    scale: f64,
    chip: i64,
    crpix1: f64,
    crpix2: f64,
    nax1: i64,
    nax2: i64,
    detector: &str,
    phadu: f64,
    rdnois: f64,
) -> String {
    format!(
        "# {scale:6.3}{chip:4}{crpix1:10.2}{crpix2:10.2}{nax1:6}{nax2:6} {detector:<20}{phadu:5.2} {rdnois:5.2}"
    )
}

pub(crate) fn sys_header_row(rmin: f64, rmax: f64, angle: f64, awidth: f64) -> String {
    format!("# {rmin:8.1}{rmax:8.1}{angle:8.1}{awidth:8.1}")
}

/// One reading line of the source table: two pairs of 2-decimal pixel
/// coordinates and one pair of 7-decimal sky coordinates.
pub(crate) fn reading_row(reading: &SourceReading) -> String {
    format!(
        " {:8.2} {:8.2} {:8.2} {:8.2} {:12.7} {:12.7}",
        reading.x, reading.y, reading.x0, reading.y0, reading.ra, reading.dec
    )
}

#[cfg(test)]
mod test_format {
    use super::*;

    use std::sync::Arc;

    use crate::observations::Observation;

    #[test]
    fn test_observation_header_row_1() {
        let row = observation_header_row_1(
            "2013 04 09.36658",
            320.0,
            2.7,
            3.1,
            30000.0,
            214.55975,
            -12.80089,
            1616681,
        );
        assert_eq!(
            row,
            "# 2013 04 09.36658  320.00  2.70  3.10  30000.0  214.55975  -12.80089  1616681"
        );
    }

    #[test]
    fn test_observation_header_row_2() {
        let row = observation_header_row_2(
            0.185, 22, -1187.0, -309.0, 2112, 4644, "MegaPrime", 1.6, 3.0,
        );
        assert_eq!(
            row,
            "#  0.185  22  -1187.00   -309.00  2112  4644 MegaPrime            1.60  3.00"
        );
    }

    #[test]
    fn test_sys_header_row() {
        assert_eq!(
            sys_header_row(0.5, 10.3, -19.9, 22.5),
            "#      0.5    10.3   -19.9    22.5"
        );
    }

    #[test]
    fn test_reading_row() {
        let obs = Arc::new(Observation::new("1616681", 'p', "22", false).unwrap());
        let reading = SourceReading::new(
            938.8,
            646.29,
            938.8,
            646.29,
            214.5538051,
            -12.8396228,
            938.8,
            646.29,
            obs,
        )
        .unwrap();
        assert_eq!(
            reading_row(&reading),
            "   938.80   646.29   938.80   646.29  214.5538051  -12.8396228"
        );
    }
}
