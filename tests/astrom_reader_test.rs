mod common;

use approx::assert_relative_eq;
use camino::Utf8Path;

use astrom::astrom_errors::{AstromError, ParseAstromError};
use astrom::constants::{
    ANGLE, AWIDTH, CHIP, DETECTOR, EXPTIME, FWHM, MJD_OBS_CENTER, MOPVERSION, RMAX, RMIN,
};
use astrom::{parse, parse_sources, AstromParser};

use common::{init_logging, CANDS_FILE, FAKE_CANDS_FILE};

#[test]
fn test_parse_cands_file() {
    init_logging();

    let data = parse(Utf8Path::new(CANDS_FILE)).unwrap();

    assert_eq!(data.get_source_count(), 2);
    assert_eq!(data.get_reading_count(), 6);

    let observations = data.get_observations();
    assert_eq!(observations.len(), 3);
    assert_eq!(observations[0].rawname(), "1616681p22");
    assert_eq!(observations[1].rawname(), "1616682p22");
    assert_eq!(observations[2].rawname(), "1616703p22");
    assert_eq!(observations[0].expnum(), "1616681");
    assert_eq!(observations[0].ftype(), 'p');
    assert_eq!(observations[0].ccd_num(), 22);
    assert!(!observations[0].is_fake());

    let header = observations[0].header();
    assert_eq!(header.get(MOPVERSION).unwrap(), "1.20");
    assert_eq!(header.get(MJD_OBS_CENTER).unwrap(), "2013 04 09.36658");
    assert_eq!(header.get(EXPTIME).unwrap(), "320.00");
    assert_eq!(header.get(FWHM).unwrap(), "3.10");
    assert_eq!(header.get(CHIP).unwrap(), "22");
    assert_eq!(header.get(DETECTOR).unwrap(), "MegaPrime");
    // header blocks bind to observations in file order
    assert_eq!(observations[1].header().get(FWHM).unwrap(), "3.30");
    assert_eq!(observations[2].header().get(FWHM).unwrap(), "2.90");

    let sys_header = data.get_sys_header();
    assert_eq!(sys_header.get(RMIN).unwrap(), "0.5");
    assert_eq!(sys_header.get(RMAX).unwrap(), "10.3");
    assert_eq!(sys_header.get(ANGLE).unwrap(), "-19.9");
    assert_eq!(sys_header.get(AWIDTH).unwrap(), "22.5");
}

#[test]
fn test_readings_align_with_observations() {
    let data = parse(Utf8Path::new(CANDS_FILE)).unwrap();
    let observations = data.get_observations();

    for source in data.get_sources() {
        assert_eq!(source.num_readings(), observations.len());
        for (i, reading) in source.get_readings().iter().enumerate() {
            assert_eq!(reading.get_observation().as_ref(), observations[i].as_ref());
        }
    }
}

#[test]
fn test_reference_frame_bookkeeping() {
    let data = parse(Utf8Path::new(CANDS_FILE)).unwrap();
    let source = &data.get_sources()[0];

    let first = source.get_reading(0);
    assert_relative_eq!(first.x, 938.80);
    assert_relative_eq!(first.y, 646.29);
    assert_relative_eq!(first.ra, 214.5538051);
    assert_relative_eq!(first.dec, -12.8396228);
    // the reference reading maps onto itself
    assert_eq!(first.reference_source_point(), (938.80, 646.29));

    let second = source.get_reading(1);
    assert_relative_eq!(second.xref, 938.80);
    assert_relative_eq!(second.yref, 646.29);
    assert_relative_eq!(second.x_ref_offset(), 939.30 - 938.64);
    assert_relative_eq!(second.y_ref_offset(), 646.74 - 646.05);

    // second source group seeds its own reference point
    let other = data.get_sources()[1].get_reading(2);
    assert_relative_eq!(other.xref, 1802.03);
    assert_relative_eq!(other.yref, 4439.56);
}

#[test]
fn test_parse_fake_cands_file() {
    init_logging();

    let data = parse(Utf8Path::new(FAKE_CANDS_FILE)).unwrap();

    assert_eq!(data.get_source_count(), 1);
    assert_eq!(data.get_reading_count(), 3);
    let observations = data.get_observations();
    assert_eq!(observations[0].rawname(), "fk1616681s04");
    assert!(observations[0].is_fake());
    assert_eq!(observations[0].ftype(), 's');
    assert_eq!(observations[0].ccdnum(), "04");
    assert_eq!(observations[0].ccd_num(), 4);

    let reading = data.get_sources()[0].get_reading(0);
    // fake exposures live in single-extension per-CCD files
    assert_eq!(reading.get_extension(), 0);
    assert!(!reading.is_inverted());
    assert!(reading.should_invert());
    assert_eq!(
        reading.get_image_uri(),
        "vos://cadc.nrc.ca~vospace/OSSOS/dbimages/1616681/ccd04/fk1616681s04.fits"
    );
}

#[test]
fn test_real_reading_orientation() {
    let data = parse(Utf8Path::new(CANDS_FILE)).unwrap();
    let reading = data.get_sources()[0].get_reading(0);

    // ccd 22 is on the upper half of the mosaic
    assert_eq!(reading.get_ccd_num(), 22);
    assert_eq!(reading.get_extension(), 23);
    assert!(!reading.is_inverted());
    assert!(!reading.should_invert());
    assert!(!reading.from_input_file);
    assert!(!reading.null_observation);
    assert!(!reading.discovery);
}

#[test]
fn test_parse_sources_convenience() {
    let sources = parse_sources(Utf8Path::new(CANDS_FILE)).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].num_readings(), 3);
    assert!(!sources[0].has_provisional_name());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = parse(Utf8Path::new("tests/data/no_such_file.astrom"));
    assert!(matches!(result, Err(AstromError::IoError(_))));
}

#[test]
fn test_short_source_group_is_format_error() {
    // drop the last reading line: the final group has 2 readings for 3 observations
    let filestr = std::fs::read_to_string(CANDS_FILE).unwrap();
    let truncated = filestr.trim_end().rsplit_once('\n').unwrap().0;

    let result = AstromParser::new().parse_str(truncated);
    assert!(matches!(
        result,
        Err(AstromError::AstromFormatError(
            ParseAstromError::ReadingCountMismatch {
                readings: 2,
                observations: 3,
            }
        ))
    ));
}

#[test]
fn test_non_numeric_reading_field_is_format_error() {
    let filestr = std::fs::read_to_string(CANDS_FILE).unwrap();
    let corrupted = filestr.replace(" 214.5538051 ", " not-a-value ");

    let result = AstromParser::new().parse_str(&corrupted);
    assert!(matches!(
        result,
        Err(AstromError::AstromFormatError(
            ParseAstromError::InvalidNumericField { field: "ra", .. }
        ))
    ));
}

#[test]
fn test_short_reading_line_is_format_error() {
    let filestr = std::fs::read_to_string(CANDS_FILE).unwrap();
    let corrupted = filestr.replace(" 214.5538051  -12.8396228", " 214.5538051");

    let result = AstromParser::new().parse_str(&corrupted);
    assert!(matches!(
        result,
        Err(AstromError::AstromFormatError(
            ParseAstromError::ReadingFieldCount { found: 5 }
        ))
    ));
}
