#![allow(dead_code)]

use std::sync::Arc;

use astrom::constants::{
    Observations, Readings, SysHeader, ANGLE, AWIDTH, CHIP, CRPIX1, CRPIX2, CRVAL1, CRVAL2,
    DETECTOR, EXPNUM, EXPTIME, FWHM, MAXCOUNT, MJD_OBS_CENTER, MOPVERSION, NAX1, NAX2, PHADU,
    RDNOIS, RMAX, RMIN, SCALE, THRES,
};
use astrom::{AstromData, Observation, Source, SourceReading};

pub const CANDS_FILE: &str = "tests/data/1616681p22.measure3.cands.astrom";
pub const FAKE_CANDS_FILE: &str = "tests/data/fk1616681s04.measure3.cands.astrom";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sample_sys_header() -> SysHeader {
    let mut sys_header = SysHeader::default();
    sys_header.insert(RMIN.to_string(), "0.5".to_string());
    sys_header.insert(RMAX.to_string(), "10.3".to_string());
    sys_header.insert(ANGLE.to_string(), "-19.9".to_string());
    sys_header.insert(AWIDTH.to_string(), "22.5".to_string());
    sys_header
}

pub fn sample_observation(expnum: &str, mjd: &str, fwhm: &str) -> Observation {
    let mut obs = Observation::new(expnum, 'p', "22", false).unwrap();
    let header = obs.header_mut();
    for (key, value) in [
        (MOPVERSION, "1.20"),
        (MJD_OBS_CENTER, mjd),
        (EXPTIME, "320.00"),
        (THRES, "2.70"),
        (FWHM, fwhm),
        (MAXCOUNT, "30000.0"),
        (CRVAL1, "214.55975"),
        (CRVAL2, "-12.80089"),
        (EXPNUM, expnum),
        (SCALE, "0.185"),
        (CHIP, "22"),
        (CRPIX1, "-1187.00"),
        (CRPIX2, "-309.00"),
        (NAX1, "2112"),
        (NAX2, "4644"),
        (DETECTOR, "MegaPrime"),
        (PHADU, "1.60"),
        (RDNOIS, "3.00"),
    ] {
        header.insert(key.to_string(), value.to_string());
    }
    obs
}

/// A hand-built document with three observations and one source, exercising
/// the entity constructors rather than the parser.
pub fn sample_astrom_data() -> AstromData {
    let observations: Observations = [
        sample_observation("1616681", "2013 04 09.36658", "3.10"),
        sample_observation("1616682", "2013 04 09.38966", "3.30"),
        sample_observation("1616703", "2013 04 09.47683", "2.90"),
    ]
    .into_iter()
    .map(Arc::new)
    .collect();

    let rows = [
        (938.80, 646.29, 938.80, 646.29, 214.5538051, -12.8396228),
        (939.30, 646.74, 938.64, 646.05, 214.5535631, -12.8397419),
        (941.36, 646.99, 938.98, 646.09, 214.5534343, -12.8398656),
    ];
    let (xref, yref) = (rows[0].0, rows[0].1);
    let mut readings = Readings::new();
    for (i, (x, y, x0, y0, ra, dec)) in rows.into_iter().enumerate() {
        readings.push(
            SourceReading::new(
                x,
                y,
                x0,
                y0,
                ra,
                dec,
                xref,
                yref,
                Arc::clone(&observations[i]),
            )
            .unwrap(),
        );
    }

    AstromData::new(
        observations,
        sample_sys_header(),
        vec![Source::new(readings)],
    )
}
