//! Instrument descriptors derived from an image header.
//!
//! Each descriptor is built from whichever header keys are present; a key
//! that is absent or unparseable leaves the field `None` and never fails
//! the load.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::HeaderRecord;

/// Beam geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Wavelength in Angstrom
    pub wavelength: Option<f64>,
}

/// Detector geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    /// Pixel edge length in mm
    pub pixel_size: Option<f64>,

    /// Sample-to-detector distance in mm
    pub distance: Option<f64>,

    /// Direct-beam position on the detector face in mm (x, y)
    pub beam_center: Option<[f64; 2]>,

    /// Panel dimensions in pixels (slow, fast)
    pub dimensions: Option<[usize; 2]>,
}

/// Goniometer state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goniometer {
    /// Spindle angle in degrees at the start of the exposure
    pub phi: Option<f64>,

    /// Detector two-theta offset in degrees
    pub two_theta: Option<f64>,
}

/// Scan parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// Oscillation start angle in degrees
    pub osc_start: Option<f64>,

    /// Oscillation width in degrees
    pub osc_range: Option<f64>,

    /// Exposure time in seconds
    pub exposure_time: Option<f64>,
}

impl Beam {
    pub fn from_header(header: &HeaderRecord) -> Self {
        Self {
            wavelength: header.get_f64("WAVELENGTH"),
        }
    }
}

impl Detector {
    pub fn from_header(header: &HeaderRecord) -> Self {
        let beam_center = match (
            header.get_f64("BEAM_CENTER_X"),
            header.get_f64("BEAM_CENTER_Y"),
        ) {
            (Some(x), Some(y)) => Some([x, y]),
            _ => None,
        };
        let dimensions = match (header.get_usize("SIZE1"), header.get_usize("SIZE2")) {
            (Some(slow), Some(fast)) => Some([slow, fast]),
            _ => None,
        };
        Self {
            pixel_size: header.get_f64("PIXEL_SIZE"),
            distance: header.get_f64("DISTANCE"),
            beam_center,
            dimensions,
        }
    }
}

impl Goniometer {
    pub fn from_header(header: &HeaderRecord) -> Self {
        Self {
            phi: header.get_f64("PHI"),
            two_theta: header.get_f64("TWOTHETA"),
        }
    }
}

impl Scan {
    pub fn from_header(header: &HeaderRecord) -> Self {
        Self {
            osc_start: header.get_f64("OSC_START"),
            osc_range: header.get_f64("OSC_RANGE"),
            exposure_time: header.get_f64("TIME"),
        }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

impl fmt::Display for Beam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Beam {{ wavelength: {} }}", fmt_opt(self.wavelength))
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let center = match self.beam_center {
            Some([x, y]) => format!("({:.2}, {:.2})", x, y),
            None => "-".to_string(),
        };
        let dims = match self.dimensions {
            Some([slow, fast]) => format!("{}x{}", slow, fast),
            None => "-".to_string(),
        };
        write!(
            f,
            "Detector {{ pixels: {}, pixel_size: {}, distance: {}, beam_center: {} }}",
            dims,
            fmt_opt(self.pixel_size),
            fmt_opt(self.distance),
            center
        )
    }
}

impl fmt::Display for Goniometer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Goniometer {{ phi: {}, two_theta: {} }}",
            fmt_opt(self.phi),
            fmt_opt(self.two_theta)
        )
    }
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scan {{ osc_start: {}, osc_range: {}, exposure: {} }}",
            fmt_opt(self.osc_start),
            fmt_opt(self.osc_range),
            fmt_opt(self.exposure_time)
        )
    }
}
