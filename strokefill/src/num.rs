//! Fixed-decimal quantization of coordinates.
//!
//! Stroke points come from a host that stores them as floats, and the same
//! corner of a drawing is usually represented by several slightly different
//! floats. We give every coordinate an integer key (the coordinate scaled by
//! `10^precision` and rounded) and rebuild the float from that key, so that
//! two coordinates with the same key are bitwise identical afterwards.

use ordered_float::NotNan;

use crate::ConfigError;

/// The number of decimal digits kept when no precision is configured.
pub const DEFAULT_PRECISION: u32 = 4;

/// The largest supported precision. Beyond this, the scaled keys of ordinary
/// model-space coordinates stop fitting in the exactly representable range of `f64`.
pub const MAX_PRECISION: u32 = 12;

// Scaled values at or above this magnitude are no longer integers we can
// round-trip through an `f64`.
const KEY_LIMIT: f64 = (1u64 << 53) as f64;

/// Rounds coordinates to a fixed number of decimal digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantizer {
    precision: u32,
    scale: f64,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            scale: 10f64.powi(DEFAULT_PRECISION as i32),
        }
    }
}

impl Quantizer {
    pub fn new(precision: u32) -> Result<Self, ConfigError> {
        if precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionOutOfRange(precision));
        }
        Ok(Self {
            precision,
            scale: 10f64.powi(precision as i32),
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// The integer key of a coordinate, or `None` if it is not finite (or so
    /// large that rounding it is meaningless).
    ///
    /// Ties round to even.
    pub fn key(&self, v: f64) -> Option<i64> {
        if !v.is_finite() {
            return None;
        }
        let scaled = (v * self.scale).round_ties_even();
        if scaled.abs() >= KEY_LIMIT {
            return None;
        }
        Some(scaled as i64)
    }

    /// Rounds a coordinate to our precision.
    pub fn round(&self, v: f64) -> Option<NotNan<f64>> {
        let key = self.key(v)?;
        // The division is exact up to the final rounding, and it only depends on
        // the key, so equal keys always give equal floats.
        NotNan::new(key as f64 / self.scale).ok()
    }
}
