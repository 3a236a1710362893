use serde::{Deserialize, Serialize};

use crate::{
    num::{Quantizer, DEFAULT_PRECISION},
    ConfigError,
};

/// Tuning knobs for filling and polygon drafting.
///
/// Every field has a default, so a host can deserialize a partial config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Number of decimal digits that stroke coordinates are rounded to before
    /// being compared.
    pub precision: u32,
    /// The most vertices a traced face may have before we give up on the walk.
    pub trace_limit: usize,
    /// How close (in the host's cursor units) the cursor must be to a stroke
    /// point to snap to it while drafting a polygon.
    pub snap_radius: f64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            trace_limit: 9999,
            snap_radius: 8.0,
        }
    }
}

impl FillConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quantizer()?;
        // Anything shorter can't even close a triangle.
        if self.trace_limit < 3 {
            return Err(ConfigError::TraceLimitTooSmall(self.trace_limit));
        }
        if !self.snap_radius.is_finite() || self.snap_radius <= 0.0 {
            return Err(ConfigError::InvalidSnapRadius(self.snap_radius));
        }
        Ok(())
    }

    pub fn quantizer(&self) -> Result<Quantizer, ConfigError> {
        Quantizer::new(self.precision)
    }
}
