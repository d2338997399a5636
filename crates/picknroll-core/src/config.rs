use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_IMAGE_EXTENSIONS, HISTORY_MAX_LENGTH,
    LOADING_INDICATOR_DELAY_MS, MAX_SCALE_PERCENT, MIN_CACHE_CAPACITY, MIN_SCALE_PERCENT, WHEEL_ZOOM_SENSITIVITY,
    ZOOM_BASE,
};
use crate::error::{Result, ViewerError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Maximum number of resident images before the oldest is evicted.
    pub cache_capacity: usize,
    /// Maximum number of history entries.
    pub history_capacity: usize,
    /// Lowercase extensions (without the dot) accepted as candidates.
    pub image_extensions: Vec<String>,
    /// How long a show may stay pending before a loading indicator appears.
    pub loading_indicator_delay_ms: u64,
    /// Fixed RNG seed for reproducible rolls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub zoom: ZoomConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            history_capacity: HISTORY_MAX_LENGTH,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            zoom: ZoomConfig::default(),
            loading_indicator_delay_ms: LOADING_INDICATOR_DELAY_MS,
            seed: None,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        // The shown image is never evicted, so one slot would overflow.
        if self.cache_capacity < MIN_CACHE_CAPACITY {
            return Err(ViewerError::InvalidConfig(format!(
                "cache_capacity must be >= {MIN_CACHE_CAPACITY} (got {})",
                self.cache_capacity
            )));
        }
        if self.history_capacity == 0 {
            return Err(ViewerError::InvalidConfig(
                "history_capacity must be > 0".into(),
            ));
        }
        self.zoom.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Scale ratio per zoom level.
    pub base: f64,
    /// Zoom levels per unit of wheel delta.
    pub wheel_sensitivity: f64,
    pub min_scale_percent: f64,
    pub max_scale_percent: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            base: ZOOM_BASE,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            min_scale_percent: MIN_SCALE_PERCENT,
            max_scale_percent: MAX_SCALE_PERCENT,
        }
    }
}

impl ZoomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base.is_nan() || self.base <= 1.0 {
            return Err(ViewerError::InvalidConfig(format!(
                "zoom base must be > 1.0 (got {})",
                self.base
            )));
        }
        if !self.wheel_sensitivity.is_finite() {
            return Err(ViewerError::InvalidConfig(format!(
                "zoom wheel_sensitivity must be finite (got {})",
                self.wheel_sensitivity
            )));
        }
        let (min, max) = (self.min_scale_percent, self.max_scale_percent);
        if min.is_nan() || max.is_nan() || min <= 0.0 || min > max {
            return Err(ViewerError::InvalidConfig(format!(
                "zoom bounds must satisfy 0 < min <= max (got {min}..{max})"
            )));
        }
        Ok(())
    }
}
