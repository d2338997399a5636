//! Pan/zoom state of the displayed image.
//!
//! Coordinates are centered: `(0, 0)` is the middle of the viewport and the
//! offset is where the image center sits relative to it.

use crate::config::ZoomConfig;
use crate::host::Dimensions;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the area the image is drawn into.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert a top-left based viewport position into centered coordinates.
    pub fn to_centered(&self, pos: Point) -> Point {
        Point::new(pos.x - self.width / 2.0, pos.y - self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale_percent: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale_percent: 100.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Largest scale at which the whole image fits, centered.
    pub fn fit(image: Dimensions, viewport: Viewport) -> Self {
        let fit_x = viewport.width / image.width as f64;
        let fit_y = viewport.height / image.height as f64;
        Self {
            scale_percent: 100.0 * fit_x.min(fit_y),
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Zoom by a wheel delta while keeping the image point under `cursor`
    /// (centered coordinates) in place.
    ///
    /// The zoom level is logarithmic in `config.base`, so equal wheel deltas
    /// give equal scale ratios. The anchor is clamped to the image's on-screen
    /// extent, so zooming with the cursor outside the image pivots on its edge.
    pub fn zoom(&mut self, wheel_delta_y: f64, cursor: Point, image: Dimensions, config: &ZoomConfig) {
        let old_scale = self.scale_percent;
        let level = old_scale.ln() / config.base.ln() - wheel_delta_y * config.wheel_sensitivity;
        let new_scale = config
            .base
            .powf(level)
            .clamp(config.min_scale_percent, config.max_scale_percent);

        if old_scale > 0.0 && old_scale.is_finite() {
            let half_w = image.width as f64 * old_scale / 100.0 / 2.0;
            let half_h = image.height as f64 * old_scale / 100.0 / 2.0;
            let rel_x = (cursor.x - self.offset_x).clamp(-half_w, half_w);
            let rel_y = (cursor.y - self.offset_y).clamp(-half_h, half_h);
            let ratio = new_scale / old_scale;
            self.offset_x += rel_x * (1.0 - ratio);
            self.offset_y += rel_y * (1.0 - ratio);
        }
        self.scale_percent = new_scale;
    }
}

/// Pointer and offset captured when a drag begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragAnchor {
    start_pointer: Point,
    start_offset: Point,
}

impl DragAnchor {
    pub fn begin(pointer: Point, transform: &ViewTransform) -> Self {
        Self {
            start_pointer: pointer,
            start_offset: transform.offset(),
        }
    }

    /// Move the image by the pointer travel since the drag began. Unbounded.
    pub fn apply(&self, pointer: Point, transform: &mut ViewTransform) {
        transform.offset_x = self.start_offset.x + (pointer.x - self.start_pointer.x);
        transform.offset_y = self.start_offset.y + (pointer.y - self.start_pointer.y);
    }
}
