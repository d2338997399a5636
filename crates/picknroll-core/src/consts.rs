/// Maximum number of entries kept in the history log.
pub const HISTORY_MAX_LENGTH: usize = 32;

/// Default number of resident images in the cache. Matches the history bound so
/// every history entry can stay resident under steady rolling.
pub const DEFAULT_CACHE_CAPACITY: usize = HISTORY_MAX_LENGTH;

/// Smallest usable cache: the image on screen plus the one being loaded.
pub const MIN_CACHE_CAPACITY: usize = 2;

/// File extensions (lowercase, without the dot) treated as image candidates.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Base of the logarithmic zoom level. Each level step is a 10% scale change.
pub const ZOOM_BASE: f64 = 1.1;

/// Zoom levels per unit of wheel delta (one 100-unit wheel tick = one level).
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.01;

/// Lower clamp for the zoom scale, in percent.
pub const MIN_SCALE_PERCENT: f64 = 10.0;

/// Upper clamp for the zoom scale, in percent.
pub const MAX_SCALE_PERCENT: f64 = 400.0;

/// Delay before a pending show is reported as "taking a long time".
pub const LOADING_INDICATOR_DELAY_MS: u64 = 300;
