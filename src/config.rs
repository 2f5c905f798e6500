//! Application-level configuration constants.

// Stage layout
pub const REGION_COUNT: usize = 4;
pub const CIRCLES_PER_REGION: usize = 100;
pub const REGION_COLORS: [&str; REGION_COUNT] = ["#FF5733", "#33FF57", "#5733FF", "#FF33D4"];

// Size used until a panel has been measured, and for headless runs
pub const FALLBACK_REGION_WIDTH_PX: f64 = 320.0;
pub const FALLBACK_REGION_HEIGHT_PX: f64 = 240.0;

// Marker placement
pub const BOX_INSET_PX: f64 = 10.0;
pub const MARKER_MARGIN_PCT: f64 = 10.0;
pub const MARKER_SPAN_PCT: f64 = 80.0;

// Pacing: the slower effect finishes in roughly this long at 100% participation
pub const RUN_DURATION_MS: f64 = 30_000.0;

// Default values for the sliders
pub const DEFAULT_BOX_TARGET: u32 = 10;
pub const DEFAULT_PARTICIPATION_RATE: u32 = 10;

// Min/Max limits for the sliders
pub const SLIDER_MIN: u32 = 0;
pub const SLIDER_MAX: u32 = 100;
