//! Procedural loading placeholder
//!
//! While analysis is in flight the seekbar shows an organic pulsing bar
//! pattern that needs no real data: a smoothed sum of three sine waves at
//! different phases and frequencies, driven by wall-clock time. Levels may
//! dip below zero; the renderer clamps when sizing bars.

/// Number of placeholder bars across the drawable region
pub const PLACEHOLDER_BAR_COUNT: usize = 250;

/// Placeholder animation speed in radians per second of wall clock
pub const PLACEHOLDER_CLOCK_RATE: f32 = 2.0;

/// Bars reach up to twice the region height before clamping
pub const PLACEHOLDER_HEIGHT_SCALE: f32 = 2.0;

/// Placeholder bars fill this fraction of their slot
pub const PLACEHOLDER_BAR_FILL: f32 = 0.8;

const WAVE_FREQUENCY: f32 = 0.15;
const WAVE_AMPLITUDE: f32 = 0.5;
const BASE_LEVEL: f32 = 0.1;

/// Level of one placeholder bar at the given animation clock
///
/// `clock` is wall-clock seconds times [`PLACEHOLDER_CLOCK_RATE`]. The
/// three components move at different speeds and spatial frequencies so the
/// pattern never visibly repeats.
pub fn placeholder_level(clock: f32, bar: usize) -> f32 {
    let i = bar as f32;

    let wave1 = (clock + i * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE;
    let wave2 = (clock * 1.5 + i * WAVE_FREQUENCY * 0.5).sin() * (WAVE_AMPLITUDE * 0.5);
    let wave3 = (clock * 0.5 + i * WAVE_FREQUENCY * 0.25).sin() * (WAVE_AMPLITUDE * 0.25);

    (wave1 + wave2 + wave3) / 3.0 + BASE_LEVEL
}
