//! Experience, level and stat derivations.
//!
//! All functions are pure. Level is `floor(cbrt(4 * exp / 5))`, evaluated in
//! integers so perfect cubes never round down through a float cube root.

use crate::data::{Growth, Stats};

/// Largest `level` with `5 * level^3 <= 4 * experience`.
pub fn level_for_experience(experience: u32) -> u32 {
    let target = 4 * u64::from(experience);
    let mut level = ((target as f64 / 5.0).cbrt().floor() as u64).saturating_sub(1);
    while 5 * (level + 1).pow(3) <= target {
        level += 1;
    }
    level as u32
}

/// Smallest experience whose level is at least `level`.
pub fn experience_for_level(level: u32) -> u32 {
    let cube = 5 * u64::from(level).pow(3);
    cube.div_ceil(4).min(u64::from(u32::MAX)) as u32
}

/// Distance to the floored threshold `5 * (level + 1)^3 / 4`. Levels use the
/// exact comparison, so this reads 0 one point early where that threshold is
/// fractional: 156 experience is still level 4.
pub fn experience_to_next_level(experience: u32) -> u32 {
    let next = u64::from(level_for_experience(experience)) + 1;
    let threshold = 5 * next.pow(3) / 4;
    threshold.saturating_sub(u64::from(experience)).min(u64::from(u32::MAX)) as u32
}

pub fn stat_at_level(base: u32, growth: f32, level: u32) -> u32 {
    let value = f64::from(base) + f64::from(level) * f64::from(growth.max(0.0));
    value.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

pub fn stats_at_level(base: &Stats, growth: &Growth, level: u32) -> Stats {
    base.zip(growth, |base, growth| stat_at_level(base, growth, level))
}
