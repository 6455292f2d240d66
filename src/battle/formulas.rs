//! Battle arithmetic. Every input is clamped; nothing here can fail.

pub const CATCH_FLOOR: f64 = 0.3;
pub const CATCH_CEILING: f64 = 0.9;
const CATCH_HEALTH_WEIGHT: f64 = 0.4;

/// `max(1, attack - defense + floor(roll * 5))`, with `roll` in `[0, 1)`.
pub fn damage(attack: u32, defense: u32, roll: f64) -> u32 {
    let bonus = (roll.clamp(0.0, 1.0 - f64::EPSILON) * 5.0).floor() as i64;
    let raw = i64::from(attack) - i64::from(defense) + bonus;
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// Rises linearly from 0.3 at full health to 0.7 at zero health, clamped to [0.3, 0.9].
pub fn catch_chance(health: u32, max_health: u32) -> f64 {
    let health_factor = if max_health == 0 {
        1.0
    } else {
        1.0 - (f64::from(health.min(max_health)) / f64::from(max_health))
    };
    (CATCH_FLOOR + health_factor * CATCH_HEALTH_WEIGHT).clamp(CATCH_FLOOR, CATCH_CEILING)
}

/// Experience awarded for knocking out an opponent of `level`.
pub fn victory_experience(level: u32) -> u32 {
    level.max(1).saturating_mul(12)
}
