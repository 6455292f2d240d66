use bracket_geometry::prelude::Point;
use tracing::debug;

use crate::map::TileMap;
use crate::rng::RandomSource;

pub const DEFAULT_ENCOUNTER_RATE: f64 = 0.10;

/// Reports whether the observed tile differs from the previous observation.
///
/// The first observation always counts as a change, so standing on grass when
/// exploration starts rolls once.
#[derive(Clone, Debug, Default)]
pub struct TileChangeGate {
    last: Option<Point>,
}

impl TileChangeGate {
    pub fn observe(&mut self, tile: Point) -> bool {
        let changed = self.last != Some(tile);
        self.last = Some(tile);
        changed
    }
}

/// Random encounter policy. Callers gate it with [`TileChangeGate`].
#[derive(Copy, Clone, Debug)]
pub struct EncounterTrigger {
    probability: f64,
}

impl Default for EncounterTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_ENCOUNTER_RATE)
    }
}

impl EncounterTrigger {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draws exactly one value when `tile` is encounter-eligible, none otherwise.
    pub fn check_encounter(&self, map: &TileMap, tile: Point, rng: &mut dyn RandomSource) -> bool {
        if !map.is_encounter_eligible(tile) {
            return false;
        }
        let roll = rng.next_unit();
        let hit = roll < self.probability;
        debug!(x = tile.x, y = tile.y, roll, hit, "encounter roll");
        hit
    }
}
