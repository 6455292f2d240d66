use std::sync::Arc;

use bracket_geometry::prelude::Point;

use crate::input::Direction;
use crate::map::TileMap;
use crate::rng::RandomSource;

/// Written by the scene before every dispatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub delta: f32,
    pub direction: Option<Direction>,
}

#[derive(Clone)]
pub struct ActiveMap(pub Arc<TileMap>);

pub struct EncounterRoller(pub Box<dyn RandomSource>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingEncounter {
    pub tile: Point,
}

/// Holds at most one encounter until the scene takes it.
#[derive(Default)]
pub struct EncounterQueue {
    pending: Option<PendingEncounter>,
}

impl EncounterQueue {
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    pub fn push(&mut self, encounter: PendingEncounter) {
        if self.pending.is_none() {
            self.pending = Some(encounter);
        }
    }

    pub fn take(&mut self) -> Option<PendingEncounter> {
        self.pending.take()
    }
}
