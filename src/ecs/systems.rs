use specs::prelude::*;
use tracing::debug;

use crate::encounter::EncounterTrigger;

use super::{
    components::{GridMover, PlayerTag, TileTracker},
    resources::{ActiveMap, EncounterQueue, EncounterRoller, FrameInput, PendingEncounter},
};

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        ReadExpect<'a, FrameInput>,
        WriteStorage<'a, GridMover>,
        ReadStorage<'a, PlayerTag>,
    );

    fn run(&mut self, (frame, mut movers, players): Self::SystemData) {
        for (mover, _) in (&mut movers, &players).join() {
            let report = mover.0.update(frame.delta, frame.direction);
            if report.tile_changed {
                let tile = mover.0.tile();
                debug!(
                    x = tile.x,
                    y = tile.y,
                    facing = mover.0.facing().as_str(),
                    "player entered tile"
                );
            }
        }
    }
}

/// Rolls only when a tracked mover's logical tile differs from the last one it saw.
#[derive(Default)]
pub struct EncounterSystem;

impl<'a> System<'a> for EncounterSystem {
    type SystemData = (
        ReadStorage<'a, GridMover>,
        WriteStorage<'a, TileTracker>,
        ReadExpect<'a, ActiveMap>,
        ReadExpect<'a, EncounterTrigger>,
        WriteExpect<'a, EncounterRoller>,
        WriteExpect<'a, EncounterQueue>,
    );

    fn run(
        &mut self,
        (movers, mut trackers, map, trigger, mut roller, mut queue): Self::SystemData,
    ) {
        for (mover, tracker) in (&movers, &mut trackers).join() {
            let tile = mover.0.tile();
            if !tracker.gate.observe(tile) || !queue.is_empty() {
                continue;
            }
            if trigger.check_encounter(&map.0, tile, roller.0.as_mut()) {
                queue.push(PendingEncounter { tile });
            }
        }
    }
}
