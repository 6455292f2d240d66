//! The exploration world: the player entity, the tile map and the
//! movement → encounter dispatch order.

pub mod components;
pub mod resources;
pub mod systems;

use std::sync::Arc;

use bracket_terminal::prelude::{RGB, WHITE};
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::encounter::EncounterTrigger;
use crate::input::Direction;
use crate::map::TileMap;
use crate::movement::MovementController;
use crate::rng::RandomSource;

use self::{
    components::{GridMover, PlayerTag, Renderable, TileTracker},
    resources::{ActiveMap, EncounterQueue, EncounterRoller, FrameInput, PendingEncounter},
    systems::{EncounterSystem, MovementSystem},
};

pub struct ExplorationWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
    map: Arc<TileMap>,
}

impl ExplorationWorld {
    pub fn new(
        map: Arc<TileMap>,
        mover: MovementController,
        trigger: EncounterTrigger,
        roller: Box<dyn RandomSource>,
    ) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(FrameInput::default());
        specs_world.insert(ActiveMap(Arc::clone(&map)));
        specs_world.insert(trigger);
        specs_world.insert(EncounterRoller(roller));
        specs_world.insert(EncounterQueue::default());
        let player = Self::spawn_player(&mut specs_world, mover);
        let dispatcher = DispatcherBuilder::new()
            .with(MovementSystem, "movement", &[])
            .with(EncounterSystem, "encounter", &["movement"])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
            map,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<GridMover>();
        world.register::<TileTracker>();
        world.register::<Renderable>();
        world.register::<PlayerTag>();
    }

    fn spawn_player(world: &mut SpecsWorld, mover: MovementController) -> Entity {
        world
            .create_entity()
            .with(GridMover(mover))
            .with(TileTracker::default())
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::named(WHITE),
                order: 2,
            })
            .with(PlayerTag)
            .build()
    }

    /// One exploration step: move, then roll for an encounter if the tile changed.
    pub fn advance(&mut self, delta: f32, direction: Option<Direction>) -> Option<PendingEncounter> {
        {
            let mut frame = self.specs_world.write_resource::<FrameInput>();
            frame.delta = delta;
            frame.direction = direction;
        }
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        self.specs_world.write_resource::<EncounterQueue>().take()
    }

    pub fn map(&self) -> &Arc<TileMap> {
        &self.map
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    /// Snapshot of the player's controller.
    pub fn player_mover(&self) -> Option<MovementController> {
        self.specs_world
            .read_storage::<GridMover>()
            .get(self.player)
            .map(|mover| mover.0.clone())
    }

    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Entity, &MovementController, &Renderable),
    {
        let entities = self.specs_world.entities();
        let movers = self.specs_world.read_storage::<GridMover>();
        let renderables = self.specs_world.read_storage::<Renderable>();
        let mut drawn: Vec<_> = (&entities, &movers, &renderables).join().collect();
        drawn.sort_by_key(|(_, _, renderable)| renderable.order);
        for (entity, mover, renderable) in drawn {
            f(entity, &mover.0, renderable);
        }
    }
}

#[cfg(test)]
mod tests {
    use bracket_geometry::prelude::Point;

    use super::*;
    use crate::movement::MovementModel;
    use crate::rng::testing::ScriptedRolls;

    const STEP: f32 = 0.25;

    fn world_with(rolls: ScriptedRolls) -> ExplorationWorld {
        let map = Arc::new(TileMap::builtin().expect("meadow"));
        let mover = MovementController::new(
            MovementModel::DiscreteStep,
            map.spawn,
            4.0,
            16.0,
            map.bounds(),
        );
        ExplorationWorld::new(map, mover, EncounterTrigger::default(), Box::new(rolls))
    }

    #[test]
    fn first_frame_on_grass_rolls_once() {
        let rolls = ScriptedRolls::constant(0.9);
        let draws = rolls.counter();
        let mut world = world_with(rolls);

        for _ in 0..30 {
            assert!(world.advance(1.0 / 24.0, None).is_none());
        }
        assert_eq!(draws.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn each_new_grass_tile_rolls_once() {
        let rolls = ScriptedRolls::constant(0.9);
        let draws = rolls.counter();
        let mut world = world_with(rolls);

        world.advance(STEP, None);
        world.advance(STEP, Some(Direction::Right));
        world.advance(STEP, Some(Direction::Right));
        assert_eq!(
            world.player_mover().map(|m| m.tile()),
            Some(Point::new(7, 4))
        );
        assert_eq!(draws.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[test]
    fn low_roll_queues_an_encounter() {
        let mut world = world_with(ScriptedRolls::new(&[0.9, 0.01]));
        assert!(world.advance(STEP, None).is_none());
        let encounter = world.advance(STEP, Some(Direction::Up));
        assert_eq!(
            encounter,
            Some(PendingEncounter {
                tile: Point::new(5, 3)
            })
        );
        assert!(world.advance(STEP, None).is_none());
    }

    #[test]
    fn walking_onto_path_does_not_roll() {
        let rolls = ScriptedRolls::constant(0.0);
        let draws = rolls.counter();
        let map = Arc::new(TileMap::builtin().expect("meadow"));
        let mover = MovementController::new(
            MovementModel::DiscreteStep,
            Point::new(1, 1),
            4.0,
            16.0,
            map.bounds(),
        );
        let mut world =
            ExplorationWorld::new(map, mover, EncounterTrigger::default(), Box::new(rolls));

        world.advance(STEP, Some(Direction::Right));
        world.advance(STEP, Some(Direction::Down));
        assert_eq!(draws.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
