use std::sync::Arc;
use std::task::Poll;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use tracing::{info, warn};

use crate::assets::PendingLoad;
use crate::ecs::ExplorationWorld;
use crate::encounter::EncounterTrigger;
use crate::error::{RenderError, SceneError};
use crate::map::TileMap;
use crate::movement::MovementController;
use crate::render::animation::{AnimationSheet, PlayerAnimator};
use crate::render::{draw_actor, draw_map};
use crate::rng::RandomSource;

use super::{FrameContext, GameSession, Scene, SceneCommand, SceneId};

const MAP_ORIGIN: Point = Point { x: 4, y: 6 };

/// Walking around the tile map. The map is loaded on the first `init` and
/// kept for later visits, as is the player's position.
pub struct ExplorationScene {
    world: Option<ExplorationWorld>,
    loading: Option<PendingLoad<TileMap>>,
    roller: Option<Box<dyn RandomSource>>,
    animator: PlayerAnimator,
    sheet: AnimationSheet,
    status: String,
    active: bool,
}

impl Default for ExplorationScene {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorationScene {
    pub fn new() -> Self {
        Self {
            world: None,
            loading: None,
            roller: None,
            animator: PlayerAnimator::default(),
            sheet: AnimationSheet::player(),
            status: String::new(),
            active: false,
        }
    }

    /// Uses `roller` for encounter rolls instead of a generator seeded from the session.
    #[cfg(test)]
    pub fn with_roller(mut self, roller: Box<dyn RandomSource>) -> Self {
        self.roller = Some(roller);
        self
    }

    #[cfg(test)]
    pub fn world(&self) -> Option<&ExplorationWorld> {
        self.world.as_ref()
    }

    fn build_world(&mut self, map: TileMap, session: &mut GameSession) {
        let config = &session.config;
        let map = Arc::new(map);
        let mover = MovementController::new(
            config.movement_model,
            map.spawn,
            config.move_speed,
            config.tile_size as f32,
            map.bounds(),
        );
        let trigger = EncounterTrigger::new(config.encounter_rate);
        let roller = self.roller.take().unwrap_or_else(|| {
            let seed = (session.rng.next_unit() * u64::MAX as f64) as u64;
            Box::new(RandomNumberGenerator::seeded(seed))
        });
        info!(
            map = %map.name,
            width = map.width,
            height = map.height,
            encounter_rate = trigger.probability(),
            "exploration world ready"
        );
        self.world = Some(ExplorationWorld::new(map, mover, trigger, roller));
    }

    fn refresh_status(&mut self, session: &GameSession) {
        self.status = match session.party.members().first() {
            Some(lead) => {
                let max = lead.stats().max_health;
                format!(
                    "{} Lv.{}  HP {}/{}  Party {}",
                    lead.name(),
                    lead.level(),
                    lead.health(),
                    max,
                    session.party.len()
                )
            }
            None => "No creatures in the party".to_string(),
        };
    }
}

impl Scene for ExplorationScene {
    fn init(&mut self, session: &mut GameSession) -> Poll<Result<(), SceneError>> {
        if self.world.is_none() {
            let loading = self.loading.get_or_insert_with(|| {
                let dir = session.config.assets_dir.join("maps");
                let name = session.config.map_name.clone();
                PendingLoad::spawn(format!("map {name}"), move || {
                    TileMap::load_or_builtin(&dir, &name)
                })
            });
            match loading.poll() {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(map)) => {
                    self.loading = None;
                    self.build_world(map, session);
                }
                Poll::Ready(Err(err)) => {
                    warn!("{} failed: {err}", loading.label());
                    self.loading = None;
                    return Poll::Ready(Err(err.into()));
                }
            }
        }
        self.refresh_status(session);
        Poll::Ready(Ok(()))
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn cleanup(&mut self, _session: &mut GameSession) {
        self.animator = PlayerAnimator::default();
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self, session: &mut GameSession, frame: &FrameContext) -> SceneCommand {
        if frame.input.cancel_pressed() {
            return SceneCommand::Quit;
        }
        let Some(world) = self.world.as_mut() else {
            return SceneCommand::None;
        };

        let encounter = world.advance(frame.delta, frame.input.movement_direction());
        if let Some(mover) = world.player_mover() {
            self.animator
                .update(frame.delta, mover.is_moving(), mover.facing());
        }
        self.refresh_status(session);

        match encounter {
            Some(encounter) => {
                info!(
                    x = encounter.tile.x,
                    y = encounter.tile.y,
                    "wild encounter"
                );
                SceneCommand::SwitchTo(SceneId::Battle)
            }
            None => SceneCommand::None,
        }
    }

    fn render(&self, ctx: &mut BTerm) -> Result<(), RenderError> {
        let Some(world) = self.world.as_ref() else {
            return Ok(());
        };
        ctx.print_color(
            MAP_ORIGIN.x,
            2,
            RGB::named(YELLOW),
            RGB::named(BLACK),
            format!("Tallgrass - {}", world.map().name),
        );
        ctx.print_color(MAP_ORIGIN.x, 3, RGB::named(LIGHT_CYAN), RGB::named(BLACK), &self.status);
        draw_map(ctx, world.map(), MAP_ORIGIN, 8);

        let player_glyph = self.animator.glyph(&self.sheet)?;
        let player = world.player_entity();
        world.each_renderable(|entity, mover, renderable| {
            let glyph = if entity == player {
                player_glyph
            } else {
                renderable.glyph
            };
            draw_actor(ctx, MAP_ORIGIN, mover, glyph, renderable.color);
        });

        let help_y = MAP_ORIGIN.y + world.map().height + 2;
        ctx.print_color(
            MAP_ORIGIN.x,
            help_y,
            RGB::named(GRAY),
            RGB::named(BLACK),
            "Arrows/WASD move - tall grass hides wild creatures - Esc quits",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::{InputState, Key};
    use crate::movement::MovementModel;
    use crate::rng::testing::ScriptedRolls;
    use crate::scene::testing::session;

    fn ready(scene: &mut ExplorationScene, session: &mut GameSession) {
        for _ in 0..500 {
            match scene.init(session) {
                Poll::Ready(result) => return result.expect("init"),
                Poll::Pending => std::thread::sleep(Duration::from_millis(2)),
            }
        }
        panic!("exploration init never finished");
    }

    fn discrete_session() -> GameSession {
        let mut session = session();
        session.config.movement_model = MovementModel::DiscreteStep;
        session
    }

    #[test]
    fn missing_asset_dir_falls_back_to_builtin_meadow() {
        let mut session = discrete_session();
        let dir = tempfile::tempdir().expect("tempdir");
        session.config.assets_dir = dir.path().to_path_buf();

        let mut scene = ExplorationScene::new().with_roller(Box::new(ScriptedRolls::constant(0.9)));
        ready(&mut scene, &mut session);
        let world = scene.world().expect("world");
        assert_eq!(world.map().width, 12);
    }

    #[test]
    fn unknown_map_name_is_a_load_error() {
        let mut session = discrete_session();
        let dir = tempfile::tempdir().expect("tempdir");
        session.config.assets_dir = dir.path().to_path_buf();
        session.config.map_name = "volcano".to_string();

        let mut scene = ExplorationScene::new();
        let mut outcome = None;
        for _ in 0..500 {
            if let Poll::Ready(result) = scene.init(&mut session) {
                outcome = Some(result);
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        let err = outcome.expect("finished").unwrap_err();
        assert!(matches!(err, SceneError::ResourceLoad(_)));
    }

    #[test]
    fn encounter_requests_battle_and_cancel_quits() {
        let mut session = discrete_session();
        let mut scene = ExplorationScene::new().with_roller(Box::new(ScriptedRolls::new(&[0.9, 0.0])));
        ready(&mut scene, &mut session);

        let mut input = InputState::new();
        input.refresh([]);
        let idle = FrameContext {
            delta: 0.25,
            input: &input,
        };
        assert_eq!(scene.update(&mut session, &idle), SceneCommand::None);

        let mut input = InputState::new();
        input.refresh([Key::Up]);
        let step = FrameContext {
            delta: 0.25,
            input: &input,
        };
        assert_eq!(
            scene.update(&mut session, &step),
            SceneCommand::SwitchTo(SceneId::Battle)
        );

        let mut input = InputState::new();
        input.refresh([Key::Cancel]);
        let cancel = FrameContext {
            delta: 0.1,
            input: &input,
        };
        assert_eq!(scene.update(&mut session, &cancel), SceneCommand::Quit);
    }

    #[test]
    fn reentry_keeps_the_loaded_world() {
        let mut session = discrete_session();
        let mut scene = ExplorationScene::new().with_roller(Box::new(ScriptedRolls::constant(0.9)));
        ready(&mut scene, &mut session);
        let mut input = InputState::new();
        input.refresh([Key::Right]);
        let step = FrameContext {
            delta: 0.25,
            input: &input,
        };
        scene.update(&mut session, &step);
        scene.cleanup(&mut session);

        assert!(matches!(scene.init(&mut session), Poll::Ready(Ok(()))));
        let tile = scene.world().and_then(|w| w.player_mover()).map(|m| m.tile());
        assert_eq!(tile, Some(Point::new(6, 4)));
    }
}
