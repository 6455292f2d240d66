//! The per-frame driver: input, scene transitions, update and draw.

use bracket_terminal::prelude::*;
use tracing::{info, trace, warn};

use crate::error::{GameError, SceneError};
use crate::input::{InputState, Key};
use crate::scene::battle::BattleScene;
use crate::scene::exploration::ExplorationScene;
use crate::scene::{FrameContext, GameSession, Scene, SceneCommand, SceneController, SceneId};

/// Longest frame the simulation will step, in seconds.
pub const MAX_DELTA: f32 = 1.0 / 24.0;

pub fn clamp_delta(elapsed: f32) -> f32 {
    if elapsed.is_finite() {
        elapsed.clamp(0.0, MAX_DELTA)
    } else {
        0.0
    }
}

/// Frames counted over one-second windows.
#[derive(Clone, Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window: f32,
    fps: u32,
}

impl FpsCounter {
    pub fn record(&mut self, elapsed: f32) {
        self.frames += 1;
        self.window += elapsed.max(0.0);
        if self.window >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window -= 1.0;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

pub struct Game {
    scenes: SceneController,
    session: GameSession,
    input: InputState,
    fps: FpsCounter,
    running: bool,
}

impl Game {
    pub fn new(session: GameSession) -> Self {
        Self {
            scenes: SceneController::new(),
            session,
            input: InputState::new(),
            fps: FpsCounter::default(),
            running: true,
        }
    }

    /// Exploration and battle, starting in exploration.
    pub fn standard(session: GameSession) -> Result<Self, GameError> {
        let mut game = Self::new(session);
        game.register(SceneId::Exploration, Box::new(ExplorationScene::new()));
        game.register(SceneId::Battle, Box::new(BattleScene::new()));
        game.start(SceneId::Exploration)?;
        Ok(game)
    }

    /// Replacing the running scene tears it down first.
    pub fn register(&mut self, id: SceneId, scene: Box<dyn Scene>) {
        if self.scenes.register(id, scene, &mut self.session).is_some() {
            info!("scene {id} re-registered");
        }
    }

    pub fn start(&mut self, first: SceneId) -> Result<(), GameError> {
        info!("starting in {first}");
        self.scenes.switch_to(first, &mut self.session)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[cfg(test)]
    pub fn scenes(&self) -> &SceneController {
        &self.scenes
    }

    #[cfg(test)]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// One frame. `elapsed` is wall time in seconds since the previous call;
    /// `held` is every key down this frame.
    pub fn tick<I>(&mut self, elapsed: f32, held: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = Key>,
    {
        if !self.running {
            return Ok(());
        }
        let delta = clamp_delta(elapsed);
        self.input.refresh(held);
        for key in Key::ALL {
            if self.input.is_just_pressed(key) {
                trace!(?key, "pressed");
            } else if self.input.is_just_released(key) {
                trace!(?key, "released");
            }
        }
        self.scenes.poll_transition(&mut self.session)?;

        let frame = FrameContext {
            delta,
            input: &self.input,
        };
        let command = self.scenes.update(&mut self.session, &frame);
        self.apply(command)?;
        self.fps.record(elapsed);
        Ok(())
    }

    fn apply(&mut self, command: SceneCommand) -> Result<(), GameError> {
        match command {
            SceneCommand::None => {}
            SceneCommand::Quit => {
                info!("quit requested");
                self.running = false;
            }
            SceneCommand::SwitchTo(id) => match self.scenes.switch_to(id, &mut self.session) {
                Ok(()) => {}
                Err(err @ (SceneError::NotFound(_) | SceneError::TransitionInProgress { .. })) => {
                    warn!("switch to {id} dropped: {err}");
                }
                Err(err) => return Err(err.into()),
            },
        }
        Ok(())
    }

    pub fn render(&self, ctx: &mut BTerm) -> Result<(), GameError> {
        if self.scenes.is_transitioning() {
            ctx.print_color_centered(24, RGB::named(WHITE), RGB::named(BLACK), "Loading...");
        } else {
            self.scenes.render(ctx)?;
        }
        if self.session.config.debug {
            ctx.print_color(
                1,
                0,
                RGB::named(GREEN),
                RGB::named(BLACK),
                format!("FPS: {}", self.fps.fps()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::scene::testing::{CallLog, RecordingScene, session};

    fn recording_game(explore: RecordingScene, battle: RecordingScene) -> Game {
        let mut game = Game::new(session());
        game.register(SceneId::Exploration, Box::new(explore));
        game.register(SceneId::Battle, Box::new(battle));
        game.start(SceneId::Exploration).expect("start");
        game
    }

    fn log() -> CallLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn delta_is_clamped() {
        assert_eq!(clamp_delta(0.5), MAX_DELTA);
        assert_eq!(clamp_delta(0.01), 0.01);
        assert_eq!(clamp_delta(-1.0), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
    }

    #[test]
    fn fps_counts_frames_per_second() {
        let mut fps = FpsCounter::default();
        for _ in 0..30 {
            fps.record(1.0 / 30.0 + 1e-4);
        }
        assert_eq!(fps.fps(), 30);
        fps.record(0.1);
        assert_eq!(fps.fps(), 30);
    }

    #[test]
    fn quit_stops_the_loop() {
        let log = log();
        let mut explore = RecordingScene::new("explore", &log);
        explore.command = SceneCommand::Quit;
        let mut game = recording_game(explore, RecordingScene::new("battle", &log));

        game.tick(0.016, []).expect("tick");
        assert!(!game.is_running());
        log.borrow_mut().clear();
        game.tick(0.016, []).expect("tick");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn switch_commands_change_scene() {
        let log = log();
        let mut explore = RecordingScene::new("explore", &log);
        explore.command = SceneCommand::SwitchTo(SceneId::Battle);
        let mut game = recording_game(explore, RecordingScene::new("battle", &log));

        game.tick(0.016, []).expect("tick");
        assert_eq!(game.scenes().current_id(), Some(SceneId::Battle));
    }

    #[test]
    fn pending_init_keeps_the_game_waiting() {
        let log = log();
        let mut explore = RecordingScene::new("explore", &log);
        explore.command = SceneCommand::SwitchTo(SceneId::Battle);
        let mut battle = RecordingScene::new("battle", &log).slow(3);
        battle.command = SceneCommand::SwitchTo(SceneId::Exploration);
        let mut game = recording_game(explore, battle);

        game.tick(0.016, []).expect("tick");
        assert_eq!(game.scenes().pending_id(), Some(SceneId::Battle));
        assert!(game.scenes().is_transitioning());
        game.tick(0.016, []).expect("tick");
        assert!(game.is_running());
        assert_eq!(game.scenes().pending_id(), Some(SceneId::Battle));
    }

    #[test]
    fn failed_init_is_returned_from_tick() {
        let log = log();
        let mut explore = RecordingScene::new("explore", &log);
        explore.command = SceneCommand::SwitchTo(SceneId::Battle);
        let mut game = recording_game(explore, RecordingScene::new("battle", &log).failing());

        let err = game.tick(0.016, []).unwrap_err();
        assert!(matches!(err, GameError::Scene(SceneError::ResourceLoad(_))));
    }

    #[test]
    fn standard_game_loads_the_meadow() {
        let mut game = Game::standard(session()).expect("start");
        for _ in 0..500 {
            if game.scenes().current_id().is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
            game.tick(0.016, []).expect("tick");
        }
        assert_eq!(game.scenes().current_id(), Some(SceneId::Exploration));
        assert_eq!(game.session().party.len(), 1);
    }
}
