//! Scene lifecycle and the controller that owns the active scene.
//!
//! A switch tears the old scene down (`deactivate`, then `cleanup`) before the
//! new one's `init` is first polled. `init` may stay pending across ticks; the
//! new scene becomes current and is activated only once it reports ready.
//! While an init is pending, further switch requests are rejected.

pub mod battle;
pub mod exploration;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::task::Poll;

use bracket_terminal::prelude::BTerm;
use tracing::info;

use crate::config::GameConfig;
use crate::creature::Party;
use crate::data::DataTables;
use crate::error::{RenderError, SceneError};
use crate::input::InputState;
use crate::rng::RandomSource;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SceneId {
    Exploration,
    Battle,
}

impl SceneId {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::Exploration => "exploration",
            SceneId::Battle => "battle",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneId),
    Quit,
}

pub struct FrameContext<'a> {
    /// Seconds since the previous tick, already clamped.
    pub delta: f32,
    pub input: &'a InputState,
}

/// State shared by every scene.
pub struct GameSession {
    pub config: GameConfig,
    pub data: Arc<DataTables>,
    pub party: Party,
    pub rng: Box<dyn RandomSource>,
}

impl GameSession {
    pub fn new(config: GameConfig, data: Arc<DataTables>, rng: Box<dyn RandomSource>) -> Self {
        let party = Party::starter(&data);
        Self {
            config,
            data,
            party,
            rng,
        }
    }
}

pub trait Scene {
    /// Polled until it returns `Ready`. Called again on every re-entry.
    fn init(&mut self, session: &mut GameSession) -> Poll<Result<(), SceneError>>;
    fn activate(&mut self);
    fn deactivate(&mut self);
    fn cleanup(&mut self, session: &mut GameSession);
    fn is_active(&self) -> bool;
    fn update(&mut self, session: &mut GameSession, frame: &FrameContext) -> SceneCommand;
    fn render(&self, ctx: &mut BTerm) -> Result<(), RenderError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ControllerState {
    Idle,
    Active(SceneId),
    Transitioning(SceneId),
}

pub struct SceneController {
    scenes: HashMap<SceneId, Box<dyn Scene>>,
    state: ControllerState,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            state: ControllerState::Idle,
        }
    }

    /// Stores `scene` under `id`, returning whatever was there. A displaced
    /// active scene is torn down (`deactivate`, then `cleanup`) and the
    /// replacement is initialized on the next
    /// [`poll_transition`](Self::poll_transition).
    pub fn register(
        &mut self,
        id: SceneId,
        scene: Box<dyn Scene>,
        session: &mut GameSession,
    ) -> Option<Box<dyn Scene>> {
        let mut displaced = self.scenes.insert(id, scene);
        if self.state == ControllerState::Active(id) {
            if let Some(old) = displaced.as_mut() {
                old.deactivate();
                old.cleanup(session);
            }
            info!("replaced active scene {id}");
            self.state = ControllerState::Transitioning(id);
        }
        displaced
    }

    /// The active scene, or `None` before the first switch and while an init is pending.
    pub fn current_id(&self) -> Option<SceneId> {
        match self.state {
            ControllerState::Active(id) => Some(id),
            _ => None,
        }
    }

    pub fn pending_id(&self) -> Option<SceneId> {
        match self.state {
            ControllerState::Transitioning(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending_id().is_some()
    }

    pub fn switch_to(&mut self, id: SceneId, session: &mut GameSession) -> Result<(), SceneError> {
        if let ControllerState::Transitioning(pending) = self.state {
            return Err(SceneError::TransitionInProgress {
                pending,
                requested: id,
            });
        }
        if !self.scenes.contains_key(&id) {
            return Err(SceneError::NotFound(id));
        }

        if let ControllerState::Active(current) = self.state {
            if let Some(scene) = self.scenes.get_mut(&current) {
                scene.deactivate();
                scene.cleanup(session);
            }
            info!("left scene {current}");
        }
        self.state = ControllerState::Transitioning(id);
        self.poll_transition(session).map(|_| ())
    }

    /// Advances a pending init. Returns `true` on the tick the new scene becomes current.
    ///
    /// A failed init leaves no scene active; the error is handed to the caller.
    pub fn poll_transition(&mut self, session: &mut GameSession) -> Result<bool, SceneError> {
        let ControllerState::Transitioning(id) = self.state else {
            return Ok(false);
        };
        let Some(scene) = self.scenes.get_mut(&id) else {
            self.state = ControllerState::Idle;
            return Err(SceneError::NotFound(id));
        };
        match scene.init(session) {
            Poll::Pending => Ok(false),
            Poll::Ready(Ok(())) => {
                scene.activate();
                self.state = ControllerState::Active(id);
                info!("entered scene {id}");
                Ok(true)
            }
            Poll::Ready(Err(err)) => {
                self.state = ControllerState::Idle;
                Err(err)
            }
        }
    }

    /// Runs only the active scene.
    pub fn update(&mut self, session: &mut GameSession, frame: &FrameContext) -> SceneCommand {
        let Some(id) = self.current_id() else {
            return SceneCommand::None;
        };
        match self.scenes.get_mut(&id).filter(|scene| scene.is_active()) {
            Some(scene) => scene.update(session, frame),
            None => SceneCommand::None,
        }
    }

    pub fn render(&self, ctx: &mut BTerm) -> Result<(), RenderError> {
        let current = self
            .current_id()
            .and_then(|id| self.scenes.get(&id))
            .filter(|scene| scene.is_active());
        match current {
            Some(scene) => scene.render(ctx),
            None => Ok(()),
        }
    }
}
