//! Player walk-cycle frames.
//!
//! Animations are named `<state>_<facing>` with state `idle` or `run` and
//! facing `up`, `down` or `side`. Left-facing reuses `side` mirrored.

use std::collections::HashMap;

use crate::error::RenderError;
use crate::input::Direction;

/// Seconds each frame stays on screen.
pub const FRAME_SECS: f32 = 1.0 / 6.0;

#[derive(Clone, Debug, Default)]
pub struct AnimationSheet {
    animations: HashMap<String, Vec<u16>>,
}

impl AnimationSheet {
    pub fn player() -> Self {
        let mut sheet = Self::default();
        sheet.insert("idle_down", &[b'v']);
        sheet.insert("run_down", &[b'v', b'V']);
        sheet.insert("idle_up", &[b'^']);
        sheet.insert("run_up", &[b'^', b'A']);
        sheet.insert("idle_side", &[b'>']);
        sheet.insert("run_side", &[b'>', b'}']);
        sheet
    }

    pub fn insert(&mut self, name: &str, frames: &[u8]) {
        self.animations
            .insert(name.to_string(), frames.iter().map(|b| u16::from(*b)).collect());
    }

    pub fn frames(&self, name: &str) -> Result<&[u16], RenderError> {
        self.animations
            .get(name)
            .filter(|frames| !frames.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| RenderError::MissingFrame(name.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct PlayerAnimator {
    current: String,
    frame: usize,
    elapsed: f32,
    mirrored: bool,
}

impl Default for PlayerAnimator {
    fn default() -> Self {
        Self {
            current: animation_name(false, Direction::Down),
            frame: 0,
            elapsed: 0.0,
            mirrored: false,
        }
    }
}

impl PlayerAnimator {
    pub fn update(&mut self, dt: f32, is_moving: bool, facing: Direction) {
        let next = animation_name(is_moving, facing);
        if next != self.current {
            self.current = next;
            self.frame = 0;
            self.elapsed = 0.0;
        } else {
            self.elapsed += dt.max(0.0);
            while self.elapsed >= FRAME_SECS {
                self.elapsed -= FRAME_SECS;
                self.frame = self.frame.wrapping_add(1);
            }
        }
        self.mirrored = facing == Direction::Left;
    }

    pub fn animation(&self) -> &str {
        &self.current
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn glyph(&self, sheet: &AnimationSheet) -> Result<u16, RenderError> {
        let frames = sheet.frames(self.animation())?;
        let glyph = frames[self.frame % frames.len()];
        Ok(if self.is_mirrored() { mirror(glyph) } else { glyph })
    }
}

fn animation_name(is_moving: bool, facing: Direction) -> String {
    let state = if is_moving { "run" } else { "idle" };
    let facing = match facing {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left | Direction::Right => "side",
    };
    format!("{state}_{facing}")
}

fn mirror(glyph: u16) -> u16 {
    let pairs = [(b'>', b'<'), (b'}', b'{'), (b')', b'('), (b']', b'[')];
    for (a, b) in pairs {
        if glyph == u16::from(a) {
            return u16::from(b);
        }
        if glyph == u16::from(b) {
            return u16::from(a);
        }
    }
    glyph
}
