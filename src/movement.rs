//! Grid movement for the player actor.
//!
//! The logical tile is the only position gameplay reads. The pixel position
//! exists for drawing and, in the interpolated model, trails the tile while a
//! step is in flight.

use std::str::FromStr;

use bracket_geometry::prelude::Point;

use crate::input::Direction;
use crate::map::MapBounds;

/// Distance in pixels under which an interpolated step snaps onto its target.
pub const SNAP_EPSILON: f32 = 0.5;
/// Hold after an interpolated step lands before the next may begin.
pub const STEP_PAUSE_SECS: f32 = 0.06;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MovementModel {
    DiscreteStep,
    #[default]
    Interpolated,
}

impl FromStr for MovementModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discrete" | "discrete-step" | "step" => Ok(MovementModel::DiscreteStep),
            "interpolated" | "smooth" => Ok(MovementModel::Interpolated),
            other => Err(format!("unknown movement model \"{other}\"")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    fn of_tile(tile: Point, tile_size: f32) -> Self {
        Self {
            x: tile.x as f32 * tile_size,
            y: tile.y as f32 * tile_size,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct StepReport {
    /// The logical tile changed during this update.
    pub tile_changed: bool,
    /// A step was requested and refused by the map bounds.
    pub blocked: bool,
}

#[derive(Clone, Debug)]
pub struct MovementController {
    model: MovementModel,
    tile: Point,
    facing: Direction,
    pixel: PixelPos,
    speed: f32,
    tile_size: f32,
    bounds: MapBounds,
    cooldown: f32,
    target: Option<PixelPos>,
    pause: f32,
    input_held: bool,
}

impl MovementController {
    /// `speed` is in tiles per second.
    pub fn new(model: MovementModel, start: Point, speed: f32, tile_size: f32, bounds: MapBounds) -> Self {
        Self {
            model,
            tile: start,
            facing: Direction::Down,
            pixel: PixelPos::of_tile(start, tile_size),
            speed: speed.max(f32::EPSILON),
            tile_size,
            bounds,
            cooldown: 0.0,
            target: None,
            pause: 0.0,
            input_held: false,
        }
    }

    pub fn tile(&self) -> Point {
        self.tile
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn pixel(&self) -> PixelPos {
        self.pixel
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Animation hint only: a step is in flight, or the post-step pause is
    /// running while a direction is still held.
    pub fn is_moving(&self) -> bool {
        match self.model {
            MovementModel::DiscreteStep => self.input_held,
            MovementModel::Interpolated => {
                self.target.is_some() || (self.pause > 0.0 && self.input_held)
            }
        }
    }

    pub fn update(&mut self, dt: f32, requested: Option<Direction>) -> StepReport {
        self.input_held = requested.is_some();
        let dt = dt.max(0.0);
        match self.model {
            MovementModel::DiscreteStep => self.update_discrete(dt, requested),
            MovementModel::Interpolated => self.update_interpolated(dt, requested),
        }
    }

    fn update_discrete(&mut self, dt: f32, requested: Option<Direction>) -> StepReport {
        let mut report = StepReport::default();
        self.cooldown += dt;
        if self.cooldown < 1.0 / self.speed {
            return report;
        }
        let Some(direction) = requested else {
            return report;
        };

        self.facing = direction;
        let next = self.tile + direction.delta();
        if self.bounds.contains(next) {
            self.tile = next;
            report.tile_changed = true;
        } else {
            report.blocked = true;
        }
        self.pixel = PixelPos::of_tile(self.tile, self.tile_size);
        self.cooldown = 0.0;
        report
    }

    fn update_interpolated(&mut self, dt: f32, requested: Option<Direction>) -> StepReport {
        let mut report = StepReport::default();

        if let Some(target) = self.target {
            self.advance_towards(target, dt);
            return report;
        }

        if self.pause > 0.0 {
            self.pause = (self.pause - dt).max(0.0);
            if self.pause > 0.0 {
                return report;
            }
        }

        let Some(direction) = requested else {
            return report;
        };
        let next = self.tile + direction.delta();
        if !self.bounds.contains(next) {
            report.blocked = true;
            return report;
        }

        self.facing = direction;
        self.tile = next;
        self.target = Some(PixelPos::of_tile(next, self.tile_size));
        report.tile_changed = true;
        report
    }

    fn advance_towards(&mut self, target: PixelPos, dt: f32) {
        let dx = target.x - self.pixel.x;
        let dy = target.y - self.pixel.y;
        let remaining = (dx * dx + dy * dy).sqrt();
        let travel = self.speed * self.tile_size * dt;

        if remaining - travel <= SNAP_EPSILON {
            self.pixel = target;
            self.target = None;
            self.pause = STEP_PAUSE_SECS;
            return;
        }
        self.pixel.x += dx / remaining * travel;
        self.pixel.y += dy / remaining * travel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: MapBounds = MapBounds {
        width: 12,
        height: 9,
    };

    fn discrete(start: Point) -> MovementController {
        MovementController::new(MovementModel::DiscreteStep, start, 4.0, 16.0, BOUNDS)
    }

    fn interpolated(start: Point) -> MovementController {
        MovementController::new(MovementModel::Interpolated, start, 4.0, 16.0, BOUNDS)
    }

    #[test]
    fn discrete_waits_for_cooldown() {
        let mut mover = discrete(Point::new(5, 4));
        let report = mover.update(0.125, Some(Direction::Right));
        assert!(!report.tile_changed);
        assert_eq!(mover.tile(), Point::new(5, 4));

        let report = mover.update(0.125, Some(Direction::Right));
        assert!(report.tile_changed);
        assert_eq!(mover.tile(), Point::new(6, 4));
        assert_eq!(mover.pixel(), PixelPos { x: 96.0, y: 64.0 });
    }

    #[test]
    fn discrete_never_moves_more_than_one_tile_per_update() {
        let mut mover = discrete(Point::new(1, 1));
        mover.update(10.0, Some(Direction::Down));
        assert_eq!(mover.tile(), Point::new(1, 2));
    }

    #[test]
    fn discrete_blocked_step_still_turns() {
        let mut mover = discrete(Point::new(0, 4));
        let report = mover.update(0.25, Some(Direction::Left));
        assert!(report.blocked);
        assert!(!report.tile_changed);
        assert_eq!(mover.tile(), Point::new(0, 4));
        assert_eq!(mover.facing(), Direction::Left);
    }

    #[test]
    fn discrete_cooldown_keeps_charging_while_idle() {
        let mut mover = discrete(Point::new(5, 4));
        mover.update(1.0, None);
        let report = mover.update(0.0, Some(Direction::Up));
        assert!(report.tile_changed);
        assert_eq!(mover.tile(), Point::new(5, 3));
    }

    #[test]
    fn interpolated_commits_tile_immediately() {
        let mut mover = interpolated(Point::new(5, 4));
        let report = mover.update(0.01, Some(Direction::Right));
        assert!(report.tile_changed);
        assert_eq!(mover.tile(), Point::new(6, 4));
        assert_eq!(mover.pixel(), PixelPos { x: 80.0, y: 64.0 });
        assert!(mover.is_moving());

        // Mid-step: the pixel trails and no further step is accepted.
        let report = mover.update(0.125, Some(Direction::Right));
        assert!(!report.tile_changed);
        assert_eq!(mover.tile(), Point::new(6, 4));
        assert!((mover.pixel().x - 88.0).abs() < 1e-3);
    }

    #[test]
    fn interpolated_snaps_then_pauses() {
        let mut mover = interpolated(Point::new(5, 4));
        mover.update(0.0, Some(Direction::Down));
        mover.update(0.25, Some(Direction::Down));
        assert_eq!(mover.pixel(), PixelPos { x: 80.0, y: 80.0 });
        assert!(mover.is_moving(), "pause with input held counts as moving");

        let report = mover.update(0.03, Some(Direction::Down));
        assert!(!report.tile_changed);
        let report = mover.update(0.05, Some(Direction::Down));
        assert!(report.tile_changed);
        assert_eq!(mover.tile(), Point::new(5, 6));
    }

    #[test]
    fn interpolated_idle_after_landing_without_input() {
        let mut mover = interpolated(Point::new(5, 4));
        mover.update(0.0, Some(Direction::Up));
        mover.update(0.25, None);
        assert!(!mover.is_moving());
    }

    #[test]
    fn interpolated_refuses_out_of_bounds_without_turning() {
        let mut mover = interpolated(Point::new(11, 0));
        let report = mover.update(0.1, Some(Direction::Right));
        assert!(report.blocked);
        assert_eq!(mover.tile(), Point::new(11, 0));
        assert_eq!(mover.facing(), Direction::Down);
        assert!(!mover.is_moving());
    }
}
