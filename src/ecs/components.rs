use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::encounter::TileChangeGate;
use crate::movement::MovementController;

#[derive(Clone, Debug)]
pub struct GridMover(pub MovementController);

impl Component for GridMover {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct TileTracker {
    pub gate: TileChangeGate,
}

impl Component for TileTracker {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}
