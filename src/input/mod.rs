pub mod bindings;
pub mod scripted;

use std::collections::HashSet;

use bracket_geometry::prelude::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Confirm,
        Key::Cancel,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Per-tick key state: what is held, and which edges happened since the last refresh.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    previous: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must run once per tick, before anything reads the state.
    pub fn refresh<I>(&mut self, held: I)
    where
        I: IntoIterator<Item = Key>,
    {
        self.previous = std::mem::take(&mut self.held);
        self.held = held.into_iter().collect();
        self.just_pressed = self.held.difference(&self.previous).copied().collect();
        self.just_released = self.previous.difference(&self.held).copied().collect();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// At most one direction, priority left > right > up > down.
    pub fn movement_direction(&self) -> Option<Direction> {
        [
            (Key::Left, Direction::Left),
            (Key::Right, Direction::Right),
            (Key::Up, Direction::Up),
            (Key::Down, Direction::Down),
        ]
        .into_iter()
        .find(|(key, _)| self.is_held(*key))
        .map(|(_, direction)| direction)
    }

    /// Direction keys that went down this tick, same priority order. Menus use this.
    pub fn direction_pressed(&self) -> Option<Direction> {
        [
            (Key::Left, Direction::Left),
            (Key::Right, Direction::Right),
            (Key::Up, Direction::Up),
            (Key::Down, Direction::Down),
        ]
        .into_iter()
        .find(|(key, _)| self.is_just_pressed(*key))
        .map(|(_, direction)| direction)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.is_just_pressed(Key::Confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.is_just_pressed(Key::Cancel)
    }
}
