//! Tile maps for the exploration scene.
//!
//! A map file is a grid of whitespace-separated tile names, one row per line.
//! Names starting with `grass` are tall grass, names starting with `path` are
//! walkable path. `#` starts a comment line and `spawn <x> <y>` sets the
//! player start tile.

use std::io;
use std::path::{Path, PathBuf};

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{BLACK, RGB};
use tracing::warn;

use crate::error::ResourceLoadError;

pub const MAP_EXTENSION: &str = "map";
pub const BUILTIN_MAP: &str = "meadow";

const MEADOW: &str = include_str!("../../assets/maps/meadow.map");

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terrain {
    Path,
    Grass,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub name: String,
    pub terrain: Terrain,
    pub glyph: u16,
    pub fg: RGB,
    pub bg: RGB,
}

impl Tile {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.starts_with("grass") {
            Some(Self::grass(name))
        } else if name.starts_with("path") {
            Some(Self::path(name))
        } else {
            None
        }
    }

    pub fn grass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            terrain: Terrain::Grass,
            glyph: b'"' as u16,
            fg: RGB::from_u8(90, 200, 90),
            bg: RGB::from_u8(10, 40, 10),
        }
    }

    pub fn path(name: &str) -> Self {
        // Numbered path variants are pebbles.
        let glyph = if name.ends_with(|c: char| c.is_ascii_digit()) {
            b',' as u16
        } else {
            b'.' as u16
        };
        Self {
            name: name.to_string(),
            terrain: Terrain::Path,
            glyph,
            fg: RGB::from_u8(200, 170, 120),
            bg: RGB::named(BLACK),
        }
    }

    pub fn is_encounter_eligible(&self) -> bool {
        self.terrain == Terrain::Grass
    }
}

#[derive(Clone, Debug)]
pub struct TileMap {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub spawn: Point,
    pub tiles: Vec<Tile>,
}

impl TileMap {
    /// The meadow bundled into the binary, used when no asset directory is present.
    pub fn builtin() -> Result<Self, ResourceLoadError> {
        Self::parse(BUILTIN_MAP, Path::new("meadow.map"), MEADOW)
    }

    /// Like [`load`](Self::load), but a missing `meadow.map` falls back to the bundled copy.
    pub fn load_or_builtin(dir: &Path, name: &str) -> Result<Self, ResourceLoadError> {
        match Self::load(dir, name) {
            Err(ResourceLoadError::Io { path, source })
                if name == BUILTIN_MAP && source.kind() == io::ErrorKind::NotFound =>
            {
                warn!("{} not found, using the bundled meadow", path.display());
                Self::builtin()
            }
            other => other,
        }
    }

    pub fn load(dir: &Path, name: &str) -> Result<Self, ResourceLoadError> {
        let path = dir.join(format!("{name}.{MAP_EXTENSION}"));
        let text = std::fs::read_to_string(&path).map_err(|source| ResourceLoadError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(name, &path, &text)
    }

    pub fn parse(name: &str, path: &Path, text: &str) -> Result<Self, ResourceLoadError> {
        let invalid = |reason: String| ResourceLoadError::InvalidMap {
            path: PathBuf::from(path),
            reason,
        };

        let mut rows: Vec<Vec<Tile>> = Vec::new();
        let mut spawn = None;
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("spawn") {
                let coords: Vec<i32> = rest
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| invalid(format!("line {}: bad spawn coordinates", line_no + 1)))?;
                match coords.as_slice() {
                    [x, y] => spawn = Some(Point::new(*x, *y)),
                    _ => {
                        return Err(invalid(format!(
                            "line {}: spawn takes two coordinates",
                            line_no + 1
                        )));
                    }
                }
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    Tile::from_name(token).ok_or_else(|| {
                        invalid(format!("line {}: unknown tile \"{token}\"", line_no + 1))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(invalid("map has no tiles".to_string()));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(invalid(format!(
                "row {} has {} tiles, expected {width}",
                bad + 1,
                rows[bad].len()
            )));
        }

        let map = Self {
            name: name.to_string(),
            width: width as i32,
            height: rows.len() as i32,
            spawn: spawn.unwrap_or_else(|| Point::new(0, 0)),
            tiles: rows.into_iter().flatten().collect(),
        };
        if !map.in_bounds(map.spawn) {
            return Err(invalid(format!(
                "spawn {},{} is outside the {}x{} map",
                map.spawn.x, map.spawn.y, map.width, map.height
            )));
        }
        Ok(map)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point.x, point.y).map(|idx| &self.tiles[idx])
    }

    pub fn is_encounter_eligible(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(Tile::is_encounter_eligible)
    }

    pub fn bounds(&self) -> MapBounds {
        MapBounds {
            width: self.width,
            height: self.height,
        }
    }
}

/// Tile extents, copied into whatever needs bounds checks without the tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
}

impl MapBounds {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_meadow_layout() {
        let map = TileMap::builtin().expect("meadow");
        assert_eq!((map.width, map.height), (12, 9));
        assert_eq!(map.spawn, Point::new(5, 4));
        assert!(map.is_encounter_eligible(Point::new(5, 4)));
        assert!(map.is_encounter_eligible(Point::new(3, 3)));
        assert!(!map.is_encounter_eligible(Point::new(0, 0)));
        assert!(!map.is_encounter_eligible(Point::new(2, 3)));
        assert!(!map.is_encounter_eligible(Point::new(-1, 4)));
        assert!(map.tile_at(Point::new(12, 0)).is_none());
        let grass = map.tiles.iter().filter(|t| t.is_encounter_eligible()).count();
        assert_eq!(grass, 18);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TileMap::parse("bad", Path::new("bad.map"), "path path\npath\n").unwrap_err();
        assert!(matches!(err, ResourceLoadError::InvalidMap { .. }));
    }

    #[test]
    fn unknown_tiles_are_rejected() {
        let err = TileMap::parse("bad", Path::new("bad.map"), "path lava\n").unwrap_err();
        assert!(err.to_string().contains("lava"));
    }

    #[test]
    fn spawn_must_be_on_the_map() {
        let err = TileMap::parse("bad", Path::new("bad.map"), "spawn 4 0\npath grass\n").unwrap_err();
        assert!(matches!(err, ResourceLoadError::InvalidMap { .. }));
    }

    #[test]
    fn load_reads_from_asset_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("tiny.map"), "spawn 1 0\npath grass\n").expect("write");
        let map = TileMap::load(dir.path(), "tiny").expect("load");
        assert_eq!(map.width, 2);
        assert!(map.is_encounter_eligible(Point::new(1, 0)));

        let missing = TileMap::load(dir.path(), "nowhere").unwrap_err();
        assert!(matches!(missing, ResourceLoadError::Io { .. }));
    }
}
