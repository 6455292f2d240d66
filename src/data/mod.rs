//! Read-only reference tables: species, moves and type effectiveness.
//!
//! Tables are built once at startup and shared through `Arc`; nothing hands
//! out a mutable reference after construction.

pub mod moves;
pub mod species;
pub mod types;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ResourceLoadError;

pub use self::types::TypeChart;

/// The seven stat fields shared by base stats, growth multipliers and derived stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock<T> {
    pub max_health: T,
    pub attack: T,
    pub defense: T,
    pub special_attack: T,
    pub special_defense: T,
    pub stamina: T,
    pub speed: T,
}

impl<T: Copy> StatBlock<T> {
    pub fn zip<U: Copy, V>(&self, other: &StatBlock<U>, mut f: impl FnMut(T, U) -> V) -> StatBlock<V> {
        StatBlock {
            max_health: f(self.max_health, other.max_health),
            attack: f(self.attack, other.attack),
            defense: f(self.defense, other.defense),
            special_attack: f(self.special_attack, other.special_attack),
            special_defense: f(self.special_defense, other.special_defense),
            stamina: f(self.stamina, other.stamina),
            speed: f(self.speed, other.speed),
        }
    }

    pub fn fields(&self) -> [T; 7] {
        [
            self.max_health,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.stamina,
            self.speed,
        ]
    }
}

pub type Stats = StatBlock<u32>;
pub type Growth = StatBlock<f32>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureType {
    Critter,
    Avian,
    Aquatic,
    Reptile,
    Plant,
    Ghost,
    Dragon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Normal,
    Fire,
    Water,
    Grass,
    Ice,
    Electric,
    Poison,
    Shadow,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CreatureType,
    pub base_stats: Stats,
    pub growth: Growth,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: String,
    pub name: String,
    pub power: u32,
    pub accuracy: u8,
    pub cost: u32,
    #[serde(rename = "type")]
    pub kind: MoveType,
    pub category: MoveCategory,
    pub description: String,
}

pub const SPECIES_FILE: &str = "species.json";
pub const MOVES_FILE: &str = "moves.json";
pub const DEFAULT_MOVE: &str = "tackle";

#[derive(Clone, Debug)]
pub struct DataTables {
    species: BTreeMap<String, Arc<Species>>,
    moves: BTreeMap<String, Arc<Move>>,
    type_chart: TypeChart,
}

impl DataTables {
    pub fn builtin() -> Self {
        Self::from_parts(species::builtin(), moves::builtin(), TypeChart::builtin())
    }

    pub fn from_parts(species: Vec<Species>, moves: Vec<Move>, type_chart: TypeChart) -> Self {
        Self {
            species: species
                .into_iter()
                .map(|entry| (entry.id.clone(), Arc::new(entry)))
                .collect(),
            moves: moves
                .into_iter()
                .map(|entry| (entry.id.clone(), Arc::new(entry)))
                .collect(),
            type_chart,
        }
    }

    /// Reads `species.json` and `moves.json` from `dir`; the type chart stays builtin.
    pub fn load_dir(dir: &Path) -> Result<Self, ResourceLoadError> {
        let species: Vec<Species> = read_json(&dir.join(SPECIES_FILE))?;
        let moves: Vec<Move> = read_json(&dir.join(MOVES_FILE))?;
        validate(&species, &moves)?;
        info!(
            species = species.len(),
            moves = moves.len(),
            "loaded data tables from {}",
            dir.display()
        );
        Ok(Self::from_parts(species, moves, TypeChart::builtin()))
    }

    pub fn species(&self, id: &str) -> Option<&Arc<Species>> {
        self.species.get(id)
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn species_at(&self, idx: usize) -> Option<&Arc<Species>> {
        self.species.values().nth(idx)
    }

    pub fn move_by_id(&self, id: &str) -> Option<&Arc<Move>> {
        self.moves.get(id)
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ResourceLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ResourceLoadError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ResourceLoadError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

fn validate(species: &[Species], moves: &[Move]) -> Result<(), ResourceLoadError> {
    if species.is_empty() {
        return Err(ResourceLoadError::InvalidData {
            reason: "species table is empty".to_string(),
        });
    }
    for entry in species {
        if entry.growth.fields().iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ResourceLoadError::InvalidData {
                reason: format!("species {} has a negative growth multiplier", entry.id),
            });
        }
    }
    for entry in moves {
        if entry.accuracy > 100 {
            return Err(ResourceLoadError::InvalidData {
                reason: format!("move {} has accuracy {} > 100", entry.id, entry.accuracy),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_starter_roster() {
        let tables = DataTables::builtin();
        assert_eq!(tables.species_count(), 4);
        for id in ["flamepup", "grassling", "aquafin", "sparkwing"] {
            assert!(tables.species(id).is_some(), "missing {id}");
        }
        assert!(tables.move_by_id(DEFAULT_MOVE).is_some());
        assert_eq!(tables.move_by_id("ember").map(|m| m.kind), Some(MoveType::Fire));
    }

    #[test]
    fn builtin_growth_is_non_negative() {
        let tables = DataTables::builtin();
        for species in (0..tables.species_count()).filter_map(|idx| tables.species_at(idx)) {
            assert!(species.growth.fields().iter().all(|m| *m >= 0.0));
        }
    }

    #[test]
    fn load_dir_round_trips_builtin_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let species = serde_json::to_string(&species::builtin()).expect("species json");
        let moves = serde_json::to_string(&moves::builtin()).expect("moves json");
        fs::write(dir.path().join(SPECIES_FILE), species).expect("write species");
        fs::write(dir.path().join(MOVES_FILE), moves).expect("write moves");

        let tables = DataTables::load_dir(dir.path()).expect("load");
        assert_eq!(tables.species_count(), 4);
        let flamepup = tables.species("flamepup").expect("flamepup");
        assert_eq!(flamepup.base_stats.max_health, 50);
        assert_eq!(flamepup.kind, CreatureType::Critter);
    }

    #[test]
    fn load_dir_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DataTables::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ResourceLoadError::Io { .. }));
    }

    #[test]
    fn load_dir_rejects_negative_growth() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut roster = species::builtin();
        roster[0].growth.attack = -1.0;
        fs::write(
            dir.path().join(SPECIES_FILE),
            serde_json::to_string(&roster).expect("json"),
        )
        .expect("write species");
        fs::write(
            dir.path().join(MOVES_FILE),
            serde_json::to_string(&moves::builtin()).expect("json"),
        )
        .expect("write moves");

        let err = DataTables::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ResourceLoadError::InvalidData { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(SPECIES_FILE), "{ not json").expect("write");
        let err = DataTables::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ResourceLoadError::Parse { .. }));
    }
}
