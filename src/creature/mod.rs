//! Creature instances and the player's party.
//!
//! A creature stores only its experience and current health; level and the
//! full stat block are derived from the species on every read.

pub mod progression;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use smallvec::SmallVec;

use crate::data::{DEFAULT_MOVE, DataTables, Move, Species, Stats};

pub const MAX_KNOWN_MOVES: usize = 4;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CreatureId(String);

impl CreatureId {
    pub fn generate(species_id: &str) -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "{species_id}_{}_{sequence}",
            Utc::now().timestamp_millis()
        ))
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Creature {
    id: CreatureId,
    species: Arc<Species>,
    health: u32,
    experience: u32,
    nickname: Option<String>,
    moves: SmallVec<[Arc<Move>; MAX_KNOWN_MOVES]>,
    wild: bool,
}

impl Creature {
    /// An owned creature at full health that knows the default move, if the
    /// tables carry it.
    pub fn new(species: Arc<Species>, experience: u32, data: &DataTables) -> Self {
        let mut creature = Self {
            id: CreatureId::generate(&species.id),
            species,
            health: 0,
            experience,
            nickname: None,
            moves: SmallVec::new(),
            wild: false,
        };
        creature.health = creature.stats().max_health;
        if let Some(tackle) = data.move_by_id(DEFAULT_MOVE) {
            creature.learn_move(Arc::clone(tackle));
        }
        creature
    }

    pub fn wild(species: Arc<Species>, experience: u32, data: &DataTables) -> Self {
        Self {
            wild: true,
            ..Self::new(species, experience, data)
        }
    }

    #[cfg(test)]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Clamped to the current maximum.
    #[cfg(test)]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.stats().max_health);
        self
    }

    pub fn id(&self) -> &CreatureId {
        &self.id
    }

    pub fn species(&self) -> &Arc<Species> {
        &self.species
    }

    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species.name)
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn is_wild(&self) -> bool {
        self.wild
    }

    pub fn moves(&self) -> &[Arc<Move>] {
        &self.moves
    }

    pub fn level(&self) -> u32 {
        progression::level_for_experience(self.experience)
    }

    pub fn stats(&self) -> Stats {
        progression::stats_at_level(&self.species.base_stats, &self.species.growth, self.level())
    }

    pub fn experience_to_next_level(&self) -> u32 {
        progression::experience_to_next_level(self.experience)
    }

    pub fn is_fainted(&self) -> bool {
        self.health == 0
    }

    /// Returns the damage actually dealt, never more than the remaining health.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let missing = self.stats().max_health.saturating_sub(self.health);
        let restored = amount.min(missing);
        self.health += restored;
        restored
    }

    pub fn restore(&mut self) {
        self.heal(u32::MAX);
    }

    /// True when `amount` reaches the next level threshold. Multiple levels
    /// may be crossed at once; the flag does not say how many.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        let leveled_up = amount >= self.experience_to_next_level();
        self.experience = self.experience.saturating_add(amount);
        leveled_up
    }

    /// False when all four slots are taken or the move is already known.
    pub fn learn_move(&mut self, mv: Arc<Move>) -> bool {
        if self.moves.len() >= MAX_KNOWN_MOVES || self.moves.iter().any(|known| known.id == mv.id) {
            return false;
        }
        self.moves.push(mv);
        true
    }

    pub fn tame(&mut self) {
        self.wild = false;
    }
}

/// The player's creatures in battle order.
#[derive(Clone, Debug, Default)]
pub struct Party {
    members: Vec<Creature>,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single starter: the first species at level 5.
    pub fn starter(data: &DataTables) -> Self {
        let mut party = Self::new();
        if let Some(species) = data.species("flamepup").or_else(|| data.species_at(0)) {
            let experience = progression::experience_for_level(5);
            party.add(Creature::new(Arc::clone(species), experience, data));
        }
        party
    }

    pub fn add(&mut self, creature: Creature) {
        self.members.push(creature);
    }

    /// Removes and returns the first creature that can still fight.
    pub fn take_lead(&mut self) -> Option<Creature> {
        let idx = self.members.iter().position(|c| !c.is_fainted())?;
        Some(self.members.remove(idx))
    }

    pub fn insert_lead(&mut self, creature: Creature) {
        self.members.insert(0, creature);
    }

    pub fn restore_all(&mut self) {
        self.members.iter_mut().for_each(Creature::restore);
    }

    pub fn members(&self) -> &[Creature] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
