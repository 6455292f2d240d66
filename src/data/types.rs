use std::collections::BTreeMap;

use super::{CreatureType, MoveType};

/// Damage multiplier for a move type landing on a creature type.
///
/// Battle damage does not consult it; the battle HUD shows it as a hint.
#[derive(Clone, Debug, Default)]
pub struct TypeChart {
    multipliers: BTreeMap<(CreatureType, MoveType), f32>,
}

const MOVE_TYPES: [MoveType; 8] = [
    MoveType::Normal,
    MoveType::Fire,
    MoveType::Water,
    MoveType::Grass,
    MoveType::Ice,
    MoveType::Electric,
    MoveType::Poison,
    MoveType::Shadow,
];

impl TypeChart {
    pub fn builtin() -> Self {
        let rows: [(CreatureType, [f32; 8]); 7] = [
            (CreatureType::Critter, [1.0, 1.5, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0]),
            (CreatureType::Avian, [1.0, 1.0, 0.5, 1.0, 1.0, 1.5, 1.0, 1.0]),
            (CreatureType::Aquatic, [1.0, 0.5, 1.0, 1.5, 0.5, 1.5, 1.0, 1.0]),
            (CreatureType::Reptile, [1.0, 1.0, 1.5, 1.5, 1.0, 1.0, 0.5, 0.5]),
            (CreatureType::Plant, [1.0, 2.0, 0.5, 0.5, 1.0, 0.5, 1.5, 1.0]),
            (CreatureType::Ghost, [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0]),
            (CreatureType::Dragon, [1.0, 0.0, 1.5, 0.5, 1.5, 0.5, 1.0, 1.0]),
        ];

        let mut multipliers = BTreeMap::new();
        for (defender, row) in rows {
            for (move_type, multiplier) in MOVE_TYPES.iter().zip(row) {
                multipliers.insert((defender, *move_type), multiplier);
            }
        }
        Self { multipliers }
    }

    /// Unlisted pairs are neutral.
    pub fn multiplier(&self, defender: CreatureType, move_type: MoveType) -> f32 {
        self.multipliers
            .get(&(defender, move_type))
            .copied()
            .unwrap_or(1.0)
    }
}
