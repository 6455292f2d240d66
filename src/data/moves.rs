use super::{Move, MoveCategory, MoveType};

pub fn builtin() -> Vec<Move> {
    vec![
        Move::new(
            "tackle",
            "Tackle",
            20,
            95,
            5,
            MoveType::Normal,
            MoveCategory::Physical,
            "A basic physical attack.",
        ),
        Move::new(
            "ember",
            "Ember",
            25,
            90,
            10,
            MoveType::Fire,
            MoveCategory::Special,
            "Shoots small flames at the opponent.",
        ),
        Move::new(
            "vineWhip",
            "Vine Whip",
            25,
            90,
            10,
            MoveType::Grass,
            MoveCategory::Special,
            "Whips the target with slender vines.",
        ),
        Move::new(
            "waterGun",
            "Water Gun",
            25,
            90,
            10,
            MoveType::Water,
            MoveCategory::Special,
            "Blasts the target with a powerful stream of water.",
        ),
        Move::new(
            "thunderShock",
            "Thunder Shock",
            25,
            90,
            10,
            MoveType::Electric,
            MoveCategory::Special,
            "Strikes the opponent with a jolt of electricity.",
        ),
        Move::new(
            "quickAttack",
            "Quick Attack",
            15,
            100,
            7,
            MoveType::Normal,
            MoveCategory::Physical,
            "A fast attack that always goes first.",
        ),
    ]
}

impl Move {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        power: u32,
        accuracy: u8,
        cost: u32,
        kind: MoveType,
        category: MoveCategory,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            power,
            accuracy: accuracy.min(100),
            cost,
            kind,
            category,
            description: description.to_string(),
        }
    }
}
