use super::{CreatureType, Growth, Species, Stats};

pub fn builtin() -> Vec<Species> {
    vec![
        Species::new(
            "flamepup",
            "Flamepup",
            CreatureType::Critter,
            stats([50, 30, 20, 15, 15, 40, 35]),
            growth([10.0, 5.0, 4.0, 3.0, 3.0, 6.0, 5.0]),
            "A small fire creature with boundless energy.",
        ),
        Species::new(
            "grassling",
            "Grassling",
            CreatureType::Plant,
            stats([45, 25, 15, 30, 15, 35, 30]),
            growth([9.0, 4.0, 3.0, 5.0, 3.0, 6.0, 5.0]),
            "A gentle plant creature that loves sunlight.",
        ),
        Species::new(
            "aquafin",
            "Aquafin",
            CreatureType::Aquatic,
            stats([55, 28, 25, 20, 22, 38, 32]),
            growth([11.0, 4.0, 3.0, 5.0, 3.0, 6.0, 4.0]),
            "A sleek water creature with powerful fins.",
        ),
        Species::new(
            "sparkwing",
            "Sparkwing",
            CreatureType::Avian,
            stats([40, 35, 15, 25, 20, 30, 45]),
            growth([8.0, 5.0, 4.0, 3.0, 3.0, 6.0, 7.0]),
            "An electric creature known for its incredible speed.",
        ),
    ]
}

// Field order: max health, attack, defense, sp. attack, sp. defense, stamina, speed.
fn stats([max_health, attack, defense, special_attack, special_defense, stamina, speed]: [u32; 7]) -> Stats {
    Stats {
        max_health,
        attack,
        defense,
        special_attack,
        special_defense,
        stamina,
        speed,
    }
}

fn growth([max_health, attack, defense, special_attack, special_defense, stamina, speed]: [f32; 7]) -> Growth {
    Growth {
        max_health,
        attack,
        defense,
        special_attack,
        special_defense,
        stamina,
        speed,
    }
}

impl Species {
    pub fn new(
        id: &str,
        name: &str,
        kind: CreatureType,
        base_stats: Stats,
        growth: Growth,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            base_stats,
            growth,
            description: description.to_string(),
        }
    }
}
