use bracket_random::prelude::RandomNumberGenerator;

/// Uniform source of values in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for RandomNumberGenerator {
    fn next_unit(&mut self) -> f64 {
        let value: f64 = self.rand();
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Picks an index in `0..len` from one unit draw. `len` must be non-zero.
pub fn pick_index(rng: &mut dyn RandomSource, len: usize) -> usize {
    let idx = (rng.next_unit() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedRolls;
    use super::*;

    #[test]
    fn seeded_generator_stays_in_unit_range() {
        let mut rng = RandomNumberGenerator::seeded(7);
        for _ in 0..1_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn pick_index_never_overflows() {
        let mut rolls = ScriptedRolls::new(&[0.0, 0.999_999, 0.5]);
        assert_eq!(pick_index(&mut rolls, 4), 0);
        assert_eq!(pick_index(&mut rolls, 4), 3);
        assert_eq!(pick_index(&mut rolls, 4), 2);
    }
}
