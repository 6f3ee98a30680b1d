//! Random battle records.

use battlemap_core::{
    period_details, sample_image_url, sample_media, GenerationPeriod, NewBattle, MAINLAND_FRANCE,
};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::names;

/// Produces plausible battles from a random source.
///
/// Deterministic for a seeded RNG, which the tests rely on.
#[derive(Debug)]
pub struct BattleGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> BattleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One battle with a uniform year inside the period's inclusive bounds.
    pub fn generate(&mut self, period: &GenerationPeriod) -> NewBattle {
        let year = self.rng.random_range(period.start_year..=period.end_year);
        self.generate_for_year(year)
    }

    /// One battle in a given year.
    pub fn generate_for_year(&mut self, year: i32) -> NewBattle {
        let rng = &mut self.rng;
        let details = period_details(year);

        let attacker = details.factions.choose(rng).copied().unwrap_or_default();
        let defenders: Vec<&str> = details
            .factions
            .iter()
            .copied()
            .filter(|f| *f != attacker)
            .collect();
        let defender = defenders.choose(rng).copied().unwrap_or_default();

        let name = names::battle_name(rng);
        let latitude = rng.random_range(MAINLAND_FRANCE.min_latitude..=MAINLAND_FRANCE.max_latitude);
        let longitude =
            rng.random_range(MAINLAND_FRANCE.min_longitude..=MAINLAND_FRANCE.max_longitude);
        let description = names::description(rng, attacker, defender);
        let outcome = details.outcomes.choose(rng).copied().unwrap_or_default();

        NewBattle {
            name,
            year,
            latitude,
            longitude,
            description: Some(description),
            participants: Some(format!("{} contre {}", attacker, defender)),
            outcome: Some(outcome.to_string()),
            historical_context: None,
            sources: None,
            image_url: Some(sample_image_url(year).to_string()),
            media_urls: Some(sample_media(year)),
        }
    }

    /// Up to `size` battles for a period.
    pub fn batch(&mut self, period: &GenerationPeriod, size: usize) -> Vec<NewBattle> {
        (0..size).map(|_| self.generate(period)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlemap_core::{BattleType, GENERATION_PERIODS};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_output() {
        let mut a = BattleGenerator::new(StdRng::seed_from_u64(42));
        let mut b = BattleGenerator::new(StdRng::seed_from_u64(42));
        assert_eq!(a.batch(&GENERATION_PERIODS[1], 20), b.batch(&GENERATION_PERIODS[1], 20));
    }

    #[test]
    fn test_media_follows_year() {
        let mut generator = BattleGenerator::new(StdRng::seed_from_u64(1));
        let battle = generator.generate_for_year(1429);
        assert_eq!(battle.image_url.as_deref(), Some(sample_image_url(1429)));
        assert_eq!(battle.media_urls, Some(sample_media(1429)));
    }

    proptest! {
        #[test]
        fn prop_generated_battle_is_well_formed(seed in any::<u64>(), period_idx in 0usize..4) {
            let period = GENERATION_PERIODS[period_idx];
            let mut generator = BattleGenerator::new(StdRng::seed_from_u64(seed));
            let battle = generator.generate(&period);

            prop_assert!(period.contains(battle.year));
            prop_assert!(MAINLAND_FRANCE.contains(battle.latitude, battle.longitude));
            prop_assert!(BattleType::from_name(&battle.name).is_some());

            let details = period_details(battle.year);
            let participants = battle.participants.unwrap_or_default();
            let (a, b) = participants.split_once(" contre ").unwrap_or(("", ""));
            prop_assert!(details.factions.contains(&a));
            prop_assert!(details.factions.contains(&b));
            prop_assert_ne!(a, b);

            let outcome = battle.outcome.unwrap_or_default();
            prop_assert!(details.outcomes.contains(&outcome.as_str()));
        }
    }
}
