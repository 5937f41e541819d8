//! Entity catalog: which fruit and obstacle kinds exist and when they unlock.
//!
//! Fruit selection works in bands over a roll in `[0, 100)`: heart first, then
//! golden, then rotten, and regular fruit takes whatever remains. A band whose
//! tier has no unlocked variant is skipped, and its share falls through to the
//! following bands. Within a tier the variant is chosen uniformly.
//!
//! Obstacle selection is a weighted pick over the registered kinds; weights
//! are renormalized, so they need not sum to 100.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::{FruitKind, FruitTier, ObstacleKind};
use crate::generation::progression::ProgressParams;
use crate::random;

/// A fruit variant and the progress after which it becomes available.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FruitEntry {
    pub kind: FruitKind,
    /// Available once `progress > unlock_after`; `None` means always available.
    pub unlock_after: Option<f32>,
}

impl FruitEntry {
    pub fn is_unlocked(&self, progress: f32) -> bool {
        self.unlock_after.is_none_or(|gate| progress > gate)
    }
}

/// Relative weights of the obstacle kinds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObstacleWeights {
    pub building: f32,
    pub missile: f32,
    pub cannonball: f32,
}

impl ObstacleWeights {
    pub fn new(building: f32, missile: f32, cannonball: f32) -> Self {
        Self {
            building,
            missile,
            cannonball,
        }
    }

    /// The same weights with buildings excluded.
    pub fn airborne(self) -> Self {
        Self {
            building: 0.0,
            ..self
        }
    }

    pub fn weight(&self, kind: ObstacleKind) -> f32 {
        match kind {
            ObstacleKind::Building => self.building,
            ObstacleKind::Missile => self.missile,
            ObstacleKind::Cannonball => self.cannonball,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityCatalog {
    fruits: Vec<FruitEntry>,
    obstacles: Vec<ObstacleKind>,
}

impl EntityCatalog {
    /// A catalog with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every fruit and obstacle, with the shipped unlock gates.
    pub fn standard() -> Self {
        Self::empty()
            .with_fruit(FruitKind::Apple, None)
            .with_fruit(FruitKind::Grape, Some(0.05))
            .with_fruit(FruitKind::Watermelon, Some(0.20))
            .with_fruit(FruitKind::Dragonfruit, Some(0.40))
            .with_fruit(FruitKind::GoldApple, Some(0.15))
            .with_fruit(FruitKind::GoldGrape, Some(0.30))
            .with_fruit(FruitKind::GoldWatermelon, Some(0.50))
            .with_fruit(FruitKind::GoldDragonfruit, Some(0.70))
            .with_fruit(FruitKind::HeartFruit, None)
            .with_fruit(FruitKind::RottenApple, None)
            .with_obstacle(ObstacleKind::Building)
            .with_obstacle(ObstacleKind::Missile)
            .with_obstacle(ObstacleKind::Cannonball)
    }

    /// Registers a fruit variant, replacing an existing entry for the same kind.
    pub fn with_fruit(mut self, kind: FruitKind, unlock_after: Option<f32>) -> Self {
        self.fruits.retain(|e| e.kind != kind);
        self.fruits.push(FruitEntry { kind, unlock_after });
        self
    }

    pub fn with_obstacle(mut self, kind: ObstacleKind) -> Self {
        if !self.obstacles.contains(&kind) {
            self.obstacles.push(kind);
        }
        self
    }

    pub fn fruits(&self) -> &[FruitEntry] {
        &self.fruits
    }

    pub fn has_obstacle(&self, kind: ObstacleKind) -> bool {
        self.obstacles.contains(&kind)
    }

    pub fn has_fruit(&self) -> bool {
        !self.fruits.is_empty()
    }

    pub fn has_obstacles(&self) -> bool {
        !self.obstacles.is_empty()
    }

    /// Variants of `tier` available at `progress`, in registration order.
    pub fn unlocked(&self, tier: FruitTier, progress: f32) -> Vec<FruitKind> {
        self.fruits
            .iter()
            .filter(|e| e.kind.tier() == tier && e.is_unlocked(progress))
            .map(|e| e.kind)
            .collect()
    }

    /// Resolves a fruit roll in `[0, 100)` to a concrete variant.
    ///
    /// Returns `None` when the roll lands on regular fruit and no regular
    /// variant is unlocked.
    pub fn pick_fruit_kind(
        &self,
        progress: f32,
        roll: f32,
        params: &ProgressParams,
        rng: &mut dyn RngCore,
    ) -> Option<FruitKind> {
        let bands = [
            (FruitTier::Heart, params.heart_fruit_chance),
            (FruitTier::Golden, params.golden_fruit_chance),
            (FruitTier::Rotten, params.rotten_fruit_chance),
        ];

        let mut threshold = 0.0;
        for (tier, chance) in bands {
            let variants = self.unlocked(tier, progress);
            if variants.is_empty() {
                continue;
            }
            threshold += chance.max(0.0);
            if roll < threshold {
                return Some(pick_variant(&variants, rng));
            }
        }

        let regular = self.unlocked(FruitTier::Regular, progress);
        if regular.is_empty() {
            return None;
        }
        Some(pick_variant(&regular, rng))
    }

    /// Weighted choice among registered obstacle kinds using a unit roll in `[0, 1)`.
    ///
    /// Returns `None` when no registered kind has positive weight.
    pub fn pick_obstacle_kind(&self, roll: f32, weights: ObstacleWeights) -> Option<ObstacleKind> {
        let weighted: Vec<(ObstacleKind, f32)> = ObstacleKind::ALL
            .iter()
            .copied()
            .filter(|k| self.has_obstacle(*k))
            .map(|k| (k, weights.weight(k)))
            .filter(|(_, w)| *w > 0.0)
            .collect();

        let total: f32 = weighted.iter().map(|(_, w)| w).sum();
        if weighted.is_empty() || total <= 0.0 {
            return None;
        }

        let target = roll.clamp(0.0, 1.0) * total;
        let mut cumulative = 0.0;
        for (kind, weight) in &weighted {
            cumulative += weight;
            if target < cumulative {
                return Some(*kind);
            }
        }

        weighted.last().map(|(k, _)| *k)
    }
}

fn pick_variant(variants: &[FruitKind], rng: &mut dyn RngCore) -> FruitKind {
    if variants.len() == 1 {
        variants[0]
    } else {
        variants[random::index(rng, variants.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::test_support::FixedRng;

    fn params(golden: f32, heart: f32, rotten: f32) -> ProgressParams {
        ProgressParams::default().with_fruit_chances(golden, heart, rotten)
    }

    #[test]
    fn regular_variants_unlock_strictly_after_gate() {
        let catalog = EntityCatalog::standard();
        assert_eq!(
            catalog.unlocked(FruitTier::Regular, 0.0),
            vec![FruitKind::Apple]
        );
        assert_eq!(catalog.unlocked(FruitTier::Regular, 0.05).len(), 1);
        assert_eq!(catalog.unlocked(FruitTier::Regular, 0.06).len(), 2);
        assert_eq!(catalog.unlocked(FruitTier::Regular, 0.21).len(), 3);
        assert_eq!(catalog.unlocked(FruitTier::Regular, 0.41).len(), 4);
    }

    #[test]
    fn golden_variants_follow_their_own_gates() {
        let catalog = EntityCatalog::standard();
        assert!(catalog.unlocked(FruitTier::Golden, 0.15).is_empty());
        assert_eq!(
            catalog.unlocked(FruitTier::Golden, 0.16),
            vec![FruitKind::GoldApple]
        );
        assert_eq!(catalog.unlocked(FruitTier::Golden, 0.75).len(), 4);
    }

    #[test]
    fn bands_are_heart_golden_rotten_then_regular() {
        let catalog = EntityCatalog::standard();
        let p = params(15.0, 5.0, 10.0);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(
            catalog.pick_fruit_kind(0.2, 4.9, &p, &mut rng),
            Some(FruitKind::HeartFruit)
        );
        assert_eq!(
            catalog.pick_fruit_kind(0.2, 5.0, &p, &mut rng),
            Some(FruitKind::GoldApple)
        );
        assert_eq!(
            catalog.pick_fruit_kind(0.2, 25.0, &p, &mut rng),
            Some(FruitKind::RottenApple)
        );
        assert_eq!(
            catalog.pick_fruit_kind(0.2, 30.0, &p, &mut rng),
            Some(FruitKind::Apple)
        );
    }

    #[test]
    fn locked_golden_band_falls_through() {
        let catalog = EntityCatalog::standard();
        let p = params(20.0, 0.0, 10.0);
        let mut rng = FixedRng { value: 0 };
        // No golden variant before 0.15; the rotten band starts at 0.
        assert_eq!(
            catalog.pick_fruit_kind(0.1, 5.0, &p, &mut rng),
            Some(FruitKind::RottenApple)
        );
        assert_eq!(
            catalog.pick_fruit_kind(0.1, 15.0, &p, &mut rng),
            Some(FruitKind::Apple)
        );
    }

    #[test]
    fn variant_is_chosen_uniformly_within_tier() {
        let catalog = EntityCatalog::standard();
        let p = params(0.0, 0.0, 0.0);
        let mut last = FixedRng::unit(0.99);
        assert_eq!(
            catalog.pick_fruit_kind(0.5, 50.0, &p, &mut last),
            Some(FruitKind::Dragonfruit)
        );
        let mut first = FixedRng::unit(0.0);
        assert_eq!(
            catalog.pick_fruit_kind(0.5, 50.0, &p, &mut first),
            Some(FruitKind::Apple)
        );
    }

    #[test]
    fn missing_regular_fruit_yields_none() {
        let catalog = EntityCatalog::empty().with_fruit(FruitKind::HeartFruit, None);
        let p = params(0.0, 5.0, 0.0);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(catalog.pick_fruit_kind(0.5, 50.0, &p, &mut rng), None);
        assert_eq!(
            catalog.pick_fruit_kind(0.5, 1.0, &p, &mut rng),
            Some(FruitKind::HeartFruit)
        );
    }

    #[test]
    fn obstacle_pick_renormalizes_weights() {
        let catalog = EntityCatalog::standard();
        let weights = ObstacleWeights::new(0.0, 25.0, 75.0);
        assert_eq!(
            catalog.pick_obstacle_kind(0.2, weights),
            Some(ObstacleKind::Missile)
        );
        assert_eq!(
            catalog.pick_obstacle_kind(0.3, weights),
            Some(ObstacleKind::Cannonball)
        );
        assert_eq!(
            catalog.pick_obstacle_kind(0.999, weights),
            Some(ObstacleKind::Cannonball)
        );
    }

    #[test]
    fn obstacle_pick_skips_unregistered_kinds() {
        let catalog = EntityCatalog::empty().with_obstacle(ObstacleKind::Cannonball);
        let weights = ObstacleWeights::new(50.0, 50.0, 10.0);
        assert_eq!(
            catalog.pick_obstacle_kind(0.0, weights),
            Some(ObstacleKind::Cannonball)
        );
        assert_eq!(
            EntityCatalog::empty().pick_obstacle_kind(0.5, weights),
            None
        );
    }

    #[test]
    fn zero_weights_yield_none() {
        let catalog = EntityCatalog::standard();
        assert_eq!(
            catalog.pick_obstacle_kind(0.5, ObstacleWeights::new(30.0, 0.0, 0.0).airborne()),
            None
        );
    }

    #[test]
    fn re_registering_fruit_replaces_gate() {
        let catalog = EntityCatalog::standard().with_fruit(FruitKind::Grape, None);
        assert_eq!(catalog.unlocked(FruitTier::Regular, 0.0).len(), 2);
        assert_eq!(catalog.fruits().len(), 10);
    }
}
