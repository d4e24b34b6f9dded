/// Populating the world with ore at session start.
///
/// Randomness is injected so callers (and tests) choose the generator:
/// the game uses a thread RNG, tests seed a `SmallRng`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WorldRules;
use crate::domain::ore::{Ore, OreColor};
use super::world::WorldState;

/// Inclusive rectangle ore positions are drawn from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpawnBounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl SpawnBounds {
    /// `[-extent, extent]` on both axes.
    pub fn square(extent: i64) -> Self {
        let e = extent.saturating_abs();
        SpawnBounds { min_x: -e, max_x: e, min_y: -e, max_y: e }
    }

    #[cfg(test)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Draw `count` ore uniformly within `bounds`, colours uniform over `colors`.
/// An empty colour set means every colour.
pub fn spawn_ores<R: Rng>(count: usize, bounds: SpawnBounds, colors: &[OreColor], rng: &mut R) -> Vec<Ore> {
    let palette: &[OreColor] = if colors.is_empty() { &OreColor::ALL } else { colors };
    let (x_lo, x_hi) = ordered(bounds.min_x, bounds.max_x);
    let (y_lo, y_hi) = ordered(bounds.min_y, bounds.max_y);

    (0..count)
        .map(|_| {
            let x = rng.gen_range(x_lo..=x_hi);
            let y = rng.gen_range(y_lo..=y_hi);
            let color = *palette.choose(rng).unwrap_or(&OreColor::Red);
            Ore::new(x, y, color)
        })
        .collect()
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

impl WorldState {
    /// Append `count` random ore to the world.
    pub fn spawn<R: Rng>(&mut self, count: usize, bounds: SpawnBounds, colors: &[OreColor], rng: &mut R) {
        let ores = spawn_ores(count, bounds, colors, rng);
        self.ores.extend(ores);
    }
}

/// Fresh session: rules applied, ore spawned, saved points restored.
pub fn new_session<R: Rng>(rules: &WorldRules, cell_units: i64, points: u64, rng: &mut R) -> WorldState {
    let mut world = WorldState::new(rules.clone(), cell_units);
    world.points = points;
    let bounds = SpawnBounds::square(rules.spawn_extent);
    world.spawn(rules.ore_count, bounds, &rules.colors, rng);
    log::info!(
        "session started: {} ore within ±{}, {} points carried over",
        world.ores.len(), rules.spawn_extent, points,
    );
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_exact_count_with_matching_values() {
        let mut rng = SmallRng::seed_from_u64(42);
        let bounds = SpawnBounds::square(1000);
        let ores = spawn_ores(50, bounds, &OreColor::ALL, &mut rng);

        assert_eq!(ores.len(), 50);
        for o in &ores {
            assert!(bounds.contains(o.x, o.y));
            assert!(OreColor::ALL.contains(&o.color));
            let expected = match o.color {
                OreColor::Red => 1,
                OreColor::Green => 5,
                OreColor::Purple => 10,
            };
            assert_eq!(o.value(), expected);
            assert!([1, 5, 10].contains(&o.value()));
        }
    }

    #[test]
    fn colours_limited_to_configured_set() {
        let mut rng = SmallRng::seed_from_u64(7);
        let ores = spawn_ores(200, SpawnBounds::square(50), &[OreColor::Purple], &mut rng);
        assert!(ores.iter().all(|o| o.color == OreColor::Purple));
    }

    #[test]
    fn all_colours_appear_over_many_draws() {
        let mut rng = SmallRng::seed_from_u64(123);
        let ores = spawn_ores(300, SpawnBounds::square(1000), &[], &mut rng);
        for c in OreColor::ALL {
            assert!(ores.iter().any(|o| o.color == c), "{c:?} never drawn");
        }
    }

    #[test]
    fn degenerate_and_reversed_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        let point = SpawnBounds { min_x: 3, max_x: 3, min_y: -2, max_y: -2 };
        assert!(spawn_ores(10, point, &OreColor::ALL, &mut rng).iter().all(|o| (o.x, o.y) == (3, -2)));

        let reversed = SpawnBounds { min_x: 10, max_x: -10, min_y: 5, max_y: 0 };
        for o in spawn_ores(20, reversed, &OreColor::ALL, &mut rng) {
            assert!((-10..=10).contains(&o.x) && (0..=5).contains(&o.y));
        }
    }

    #[test]
    fn new_session_uses_rules_and_points() {
        let mut rng = SmallRng::seed_from_u64(9);
        let rules = WorldRules { ore_count: 12, ..WorldRules::default() };
        let w = new_session(&rules, 10, 33, &mut rng);
        assert_eq!(w.ores.len(), 12);
        assert_eq!(w.points, 33);
        assert_eq!(w.offset, (0, 0));
        assert!(w.builds.is_empty());
    }

    #[test]
    fn spawn_appends() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut w = WorldState::new(WorldRules::default(), 10);
        w.spawn(3, SpawnBounds::square(10), &OreColor::ALL, &mut rng);
        w.spawn(4, SpawnBounds::square(10), &OreColor::ALL, &mut rng);
        assert_eq!(w.ores.len(), 7);
    }
}
