/// Procedural level generator.
///
/// A level is a run of patterns: fixed, named arrangements of one or
/// more objects emitted as a unit. The generator walks a cursor from
/// the lead-in offset toward the target distance, picking a pattern
/// each round (never the same one twice in a row) and advancing by a
/// difficulty-dependent gap.
///
/// Generation is random but structurally constrained: no back-to-back
/// pattern repeats, minimum gaps, difficulty gating, and a safety
/// margin before the finish marker so the last hazard never crowds it.
/// It is intentionally NOT seeded-reproducible; every attempt gets a
/// fresh layout.

use rand::Rng;

use super::entity::{Level, LevelObject};

/// Clear run-up before the first hazard.
const LEAD_IN: f32 = 600.0;
/// No hazard is emitted past `target - SAFETY_MARGIN`.
const SAFETY_MARGIN: f32 = 400.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Hard,
    Insane,
}

impl Difficulty {
    /// Baseline cursor advance per pattern.
    fn gap_base(self) -> f32 {
        match self {
            Difficulty::Easy => 260.0,
            Difficulty::Hard => 220.0,
            Difficulty::Insane => 200.0,
        }
    }

    /// Speed portal strength for the portal-pair pattern.
    fn portal_speed_mult(self) -> f32 {
        match self {
            Difficulty::Hard => 1.2,
            _ => 1.4,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Pattern {
    SingleSpike,
    DoubleSpike,
    PadSpike,
    TripleSpike,
    PortalPair,
}

const PATTERNS: [Pattern; 5] = [
    Pattern::SingleSpike,
    Pattern::DoubleSpike,
    Pattern::PadSpike,
    Pattern::TripleSpike,
    Pattern::PortalPair,
];

/// Pick the next pattern, re-rolling while it matches the previous one.
pub(crate) fn pick_pattern(rng: &mut impl Rng, last: Option<Pattern>) -> Pattern {
    loop {
        let p = PATTERNS[rng.gen_range(0..PATTERNS.len())];
        if Some(p) != last {
            return p;
        }
    }
}

/// Generate a level long enough to take `target_seconds` at the given
/// scroll rate. The finish marker sits exactly at the target distance.
pub fn generate(
    rng: &mut impl Rng,
    px_per_sec: f32,
    target_seconds: f32,
    difficulty: Difficulty,
) -> Level {
    let target = px_per_sec * target_seconds;
    let mut objects: Vec<LevelObject> = Vec::new();
    let mut x = LEAD_IN;
    let mut last: Option<Pattern> = None;

    while x < target - SAFETY_MARGIN {
        let pattern = pick_pattern(rng, last);
        last = Some(pattern);
        let gap = difficulty.gap_base();

        match pattern {
            Pattern::SingleSpike => {
                objects.push(LevelObject::spike(x));
                x += gap + 40.0;
            }
            Pattern::DoubleSpike => {
                objects.push(LevelObject::spike(x));
                objects.push(LevelObject::spike(x + 60.0));
                x += gap + 80.0;
            }
            Pattern::PadSpike => {
                objects.push(LevelObject::pad(x - 60.0));
                objects.push(LevelObject::spike(x + 40.0));
                x += gap + 80.0;
            }
            Pattern::TripleSpike => {
                if difficulty == Difficulty::Easy {
                    // Too dense for easy: fall back to a lone spike
                    objects.push(LevelObject::spike(x));
                    x += gap + 100.0;
                } else {
                    objects.push(LevelObject::spike(x));
                    objects.push(LevelObject::spike(x + 55.0));
                    objects.push(LevelObject::spike(x + 110.0));
                    x += gap + 80.0;
                }
            }
            Pattern::PortalPair => {
                if difficulty == Difficulty::Easy {
                    // No gravity tricks on easy: leave a breather instead
                    x += gap + 120.0;
                } else {
                    objects.push(LevelObject::gravity_portal(x));
                    x += 200.0;
                    objects.push(LevelObject::speed_portal(x, difficulty.portal_speed_mult()));
                    x += gap + 120.0;
                }
            }
        }
    }

    Level { objects, finish_x: target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ObjectKind;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const PX_PER_SEC: f32 = 360.0;

    fn all_difficulties() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Hard, Difficulty::Insane]
    }

    #[test]
    fn no_immediate_pattern_repeat() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut last = None;
        for _ in 0..500 {
            let p = pick_pattern(&mut rng, last);
            assert_ne!(Some(p), last);
            last = Some(p);
        }
    }

    #[test]
    fn finish_marker_at_target_distance() {
        for diff in all_difficulties() {
            let mut rng = SmallRng::seed_from_u64(1);
            let level = generate(&mut rng, PX_PER_SEC, 25.0, diff);
            assert_eq!(level.finish_x, PX_PER_SEC * 25.0);
        }
    }

    #[test]
    fn finish_is_reachable_beyond_every_object() {
        for (seed, diff) in [(2, Difficulty::Easy), (3, Difficulty::Hard), (4, Difficulty::Insane)] {
            let mut rng = SmallRng::seed_from_u64(seed);
            let level = generate(&mut rng, PX_PER_SEC, 40.0, diff);
            assert!(!level.objects.is_empty());
            for ob in &level.objects {
                assert!(ob.x < level.finish_x, "{:?} at {} past finish {}", ob.kind, ob.x, level.finish_x);
            }
        }
    }

    #[test]
    fn safety_margin_before_finish() {
        // Objects are placed at most 200 past the loop cursor, and the
        // cursor never enters the last 400 units.
        for diff in all_difficulties() {
            for seed in 0..20 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let level = generate(&mut rng, PX_PER_SEC, 30.0, diff);
                let max_x = level.objects.iter().map(|o| o.x).fold(0.0_f32, f32::max);
                assert!(max_x < level.finish_x - 200.0);
            }
        }
    }

    #[test]
    fn easy_suppresses_portals() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let level = generate(&mut rng, PX_PER_SEC, 40.0, Difficulty::Easy);
            assert!(level.objects.iter().all(|o| {
                matches!(o.kind, ObjectKind::Spike | ObjectKind::Pad)
            }));
        }
    }

    #[test]
    fn hard_portal_pairs_use_weaker_multiplier() {
        let mut rng = SmallRng::seed_from_u64(11);
        let level = generate(&mut rng, PX_PER_SEC, 60.0, Difficulty::Hard);
        for ob in level.objects.iter().filter(|o| o.kind == ObjectKind::SpeedPortal) {
            assert!((ob.speed_mult - 1.2).abs() < 1e-6);
        }
    }

    #[test]
    fn objects_start_untriggered() {
        let mut rng = SmallRng::seed_from_u64(5);
        let level = generate(&mut rng, PX_PER_SEC, 35.0, Difficulty::Insane);
        assert!(level.objects.iter().all(|o| !o.triggered));
    }
}
