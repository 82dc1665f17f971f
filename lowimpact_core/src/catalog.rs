//! Built-in session templates and the session generator.
//!
//! Every category has one fixed template. Generating a session walks the
//! template and resolves each step amount against the requested level.

use crate::types::*;

/// How a template step's numeric target is derived.
#[derive(Clone, Copy, Debug)]
enum Amount {
    /// Fixed duration in seconds
    Seconds(u32),
    /// Fixed repetition count
    Reps(u32),
    /// Repetitions scaled with the level
    ScaledReps(u32),
    /// Duration equal to scaled minutes times sixty
    ScaledMinutes(u32),
}

#[derive(Debug)]
struct StepTemplate {
    name: &'static str,
    amount: Amount,
}

#[derive(Debug)]
struct SessionTemplate {
    title: &'static str,
    base_minutes: u32,
    steps: &'static [StepTemplate],
}

const fn step(name: &'static str, amount: Amount) -> StepTemplate {
    StepTemplate { name, amount }
}

// ============================================================================
// Templates
// ============================================================================

static TAI_CHI: SessionTemplate = SessionTemplate {
    title: "Tai Chi Flow",
    base_minutes: 10,
    steps: &[
        step("Breath & Posture", Amount::Seconds(60)),
        step("Commencement", Amount::ScaledReps(4)),
        step("Parting the Wild Horse’s Mane", Amount::ScaledReps(6)),
        step("Wave Hands Like Clouds", Amount::ScaledReps(6)),
        step("Closing", Amount::Seconds(60)),
    ],
};

static CHAIR_YOGA: SessionTemplate = SessionTemplate {
    title: "Chair Yoga Mobility",
    base_minutes: 12,
    steps: &[
        step("Neck circles (gentle)", Amount::ScaledReps(6)),
        step("Seated cat-cow", Amount::ScaledReps(8)),
        step("Hip marches", Amount::ScaledReps(10)),
        step("Ankle pumps", Amount::ScaledReps(12)),
        step("Box breathing", Amount::Seconds(90)),
    ],
};

// The steady pace segment follows the scaled minutes of a 10 minute base,
// not the session estimate of 15.
static WALKING: SessionTemplate = SessionTemplate {
    title: "Mindful Walk",
    base_minutes: 15,
    steps: &[
        step("Warmup stroll", Amount::Seconds(120)),
        step("Steady pace", Amount::ScaledMinutes(10)),
        step("Cool-down & stretch", Amount::Seconds(120)),
    ],
};

static BALANCE: SessionTemplate = SessionTemplate {
    title: "Balance & Ankle Strength",
    base_minutes: 10,
    steps: &[
        step("Heel-to-toe hold (support if needed)", Amount::Seconds(30)),
        step("Single-leg stand (both sides)", Amount::Seconds(30)),
        step("Side steps along counter", Amount::ScaledReps(12)),
        step("Calf raises", Amount::ScaledReps(12)),
        step("Ankle alphabet (both feet)", Amount::Reps(1)),
    ],
};

static MOBILITY: SessionTemplate = SessionTemplate {
    title: "Gentle Mobility",
    base_minutes: 12,
    steps: &[
        step("Shoulder rolls", Amount::ScaledReps(10)),
        step("Thoracic open books", Amount::ScaledReps(8)),
        step("Hip hinges (pain-free)", Amount::ScaledReps(8)),
        step("90/90 hip switches (assisted)", Amount::ScaledReps(6)),
        step("Diaphragmatic breathing", Amount::Seconds(90)),
    ],
};

static CORE: SessionTemplate = SessionTemplate {
    title: "Deep Core Activation",
    base_minutes: 10,
    steps: &[
        step("Pelvic tilts (supine or chair)", Amount::ScaledReps(10)),
        step("Dead bug / seated opposite taps", Amount::ScaledReps(8)),
        step("Side wall press (anti-rotation)", Amount::ScaledReps(8)),
        step("Bracing & breathe", Amount::Seconds(60)),
    ],
};

static RESTORATIVE: SessionTemplate = SessionTemplate {
    title: "Restorative & Breath",
    base_minutes: 8,
    steps: &[
        step("Box breathing", Amount::Seconds(120)),
        step("Body scan (seated)", Amount::Seconds(180)),
        step("Supported forward fold (chair)", Amount::Seconds(60)),
    ],
};

fn template(category: Category) -> &'static SessionTemplate {
    match category {
        Category::TaiChi => &TAI_CHI,
        Category::ChairYoga => &CHAIR_YOGA,
        Category::Walking => &WALKING,
        Category::Balance => &BALANCE,
        Category::Mobility => &MOBILITY,
        Category::Core => &CORE,
        Category::Restorative => &RESTORATIVE,
    }
}

impl Amount {
    fn resolve(self, level: Level) -> StepTarget {
        match self {
            Amount::Seconds(secs) => StepTarget::Duration(secs),
            Amount::Reps(n) => StepTarget::Reps(n),
            Amount::ScaledReps(base) => StepTarget::Reps(level.scale(base)),
            Amount::ScaledMinutes(base) => StepTarget::Duration(level.scale(base) * 60),
        }
    }
}

/// Build the session for a category at the given level.
///
/// Always returns a fresh value; nothing is shared between calls.
pub fn build_session(category: Category, level: Level) -> Session {
    let template = template(category);

    let steps = template
        .steps
        .iter()
        .map(|t| Step {
            name: t.name.to_string(),
            target: t.amount.resolve(level),
        })
        .collect();

    tracing::debug!(
        "Built {:?} session at level {} ({} steps)",
        category,
        level,
        template.steps.len()
    );

    Session {
        title: template.title.to_string(),
        total_minutes: level.scale(template.base_minutes),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_levels() -> impl Iterator<Item = Level> {
        (1..=5).map(Level::clamped)
    }

    fn find<'a>(session: &'a Session, name: &str) -> &'a Step {
        session
            .steps
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("step {} not found in {}", name, session.title))
    }

    #[test]
    fn test_every_session_is_non_empty() {
        for category in Category::ROTATION {
            for level in all_levels() {
                let session = build_session(category, level);
                assert!(!session.steps.is_empty(), "{:?} has no steps", category);
                for step in &session.steps {
                    assert!(
                        !(step.duration_sec().is_some() && step.rep_count().is_some()),
                        "{} has both duration and reps",
                        step.name
                    );
                }
            }
        }
    }

    use crate::types::StepTarget::{Duration, Reps};

    /// Step name, target at level 1, target at level 5
    type ExpectedStep = (&'static str, StepTarget, StepTarget);

    fn expected_templates() -> Vec<(Category, &'static str, Vec<ExpectedStep>)> {
        vec![
            (
                Category::TaiChi,
                "Tai Chi Flow",
                vec![
                    ("Breath & Posture", Duration(60), Duration(60)),
                    ("Commencement", Reps(4), Reps(12)),
                    ("Parting the Wild Horse’s Mane", Reps(6), Reps(14)),
                    ("Wave Hands Like Clouds", Reps(6), Reps(14)),
                    ("Closing", Duration(60), Duration(60)),
                ],
            ),
            (
                Category::ChairYoga,
                "Chair Yoga Mobility",
                vec![
                    ("Neck circles (gentle)", Reps(6), Reps(14)),
                    ("Seated cat-cow", Reps(8), Reps(16)),
                    ("Hip marches", Reps(10), Reps(18)),
                    ("Ankle pumps", Reps(12), Reps(20)),
                    ("Box breathing", Duration(90), Duration(90)),
                ],
            ),
            (
                Category::Walking,
                "Mindful Walk",
                vec![
                    ("Warmup stroll", Duration(120), Duration(120)),
                    ("Steady pace", Duration(600), Duration(1080)),
                    ("Cool-down & stretch", Duration(120), Duration(120)),
                ],
            ),
            (
                Category::Balance,
                "Balance & Ankle Strength",
                vec![
                    ("Heel-to-toe hold (support if needed)", Duration(30), Duration(30)),
                    ("Single-leg stand (both sides)", Duration(30), Duration(30)),
                    ("Side steps along counter", Reps(12), Reps(20)),
                    ("Calf raises", Reps(12), Reps(20)),
                    ("Ankle alphabet (both feet)", Reps(1), Reps(1)),
                ],
            ),
            (
                Category::Mobility,
                "Gentle Mobility",
                vec![
                    ("Shoulder rolls", Reps(10), Reps(18)),
                    ("Thoracic open books", Reps(8), Reps(16)),
                    ("Hip hinges (pain-free)", Reps(8), Reps(16)),
                    ("90/90 hip switches (assisted)", Reps(6), Reps(14)),
                    ("Diaphragmatic breathing", Duration(90), Duration(90)),
                ],
            ),
            (
                Category::Core,
                "Deep Core Activation",
                vec![
                    ("Pelvic tilts (supine or chair)", Reps(10), Reps(18)),
                    ("Dead bug / seated opposite taps", Reps(8), Reps(16)),
                    ("Side wall press (anti-rotation)", Reps(8), Reps(16)),
                    ("Bracing & breathe", Duration(60), Duration(60)),
                ],
            ),
            (
                Category::Restorative,
                "Restorative & Breath",
                vec![
                    ("Box breathing", Duration(120), Duration(120)),
                    ("Body scan (seated)", Duration(180), Duration(180)),
                    ("Supported forward fold (chair)", Duration(60), Duration(60)),
                ],
            ),
        ]
    }

    #[test]
    fn test_templates_match_expected_content() {
        let expected = expected_templates();
        assert_eq!(expected.len(), Category::ROTATION.len());

        for (category, title, steps) in expected {
            let low = build_session(category, Level::MIN);
            let high = build_session(category, Level::MAX);

            for session in [&low, &high] {
                assert_eq!(session.title, title);
                let names: Vec<&str> = session.steps.iter().map(|s| s.name.as_str()).collect();
                let expected_names: Vec<&str> = steps.iter().map(|(name, _, _)| *name).collect();
                assert_eq!(names, expected_names, "{:?} step order", category);
            }

            for (i, (name, at_min, at_max)) in steps.iter().enumerate() {
                assert_eq!(low.steps[i].target, *at_min, "{:?} {} at level 1", category, name);
                assert_eq!(high.steps[i].target, *at_max, "{:?} {} at level 5", category, name);
            }
        }
    }

    #[test]
    fn test_tai_chi_commencement_scaling() {
        let reps = |l| {
            find(&build_session(Category::TaiChi, Level::clamped(l)), "Commencement").rep_count()
        };
        assert_eq!(reps(1), Some(4));
        assert_eq!(reps(3), Some(8));
        assert_eq!(reps(5), Some(12));
    }

    #[test]
    fn test_scaled_reps_follow_linear_law() {
        for level in all_levels() {
            let session = build_session(Category::ChairYoga, level);
            let expected = 12 + (level.get() as u32 - 1) * 2;
            assert_eq!(find(&session, "Ankle pumps").rep_count(), Some(expected));
        }
    }

    #[test]
    fn test_fixed_amounts_do_not_scale() {
        let session = build_session(Category::Balance, Level::MAX);
        assert_eq!(find(&session, "Ankle alphabet (both feet)").rep_count(), Some(1));
        assert_eq!(
            find(&session, "Heel-to-toe hold (support if needed)").duration_sec(),
            Some(30)
        );

        let session = build_session(Category::TaiChi, Level::MAX);
        assert_eq!(find(&session, "Breath & Posture").duration_sec(), Some(60));
    }

    #[test]
    fn test_walking_steady_pace_uses_scaled_minutes() {
        let level1 = build_session(Category::Walking, Level::MIN);
        assert_eq!(find(&level1, "Steady pace").duration_sec(), Some(600));
        assert_eq!(level1.total_minutes, 15);

        let level4 = build_session(Category::Walking, Level::clamped(4));
        assert_eq!(find(&level4, "Steady pace").duration_sec(), Some(16 * 60));
        assert_eq!(level4.total_minutes, 21);
    }

    #[test]
    fn test_total_minutes_scaling() {
        let expected = [
            (Category::TaiChi, 10),
            (Category::ChairYoga, 12),
            (Category::Walking, 15),
            (Category::Balance, 10),
            (Category::Mobility, 12),
            (Category::Core, 10),
            (Category::Restorative, 8),
        ];
        for (category, base) in expected {
            assert_eq!(build_session(category, Level::MIN).total_minutes, base);
            assert_eq!(build_session(category, Level::MAX).total_minutes, base + 8);
        }
    }

    #[test]
    fn test_out_of_range_level_is_clamped() {
        assert_eq!(
            build_session(Category::Core, Level::clamped(42)),
            build_session(Category::Core, Level::MAX)
        );
        assert_eq!(
            build_session(Category::Core, Level::clamped(-3)),
            build_session(Category::Core, Level::MIN)
        );
    }

    #[test]
    fn test_sessions_are_independent_values() {
        let mut first = build_session(Category::Mobility, Level::MIN);
        first.steps.clear();
        let second = build_session(Category::Mobility, Level::MIN);
        assert_eq!(second.steps.len(), 5);
    }
}
