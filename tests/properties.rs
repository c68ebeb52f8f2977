//! Property tests over random seeds, frame timings and pointer input

use std::rc::Rc;

use chrono::{Days, NaiveDate};
use neon_drift::consts::GAME_WIDTH;
use neon_drift::persistence::next_streak;
use neon_drift::sim::{GameState, TickInput, tick};
use neon_drift::{EventBus, GamePhase, NeonDrift, Services, Tuning};
use proptest::prelude::*;

fn day(offset: u64) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    base.checked_add_days(Days::new(offset)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gaps_stay_inside_the_arena(
        seed in any::<u64>(),
        frames in proptest::collection::vec(0.001f32..0.05, 100..600),
    ) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed);
        state.start_run(&tuning);
        let input = TickInput { autopilot: true };

        for dt in frames {
            tick(&mut state, &input, &tuning, dt);
            for gate in state.gates() {
                prop_assert!(gate.gap_left() >= 0.0);
                prop_assert!(gate.gap_right() <= GAME_WIDTH);
                prop_assert!(gate.gap_width >= tuning.gap_width_min);
                prop_assert!(gate.gap_width <= tuning.gap_width_max);
            }
        }
    }

    #[test]
    fn score_and_gates_never_decrease_within_a_run(
        seed in any::<u64>(),
        pointer in proptest::collection::vec(-50.0f32..410.0, 200..800),
    ) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed);
        state.start_run(&tuning);
        let input = TickInput::default();

        let mut last = state.stats();
        for x in pointer {
            state.player.set_target(x, &tuning);
            tick(&mut state, &input, &tuning, 1.0 / 60.0);
            let now = state.stats();
            prop_assert!(now.score >= last.score);
            prop_assert!(now.gates_passed >= last.gates_passed);
            prop_assert!(now.near_misses <= now.gates_passed);
            prop_assert!(state.player.target_x >= tuning.pointer_margin);
            prop_assert!(state.player.target_x <= GAME_WIDTH - tuning.pointer_margin);
            last = now;
        }
    }

    #[test]
    fn best_is_monotonic_across_runs(seed in any::<u64>(), runs in 1usize..4) {
        let bus = Rc::new(EventBus::new());
        let mut game = NeonDrift::new(bus, Services::headless(), Tuning::default(), seed);
        let mut best = game.best();
        for _ in 0..runs {
            game.restart();
            let mut frames = 0;
            while game.phase() == GamePhase::Running && frames < 1800 {
                game.update(1.0 / 60.0);
                frames += 1;
                prop_assert!(game.best() >= best);
                prop_assert!(game.best() >= game.stats().score);
                best = game.best();
            }
        }
    }

    #[test]
    fn streak_is_at_least_one(previous in any::<u32>(), last in 0u64..4000, today in 0u64..4000) {
        prop_assert!(next_streak(previous, Some(day(last)), day(today)) >= 1);
    }

    #[test]
    fn consecutive_days_extend_the_streak(previous in 0u32..10_000, start in 0u64..4000) {
        prop_assert_eq!(next_streak(previous, Some(day(start)), day(start + 1)), previous + 1);
    }

    #[test]
    fn gaps_of_two_or_more_days_reset(previous in any::<u32>(), start in 0u64..4000, gap in 2u64..400) {
        prop_assert_eq!(next_streak(previous, Some(day(start)), day(start + gap)), 1);
    }
}
