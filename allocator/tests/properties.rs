//! Property tests for allocation invariants
//!
//! Random engine sets and mutation sequences; after every step the
//! allocator must keep its budgets balanced and its projections bounded.

use allocator::{classify, Availability, Band, BudgetAllocator};
use proptest::prelude::*;
use shared::{clamp_amount, AllocationMode, Amount, EngineConfig};

mod common;
use common::TestHelpers;

#[derive(Debug, Clone)]
enum Op {
    SetTotal(f64),
    Toggle(usize, bool),
    Mode(AllocationMode),
}

fn engine_id(index: usize) -> String {
    format!("engine-{index}")
}

fn engines_strategy() -> impl Strategy<Value = Vec<EngineConfig>> {
    prop::collection::vec((0.0f64..10.0, any::<bool>()), 1..6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (roas, enabled))| {
                let engine = EngineConfig::new(engine_id(index), format!("Engine {index}"), roas);
                if enabled { engine } else { engine.disabled() }
            })
            .collect()
    })
}

fn redistributing_mode() -> impl Strategy<Value = AllocationMode> {
    prop_oneof![Just(AllocationMode::Auto), Just(AllocationMode::Even)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-1_000.0f64..1_000_000.0).prop_map(Op::SetTotal),
        (0usize..6, any::<bool>()).prop_map(|(index, enabled)| Op::Toggle(index, enabled)),
        redistributing_mode().prop_map(Op::Mode),
    ]
}

fn apply(allocator: &mut BudgetAllocator, op: &Op) {
    match op {
        Op::SetTotal(amount) => allocator.set_total_budget(*amount),
        Op::Toggle(index, enabled) => {
            let count = allocator.get_engines().len();
            allocator
                .set_engine_enabled(&engine_id(index % count), *enabled)
                .unwrap();
        }
        Op::Mode(mode) => allocator.set_mode(*mode),
    }
}

fn budgets(allocator: &BudgetAllocator) -> Vec<Amount> {
    TestHelpers::budgets(allocator)
}

proptest! {
    /// Auto and even budgets sum to the total whenever an engine is enabled
    #[test]
    fn budgets_sum_to_total(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
        mode in redistributing_mode(),
        ops in prop::collection::vec(op_strategy(), 0..20),
    ) {
        let mut allocator = BudgetAllocator::new(&engines, total, mode).unwrap();

        for op in &ops {
            apply(&mut allocator, op);

            let sum: Amount = budgets(&allocator).iter().sum();
            if allocator.get_engines().iter().any(|engine| engine.enabled) {
                prop_assert_eq!(sum, allocator.total_budget());
            } else {
                prop_assert_eq!(sum, 0);
            }
        }
    }

    /// Disabled engines hold 0 in every mode
    #[test]
    fn disabled_engines_hold_zero(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
        ops in prop::collection::vec(op_strategy(), 0..20),
        manual_amount in 0.0f64..10_000.0,
    ) {
        let mut allocator = BudgetAllocator::new(&engines, total, AllocationMode::Auto).unwrap();

        for op in &ops {
            apply(&mut allocator, op);
            for engine in allocator.get_engines() {
                if !engine.enabled {
                    prop_assert_eq!(engine.budget, 0);
                }
            }
        }

        allocator.set_mode(AllocationMode::Manual);
        let enabled: Vec<String> = allocator
            .get_engines()
            .iter()
            .filter(|engine| engine.enabled)
            .map(|engine| engine.id.to_string())
            .collect();
        for id in &enabled {
            allocator.set_engine_budget(id, manual_amount).unwrap();
        }
        if let Some(id) = enabled.first() {
            allocator.set_engine_enabled(id, false).unwrap();
        }
        for engine in allocator.get_engines() {
            if !engine.enabled {
                prop_assert_eq!(engine.budget, 0);
            }
        }
    }

    /// Manual edits move the total to the budget sum and touch only the target
    #[test]
    fn manual_edit_round_trip(
        engines in engines_strategy(),
        total in 0.0f64..1e20,
        edits in prop::collection::vec(
            (0usize..6, prop_oneof![-1e3f64..1e6, 0.0f64..f64::MAX]),
            1..10,
        ),
    ) {
        let mut allocator = BudgetAllocator::new(&engines, total, AllocationMode::Auto).unwrap();
        allocator.set_mode(AllocationMode::Manual);
        let mut edited = false;

        for (index, amount) in &edits {
            let count = allocator.get_engines().len();
            let target = engine_id(index % count);
            let before = allocator.get_engines();

            let result = allocator.set_engine_budget(&target, *amount);

            let after = allocator.get_engines();
            let target_enabled = before
                .iter()
                .any(|engine| engine.id.as_str() == target && engine.enabled);
            prop_assert_eq!(result.is_ok(), target_enabled);
            edited |= result.is_ok();

            for (old, new) in before.iter().zip(&after) {
                if old.id.as_str() != target {
                    prop_assert_eq!(old.budget, new.budget);
                } else if target_enabled {
                    prop_assert_eq!(new.budget, clamp_amount(*amount));
                }
            }

            if !edited {
                continue;
            }
            let exact: u128 = after.iter().map(|engine| engine.budget as u128).sum();
            prop_assert_eq!(allocator.total_budget(), allocator.allocated());
            prop_assert_eq!(allocator.total_budget() as u128, exact.min(Amount::MAX as u128));
        }
    }

    /// Applying the same mode twice yields the same budgets
    #[test]
    fn set_mode_is_idempotent(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
        mode in prop_oneof![
            Just(AllocationMode::Auto),
            Just(AllocationMode::Even),
            Just(AllocationMode::Manual),
        ],
    ) {
        let mut allocator = BudgetAllocator::new(&engines, total, AllocationMode::Auto).unwrap();

        allocator.set_mode(mode);
        let once = budgets(&allocator);
        allocator.set_mode(mode);

        prop_assert_eq!(budgets(&allocator), once);
    }

    /// Auto budgets track total * roas / sum(roas) to within rounding
    #[test]
    fn auto_budgets_track_roas_weights(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
    ) {
        let allocator = BudgetAllocator::new(&engines, total, AllocationMode::Auto).unwrap();
        let snapshots = allocator.get_engines();
        let enabled: Vec<_> = snapshots.iter().filter(|engine| engine.enabled).collect();
        let roas_sum: f64 = enabled.iter().map(|engine| engine.base_roas).sum();
        prop_assume!(!enabled.is_empty() && roas_sum > 0.0);

        let total = allocator.total_budget() as f64;
        let tolerance = enabled.len() as f64 + 1.0;
        for engine in enabled {
            let exact = total * engine.base_roas / roas_sum;
            prop_assert!(
                (engine.budget as f64 - exact).abs() <= tolerance,
                "engine {} holds {} but its weight gives {}",
                engine.id,
                engine.budget,
                exact
            );
        }
    }

    /// Blended ROAS lies between the lowest and highest funded ROAS
    #[test]
    fn blended_roas_is_bounded(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
        mode in redistributing_mode(),
    ) {
        let allocator = BudgetAllocator::new(&engines, total, mode).unwrap();
        let funded: Vec<f64> = allocator
            .get_engines()
            .iter()
            .filter(|engine| engine.enabled && engine.budget > 0)
            .map(|engine| engine.base_roas)
            .collect();

        let blended = allocator.blended_roas();
        prop_assert!(blended.is_finite());

        if funded.is_empty() {
            prop_assert_eq!(blended, 0.0);
        } else {
            let min = funded.iter().copied().fold(f64::INFINITY, f64::min);
            let max = funded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(blended >= min - 1e-9 && blended <= max + 1e-9);
        }
    }

    /// Projected reach never decreases as the total grows
    #[test]
    fn reach_grows_with_budget(
        engines in engines_strategy(),
        total in 0.0f64..1_000_000.0,
        extra in 0.0f64..1_000_000.0,
    ) {
        let mut allocator = BudgetAllocator::new(&engines, total, AllocationMode::Auto).unwrap();
        let before = allocator.projected_reach();

        allocator.set_total_budget(total + extra);

        prop_assert!(allocator.projected_reach() >= before);
    }

    /// Every numeric availability lands in exactly the band its range names
    #[test]
    fn classify_follows_thresholds(value in -1_000.0f64..1_000.0) {
        let band = classify(Availability::Numeric(value));
        let expected = if value < 0.0 {
            Band::Overbooked
        } else if value <= 10.0 {
            Band::None
        } else {
            Band::Available
        };
        prop_assert_eq!(band, expected);
    }
}
