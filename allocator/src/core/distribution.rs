//! Budget redistribution across enabled engines
//!
//! Every function here is pure: it takes the engine list and a total and
//! returns one budget per engine, index-aligned with the input. Budgets are
//! whole currency units and always sum to the total exactly when at least
//! one engine is enabled. Rounding leftovers are settled on the first
//! enabled engine in id order.

use shared::{AllocationMode, Amount};

use super::engine::Engine;

/// How a set of budgets was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Equal split requested by the mode
    Even,
    /// Split proportional to base ROAS
    RoasWeighted,
    /// Auto mode with a zero ROAS sum, split evenly instead
    EvenFallback,
    /// Manual mode, budgets kept as they were
    Frozen,
    /// No enabled engines, everything is 0
    Empty,
}

/// Result of a redistribution pass
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub budgets: Vec<Amount>,
    pub distribution: Distribution,
}

/// Compute budgets for `engines` under `mode`
///
/// Manual mode returns the current budgets with disabled engines zeroed.
pub fn redistribute(engines: &[Engine], total: Amount, mode: AllocationMode) -> Split {
    if !engines.iter().any(Engine::enabled) {
        return Split {
            budgets: vec![0; engines.len()],
            distribution: Distribution::Empty,
        };
    }

    match mode {
        AllocationMode::Even => Split {
            budgets: split_even(engines, total),
            distribution: Distribution::Even,
        },
        AllocationMode::Auto => match split_by_roas(engines, total) {
            Some(budgets) => Split {
                budgets,
                distribution: Distribution::RoasWeighted,
            },
            None => Split {
                budgets: split_even(engines, total),
                distribution: Distribution::EvenFallback,
            },
        },
        AllocationMode::Manual => Split {
            budgets: engines
                .iter()
                .map(|engine| if engine.enabled() { engine.budget() } else { 0 })
                .collect(),
            distribution: Distribution::Frozen,
        },
    }
}

/// `total / n` for each enabled engine, remainder to the first in id order
pub fn split_even(engines: &[Engine], total: Amount) -> Vec<Amount> {
    let enabled_count = engines.iter().filter(|engine| engine.enabled()).count() as Amount;
    if enabled_count == 0 {
        return vec![0; engines.len()];
    }

    let share = total / enabled_count;
    let mut budgets: Vec<Amount> = engines
        .iter()
        .map(|engine| if engine.enabled() { share } else { 0 })
        .collect();

    settle_remainder(engines, total, &mut budgets);
    budgets
}

/// Budgets proportional to base ROAS, or `None` when the enabled ROAS sum is 0
pub fn split_by_roas(engines: &[Engine], total: Amount) -> Option<Vec<Amount>> {
    let weights = roas_weights(engines)?;

    let mut budgets: Vec<Amount> = weights
        .iter()
        .map(|weight| (total as f64 * weight).round() as Amount)
        .collect();

    settle_remainder(engines, total, &mut budgets);
    Some(budgets)
}

/// Normalised ROAS weights (0 for disabled engines)
///
/// `None` when no enabled engine has a positive ROAS.
pub fn roas_weights(engines: &[Engine]) -> Option<Vec<f64>> {
    let roas_sum: f64 = engines
        .iter()
        .filter(|engine| engine.enabled())
        .map(Engine::base_roas)
        .sum();

    if !(roas_sum > 0.0 && roas_sum.is_finite()) {
        return None;
    }

    Some(
        engines
            .iter()
            .map(|engine| if engine.enabled() { engine.base_roas() / roas_sum } else { 0.0 })
            .collect(),
    )
}

/// Indices of enabled engines ordered by id
fn enabled_in_id_order(engines: &[Engine]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..engines.len()).filter(|&i| engines[i].enabled()).collect();
    order.sort_by(|&a, &b| engines[a].id().cmp(engines[b].id()));
    order
}

/// Make `budgets` sum to `total` exactly
///
/// A shortfall goes to the first enabled engine in id order. An overshoot
/// (rounding up several shares) is taken back in the same order, never
/// driving a budget below 0.
fn settle_remainder(engines: &[Engine], total: Amount, budgets: &mut [Amount]) {
    let order = enabled_in_id_order(engines);
    let Some(&first) = order.first() else {
        return;
    };

    let sum: u128 = budgets.iter().map(|&b| b as u128).sum();
    let total = total as u128;

    if sum < total {
        let shortfall = (total - sum) as Amount;
        budgets[first] = budgets[first].saturating_add(shortfall);
    } else if sum > total {
        let mut excess = sum - total;
        for index in order {
            let take = excess.min(budgets[index] as u128);
            budgets[index] -= take as Amount;
            excess -= take;
            if excess == 0 {
                break;
            }
        }
    }
}
