//! Derived campaign metrics
//!
//! Blended ROAS, projected sales and projected reach are recomputed from the
//! engine list on every read. None of them can produce NaN: degenerate
//! inputs (no enabled engine, zero budget) yield 0.

use shared::{clamp_percent, Amount, EngineId, ProjectionConfig};

use super::engine::Engine;

/// Budget-weighted average base ROAS over enabled engines
///
/// `sum(budget_i * roas_i) / sum(budget_i)`, or 0 when no enabled engine
/// holds budget.
pub fn blended_roas(engines: &[Engine]) -> f64 {
    let (weighted, spend) = engines
        .iter()
        .filter(|engine| engine.enabled() && engine.budget() > 0)
        .fold((0.0_f64, 0.0_f64), |(weighted, spend), engine| {
            let budget = engine.budget() as f64;
            (weighted + budget * engine.base_roas(), spend + budget)
        });

    if spend > 0.0 {
        weighted / spend
    } else {
        0.0
    }
}

/// Expected sales: total budget times blended ROAS
///
/// Not monotone in the number of enabled engines: enabling an engine whose
/// ROAS is below the current blend lowers the result.
pub fn projected_sales(total_budget: Amount, blended_roas: f64) -> f64 {
    if total_budget == 0 || !blended_roas.is_finite() {
        return 0.0;
    }
    total_budget as f64 * blended_roas
}

/// Expected unique reach
///
/// Linear in the total budget, with a fixed uplift for every enabled engine
/// past the first. Non-decreasing in both the budget and the number of
/// enabled engines; 0 when either is 0.
pub fn projected_reach(total_budget: Amount, enabled_engines: usize, config: &ProjectionConfig) -> f64 {
    if total_budget == 0 || enabled_engines == 0 {
        return 0.0;
    }
    let channel_factor = 1.0 + config.channel_uplift.max(0.0) * (enabled_engines - 1) as f64;
    total_budget as f64 * config.reach_per_unit.max(0.0) * channel_factor
}

/// Budget as a percentage of the total, clamped to [0, 100]
pub fn share_percent(budget: Amount, total_budget: Amount) -> f64 {
    if total_budget == 0 {
        return 0.0;
    }
    clamp_percent(budget as f64 / total_budget as f64 * 100.0)
}

/// Enabled engine with budget and the highest base ROAS
///
/// Ties go to the earlier engine in list order.
pub fn top_engine(engines: &[Engine]) -> Option<&EngineId> {
    engines
        .iter()
        .filter(|engine| engine.enabled() && engine.budget() > 0)
        .fold(None::<&Engine>, |best, engine| match best {
            Some(current) if current.base_roas() >= engine.base_roas() => Some(current),
            _ => Some(engine),
        })
        .map(Engine::id)
}
