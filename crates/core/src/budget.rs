//! Project budget utilization.
//!
//! Recomputed from spend on every read; nothing here is cached or persisted.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::types::Amount;

/// Utilization at or above this percentage is a warning.
pub const WARNING_THRESHOLD_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Utilization at or above this percentage means the budget is exceeded.
pub const EXCEEDED_THRESHOLD_PCT: Decimal = Decimal::ONE_HUNDRED;

crate::define_status_enum! {
    /// Threshold band for a utilization percentage.
    BudgetBand {
        Nominal => "NOMINAL",
        Warning => "WARNING",
        Exceeded => "EXCEEDED",
    }
}

/// Percentage of `budget` consumed by `spent`. A zero budget reports 0.
pub fn utilization(budget: Amount, spent: Amount) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }
    spent / budget * Decimal::ONE_HUNDRED
}

/// Budget left after `spent`. Negative once overspent.
pub fn remaining(budget: Amount, spent: Amount) -> Amount {
    budget - spent
}

/// `< 80` nominal, `[80, 100)` warning, `>= 100` exceeded.
pub fn classify(utilization_pct: Decimal) -> BudgetBand {
    if utilization_pct >= EXCEEDED_THRESHOLD_PCT {
        BudgetBand::Exceeded
    } else if utilization_pct >= WARNING_THRESHOLD_PCT {
        BudgetBand::Warning
    } else {
        BudgetBand::Nominal
    }
}

/// Where a project's spend comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpendBreakdown {
    /// Total of the project's non-draft invoices.
    pub invoiced: Amount,
    /// Hours x contract rate for approved timesheets no live invoice covers.
    pub uninvoiced_timesheets: Amount,
}

impl SpendBreakdown {
    pub fn total(&self) -> Amount {
        self.invoiced + self.uninvoiced_timesheets
    }
}

/// Budget utilization report for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUtilization {
    pub budget: Amount,
    pub invoiced_spend: Amount,
    pub timesheet_spend: Amount,
    pub total_spent: Amount,
    pub remaining: Amount,
    /// Rounded to two decimal places for display.
    pub utilization_pct: Decimal,
    pub band: BudgetBand,
}

impl BudgetUtilization {
    /// Band classification uses the unrounded percentage.
    pub fn compute(budget: Amount, spend: SpendBreakdown) -> Self {
        let total_spent = spend.total();
        let pct = utilization(budget, total_spent);
        Self {
            budget,
            invoiced_spend: spend.invoiced,
            timesheet_spend: spend.uninvoiced_timesheets,
            total_spent,
            remaining: remaining(budget, total_spent),
            utilization_pct: pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            band: classify(pct),
        }
    }
}
