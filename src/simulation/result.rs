use crate::core::debt_id::DebtId;
use crate::core::ledger::DebtPosition;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffOutcome {
    /// Every debt cleared; `months` is the month the last one cleared.
    DebtFree { months: u32 },
    /// The horizon ran out with debts still open.
    Unresolved { horizon: u32 },
}

/// A debt leaving the books.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayoffEntry {
    pub debt_id: DebtId,
    pub month: u32,
}

/// Per-debt totals over the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtOutcome {
    pub debt_id: DebtId,
    pub starting_balance: Decimal,
    pub interest_accrued: Decimal,
    pub minimum_paid: Decimal,
    pub extra_paid: Decimal,
    pub months_active: u32,
    pub payoff_month: Option<u32>,
    pub final_balance: Decimal,
}

impl DebtOutcome {
    pub fn total_paid(&self) -> Decimal {
        self.minimum_paid + self.extra_paid
    }
}

impl From<DebtPosition> for DebtOutcome {
    fn from(position: DebtPosition) -> Self {
        Self {
            debt_id: position.debt_id,
            starting_balance: position.starting_balance,
            interest_accrued: position.interest_accrued,
            minimum_paid: position.minimum_paid,
            extra_paid: position.extra_paid,
            months_active: position.months_active,
            payoff_month: position.payoff_month,
            final_balance: position.remaining,
        }
    }
}

/// One month of the run, recorded when the configuration asks for a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSnapshot {
    pub month: u32,
    pub interest: Decimal,
    pub paid: Decimal,
    /// Outstanding balance across all debts after this month's payments.
    pub remaining: Decimal,
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationResult {
    pub(crate) strategy: String,
    pub(crate) outcome: PayoffOutcome,
    pub(crate) total_interest: Decimal,
    pub(crate) total_paid: Decimal,
    pub(crate) payoff_schedule: Vec<PayoffEntry>,
    pub(crate) debts: Vec<DebtOutcome>,
    pub(crate) initial_shortfall: Decimal,
    pub(crate) shortfall_months: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) timeline: Vec<MonthSnapshot>,
}

impl SimulationResult {
    /// Name of the policy that produced this result.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn outcome(&self) -> PayoffOutcome {
        self.outcome
    }

    pub fn is_debt_free(&self) -> bool {
        matches!(self.outcome, PayoffOutcome::DebtFree { .. })
    }

    /// Months to debt-free, or `None` if unresolved within the horizon.
    pub fn total_months(&self) -> Option<u32> {
        match self.outcome {
            PayoffOutcome::DebtFree { months } => Some(months),
            PayoffOutcome::Unresolved { .. } => None,
        }
    }

    pub fn total_interest(&self) -> Decimal {
        self.total_interest
    }

    pub fn total_paid(&self) -> Decimal {
        self.total_paid
    }

    /// Debts in the order they were cleared.
    pub fn payoff_schedule(&self) -> &[PayoffEntry] {
        &self.payoff_schedule
    }

    /// Month in which `id` was cleared, if it was.
    pub fn payoff_month(&self, id: &DebtId) -> Option<u32> {
        self.payoff_schedule
            .iter()
            .find(|entry| &entry.debt_id == id)
            .map(|entry| entry.month)
    }

    /// Per-debt totals, in input order.
    pub fn debts(&self) -> &[DebtOutcome] {
        &self.debts
    }

    pub fn debt(&self, id: &DebtId) -> Option<&DebtOutcome> {
        self.debts.iter().find(|d| &d.debt_id == id)
    }

    /// Amount by which month-one minimums exceeded the budget (zero if covered).
    pub fn initial_shortfall(&self) -> Decimal {
        self.initial_shortfall
    }

    /// Months in which open minimums exceeded the budget.
    pub fn shortfall_months(&self) -> u32 {
        self.shortfall_months
    }

    pub fn timeline(&self) -> &[MonthSnapshot] {
        &self.timeline
    }
}

impl fmt::Display for PayoffOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffOutcome::DebtFree { months } => write!(f, "debt-free in {} months", months),
            PayoffOutcome::Unresolved { horizon } => {
                write!(f, "not debt-free within {} months", horizon)
            }
        }
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.strategy)?;
        writeln!(f, "Outcome:        {}", self.outcome)?;
        writeln!(f, "Total Interest: {}", self.total_interest)?;
        writeln!(f, "Total Paid:     {}", self.total_paid)?;
        if self.initial_shortfall > Decimal::ZERO {
            writeln!(
                f,
                "Shortfall:      {} below minimums ({} months short)",
                self.initial_shortfall, self.shortfall_months
            )?;
        }

        writeln!(f, "\nPayoff Order:")?;
        for entry in &self.payoff_schedule {
            writeln!(f, "  month {:>3}: {}", entry.month, entry.debt_id)?;
        }
        for debt in self.debts.iter().filter(|d| d.payoff_month.is_none()) {
            writeln!(f, "  open     : {} ({} left)", debt.debt_id, debt.final_balance)?;
        }
        Ok(())
    }
}
