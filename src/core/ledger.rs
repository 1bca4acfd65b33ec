use crate::core::debt_id::DebtId;
use crate::core::debt_set::{checked_total, DebtSet};
use crate::core::money::{monthly_rate, round_currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running state of one debt inside a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPosition {
    pub debt_id: DebtId,
    pub starting_balance: Decimal,
    pub remaining: Decimal,
    pub annual_rate_percent: Decimal,
    pub minimum_payment: Decimal,
    pub interest_accrued: Decimal,
    pub minimum_paid: Decimal,
    pub extra_paid: Decimal,
    /// Months in which this debt was still open when payments were made.
    pub months_active: u32,
    pub payoff_month: Option<u32>,
}

impl DebtPosition {
    pub fn is_active(&self) -> bool {
        self.payoff_month.is_none()
    }

    pub fn total_paid(&self) -> Decimal {
        self.minimum_paid + self.extra_paid
    }
}

/// Arithmetic overflow inside the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOverflow {
    /// A single position's balance or running totals left the `Decimal` range.
    Position(usize),
    /// A sum across open positions left the `Decimal` range.
    Total,
}

/// Tracks every debt's balance and payment totals across a simulation.
///
/// Positions keep the `DebtSet` order, so an index into the ledger is also
/// an index into the original input. Balances only move through the
/// methods here: interest accrual, payments, and settlement of paid-off
/// debts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffLedger {
    positions: Vec<DebtPosition>,
}

impl PayoffLedger {
    /// Open a ledger at the starting balances of `debts`.
    pub fn open(debts: &DebtSet) -> Self {
        let positions = debts
            .debts()
            .iter()
            .map(|d| DebtPosition {
                debt_id: d.id().clone(),
                starting_balance: d.remaining_balance(),
                remaining: d.remaining_balance(),
                annual_rate_percent: d.annual_interest_rate_percent(),
                minimum_payment: d.minimum_monthly_payment(),
                interest_accrued: Decimal::ZERO,
                minimum_paid: Decimal::ZERO,
                extra_paid: Decimal::ZERO,
                months_active: 0,
                payoff_month: None,
            })
            .collect();
        Self { positions }
    }

    pub fn positions(&self) -> &[DebtPosition] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> &DebtPosition {
        &self.positions[index]
    }

    pub fn into_positions(self) -> Vec<DebtPosition> {
        self.positions
    }

    /// Indices of open debts, in input order.
    pub fn active_indices(&self) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_cleared(&self) -> bool {
        self.positions.iter().all(|p| !p.is_active())
    }

    /// Sum of minimum payments over open debts.
    pub fn active_minimums(&self) -> Result<Decimal, LedgerOverflow> {
        checked_total(
            self.positions
                .iter()
                .filter(|p| p.is_active())
                .map(|p| p.minimum_payment),
        )
        .ok_or(LedgerOverflow::Total)
    }

    /// Sum of balances over open debts.
    pub fn total_remaining(&self) -> Result<Decimal, LedgerOverflow> {
        checked_total(
            self.positions
                .iter()
                .filter(|p| p.is_active())
                .map(|p| p.remaining),
        )
        .ok_or(LedgerOverflow::Total)
    }

    /// Add one month of interest to every open debt, rounded to the cent.
    ///
    /// Returns the interest added this month.
    pub fn accrue_interest(&mut self) -> Result<Decimal, LedgerOverflow> {
        let mut month_interest = Decimal::ZERO;
        for (index, position) in self.positions.iter_mut().enumerate() {
            if !position.is_active() || position.annual_rate_percent == Decimal::ZERO {
                continue;
            }
            let interest = position
                .remaining
                .checked_mul(monthly_rate(position.annual_rate_percent))
                .map(round_currency)
                .ok_or(LedgerOverflow::Position(index))?;
            position.remaining = position
                .remaining
                .checked_add(interest)
                .ok_or(LedgerOverflow::Position(index))?;
            position.interest_accrued = position
                .interest_accrued
                .checked_add(interest)
                .ok_or(LedgerOverflow::Position(index))?;
            month_interest = month_interest
                .checked_add(interest)
                .ok_or(LedgerOverflow::Position(index))?;
        }
        Ok(month_interest)
    }

    /// Pay `min(minimum, remaining)` on an open debt and count the month.
    ///
    /// Returns the amount paid.
    pub fn pay_minimum(&mut self, index: usize) -> Result<Decimal, LedgerOverflow> {
        let position = &mut self.positions[index];
        let payment = position.minimum_payment.min(position.remaining);
        position.minimum_paid = position
            .minimum_paid
            .checked_add(payment)
            .ok_or(LedgerOverflow::Position(index))?;
        position.remaining -= payment;
        position.months_active += 1;
        Ok(payment)
    }

    /// Apply up to `amount` of surplus to a debt, never past zero.
    ///
    /// Returns the amount actually applied.
    pub fn pay_extra(&mut self, index: usize, amount: Decimal) -> Result<Decimal, LedgerOverflow> {
        let position = &mut self.positions[index];
        let payment = amount.min(position.remaining).max(Decimal::ZERO);
        position.extra_paid = position
            .extra_paid
            .checked_add(payment)
            .ok_or(LedgerOverflow::Position(index))?;
        position.remaining -= payment;
        Ok(payment)
    }

    /// Close every open debt whose balance is at or below `epsilon`.
    ///
    /// Balances are clamped to exactly zero. Returns the closed indices in
    /// input order.
    pub fn settle(&mut self, month: u32, epsilon: Decimal) -> Vec<usize> {
        let mut closed = Vec::new();
        for (index, position) in self.positions.iter_mut().enumerate() {
            if position.is_active() && position.remaining <= epsilon {
                position.remaining = Decimal::ZERO;
                position.payoff_month = Some(month);
                closed.push(index);
            }
        }
        closed
    }
}
