use crate::core::debt::DebtRecord;
use crate::core::debt_id::DebtId;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised while building a [`DebtSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("monthly budget must not be negative, got {0}")]
    NegativeBudget(Decimal),
    #[error("debt {id}: remaining balance must not be negative, got {value}")]
    NegativeBalance { id: DebtId, value: Decimal },
    #[error("debt {id}: annual interest rate must not be negative, got {value}")]
    NegativeRate { id: DebtId, value: Decimal },
    #[error("debt {id}: minimum payment must not be negative, got {value}")]
    NegativeMinimum { id: DebtId, value: Decimal },
    #[error("debt id {0} appears more than once")]
    DuplicateId(DebtId),
    #[error("total {0} across all debts exceeds the representable range")]
    TotalOutOfRange(&'static str),
}

/// The validated, immutable input to one simulation run.
///
/// Holds the active debts in caller order together with the monthly
/// budget (minimums included). Construction drops records that are
/// already paid off and rejects negative amounts; it does *not* require
/// the budget to cover the minimums, since the simulator reports that
/// shortfall itself.
///
/// # Examples
///
/// ```
/// use payoff_engine::core::debt::DebtRecord;
/// use payoff_engine::core::debt_id::DebtId;
/// use payoff_engine::core::debt_set::DebtSet;
/// use rust_decimal_macros::dec;
///
/// let set = DebtSet::new(
///     vec![
///         DebtRecord::new(DebtId::new("card"), dec!(1_500), dec!(19.9), dec!(45)),
///         DebtRecord::new(DebtId::new("settled"), dec!(0), dec!(5), dec!(20)),
///     ],
///     dec!(300),
/// )
/// .unwrap();
///
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.total_minimums(), dec!(45));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DebtSet {
    debts: Vec<DebtRecord>,
    monthly_budget: Decimal,
}

impl DebtSet {
    /// Validate raw records and a budget into a debt set.
    pub fn new(
        records: impl IntoIterator<Item = DebtRecord>,
        monthly_budget: Decimal,
    ) -> Result<Self, InvalidInputError> {
        if monthly_budget < Decimal::ZERO {
            return Err(InvalidInputError::NegativeBudget(monthly_budget));
        }

        let mut seen = HashSet::new();
        let mut debts = Vec::new();
        for record in records {
            validate_record(&record)?;
            if !seen.insert(record.id().clone()) {
                return Err(InvalidInputError::DuplicateId(record.id().clone()));
            }
            if record.remaining_balance() == Decimal::ZERO {
                debug!("dropping debt {}: already paid off", record.id());
                continue;
            }
            debts.push(record);
        }

        checked_total(debts.iter().map(|d| d.remaining_balance()))
            .ok_or(InvalidInputError::TotalOutOfRange("balance"))?;
        checked_total(debts.iter().map(|d| d.minimum_monthly_payment()))
            .ok_or(InvalidInputError::TotalOutOfRange("minimum payment"))?;

        Ok(Self {
            debts,
            monthly_budget,
        })
    }

    /// Same debts under a different budget.
    pub fn with_budget(&self, monthly_budget: Decimal) -> Result<Self, InvalidInputError> {
        Self::new(self.debts.iter().cloned(), monthly_budget)
    }

    pub fn debts(&self) -> &[DebtRecord] {
        &self.debts
    }

    pub fn monthly_budget(&self) -> Decimal {
        self.monthly_budget
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn get(&self, id: &DebtId) -> Option<&DebtRecord> {
        self.debts.iter().find(|d| d.id() == id)
    }

    /// Sum of all remaining balances. Construction guarantees it fits.
    pub fn total_balance(&self) -> Decimal {
        self.debts.iter().map(|d| d.remaining_balance()).sum()
    }

    /// Sum of all minimum monthly payments. Construction guarantees it fits.
    pub fn total_minimums(&self) -> Decimal {
        self.debts.iter().map(|d| d.minimum_monthly_payment()).sum()
    }

    /// How far the budget falls short of the minimums, if at all.
    pub fn budget_shortfall(&self) -> Option<Decimal> {
        let gap = self.total_minimums() - self.monthly_budget;
        (gap > Decimal::ZERO).then_some(gap)
    }

    /// Whether any debt carries an annual rate strictly above `threshold` percent.
    pub fn has_rate_above(&self, threshold: Decimal) -> bool {
        self.debts
            .iter()
            .any(|d| d.annual_interest_rate_percent() > threshold)
    }

    /// Hash of the debts and budget, used as a cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Sum of `amounts`, or `None` on overflow.
pub(crate) fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

fn validate_record(record: &DebtRecord) -> Result<(), InvalidInputError> {
    if record.remaining_balance() < Decimal::ZERO {
        return Err(InvalidInputError::NegativeBalance {
            id: record.id().clone(),
            value: record.remaining_balance(),
        });
    }
    if record.annual_interest_rate_percent() < Decimal::ZERO {
        return Err(InvalidInputError::NegativeRate {
            id: record.id().clone(),
            value: record.annual_interest_rate_percent(),
        });
    }
    if record.minimum_monthly_payment() < Decimal::ZERO {
        return Err(InvalidInputError::NegativeMinimum {
            id: record.id().clone(),
            value: record.minimum_monthly_payment(),
        });
    }
    Ok(())
}
