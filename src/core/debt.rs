use crate::core::debt_id::DebtId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single outstanding debt as supplied by the surrounding application.
///
/// Records are plain values: nothing here is validated until the record is
/// placed into a [`DebtSet`](crate::core::debt_set::DebtSet), which rejects
/// negative amounts and drops records that are already paid off.
///
/// # Examples
///
/// ```
/// use payoff_engine::core::debt::DebtRecord;
/// use payoff_engine::core::debt_id::DebtId;
/// use rust_decimal_macros::dec;
///
/// let card = DebtRecord::new(DebtId::new("visa"), dec!(2_400), dec!(21.9), dec!(60))
///     .with_creditor("Big Bank Visa");
///
/// assert_eq!(card.remaining_balance(), dec!(2_400));
/// assert_eq!(card.creditor_name(), "Big Bank Visa");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtRecord {
    id: DebtId,
    /// Display label only.
    #[serde(default)]
    creditor_name: String,
    remaining_balance: Decimal,
    annual_interest_rate_percent: Decimal,
    minimum_monthly_payment: Decimal,
}

impl DebtRecord {
    pub fn new(
        id: DebtId,
        remaining_balance: Decimal,
        annual_interest_rate_percent: Decimal,
        minimum_monthly_payment: Decimal,
    ) -> Self {
        Self {
            id,
            creditor_name: String::new(),
            remaining_balance,
            annual_interest_rate_percent,
            minimum_monthly_payment,
        }
    }

    /// Set the creditor display name.
    pub fn with_creditor(mut self, creditor_name: impl Into<String>) -> Self {
        self.creditor_name = creditor_name.into();
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> &DebtId {
        &self.id
    }

    pub fn creditor_name(&self) -> &str {
        &self.creditor_name
    }

    pub fn remaining_balance(&self) -> Decimal {
        self.remaining_balance
    }

    pub fn annual_interest_rate_percent(&self) -> Decimal {
        self.annual_interest_rate_percent
    }

    pub fn minimum_monthly_payment(&self) -> Decimal {
        self.minimum_monthly_payment
    }
}
