use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a debt within a [`DebtSet`](crate::core::debt_set::DebtSet).
///
/// The engine never interprets the contents; it only compares identifiers
/// for uniqueness and echoes them back in payoff schedules.
///
/// # Examples
///
/// ```
/// use payoff_engine::core::debt_id::DebtId;
///
/// let card = DebtId::new("visa-4411");
/// let loan = DebtId::new("car-loan");
/// assert_ne!(card, loan);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtId(String);

impl DebtId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random identifier for generated scenarios.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DebtId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
