//! Monetary helpers shared by the simulator and the policies.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Months per year used to derive a monthly rate from an annual percentage.
const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Number of decimal places carried by currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Round to the nearest cent, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round down to the cent. Used for shares that must never exceed their pool.
pub fn floor_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::ToZero)
}

/// Convert an annual percentage rate (e.g. `19.9`) into a monthly fraction.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}
