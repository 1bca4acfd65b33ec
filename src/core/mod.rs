pub mod debt;
pub mod debt_id;
pub mod debt_set;
pub mod ledger;
pub mod money;
