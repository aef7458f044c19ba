use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the progressive rate table, in the National Tax Agency's
/// quick-calculation form: `tax = taxable_income × rate − deduction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of taxable income for this bracket.
    /// `None` marks the open-ended top bracket.
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}
