use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;

/// Errors raised by [`TaxTable::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    /// The table contains no brackets at all.
    #[error("tax table has no brackets")]
    Empty,

    /// Only the last bracket may leave its upper limit open.
    #[error("bracket {0} has no upper limit but is not the last bracket")]
    OpenBracketNotLast(usize),

    /// The table must end with an open-ended bracket so every income matches.
    #[error("last bracket must have no upper limit")]
    MissingOpenBracket,

    /// Upper limits must be strictly ascending.
    #[error("bracket {0} upper limit must be greater than the previous bracket's")]
    LimitsNotAscending(usize),

    /// A bracket rate must be between 0 and 1.
    #[error("bracket {0} rate must be between 0 and 1, got {1}")]
    InvalidRate(usize, Decimal),

    /// A bracket deduction must be non-negative.
    #[error("bracket {0} deduction must be non-negative, got {1}")]
    InvalidDeduction(usize, Decimal),

    /// The surtax rate must be between 0 and 1.
    #[error("surtax rate must be between 0 and 1, got {0}")]
    InvalidSurtaxRate(Decimal),
}

/// Statutory parameters of one rate regime: the progressive bracket table
/// plus the reconstruction surtax rate levied on top of income tax.
///
/// [`TaxTable::default`] returns the rates in force since 2015 (with the
/// 2.1% reconstruction surtax that applies through 2037). An alternative
/// table can be deserialized from TOML and checked with
/// [`TaxTable::validate`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    /// Brackets sorted by ascending upper limit; the last one is open-ended.
    pub brackets: Vec<TaxBracket>,
    /// Reconstruction surtax rate applied to the computed income tax.
    pub surtax_rate: Decimal,
}

impl Default for TaxTable {
    fn default() -> Self {
        let bracket = |limit: Option<i64>, rate: Decimal, deduction: i64| TaxBracket {
            upper_limit: limit.map(Decimal::from),
            rate,
            deduction: Decimal::from(deduction),
        };

        Self {
            brackets: vec![
                bracket(Some(1_950_000), Decimal::new(5, 2), 0),
                bracket(Some(3_300_000), Decimal::new(10, 2), 97_500),
                bracket(Some(6_950_000), Decimal::new(20, 2), 427_500),
                bracket(Some(9_000_000), Decimal::new(23, 2), 636_000),
                bracket(Some(18_000_000), Decimal::new(33, 2), 1_536_000),
                bracket(Some(40_000_000), Decimal::new(40, 2), 2_796_000),
                bracket(None, Decimal::new(45, 2), 4_796_000),
            ],
            surtax_rate: Decimal::new(21, 3),
        }
    }
}

impl TaxTable {
    /// Checks the structural constraints the bracket lookup relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxTableError`] encountered, scanning brackets in
    /// order.
    pub fn validate(&self) -> Result<(), TaxTableError> {
        if self.brackets.is_empty() {
            return Err(TaxTableError::Empty);
        }

        let last = self.brackets.len() - 1;
        let mut previous_limit: Option<Decimal> = None;

        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(TaxTableError::InvalidRate(i, bracket.rate));
            }
            if bracket.deduction < Decimal::ZERO {
                return Err(TaxTableError::InvalidDeduction(i, bracket.deduction));
            }

            match bracket.upper_limit {
                None if i != last => return Err(TaxTableError::OpenBracketNotLast(i)),
                None => {}
                Some(limit) => {
                    if let Some(previous) = previous_limit {
                        if limit <= previous {
                            return Err(TaxTableError::LimitsNotAscending(i));
                        }
                    }
                    previous_limit = Some(limit);
                }
            }
        }

        if self.brackets[last].upper_limit.is_some() {
            return Err(TaxTableError::MissingOpenBracket);
        }

        if self.surtax_rate < Decimal::ZERO || self.surtax_rate >= Decimal::ONE {
            return Err(TaxTableError::InvalidSurtaxRate(self.surtax_rate));
        }

        Ok(())
    }
}
