//! Final return computation for salary plus side-business income.
//!
//! This module implements the income-tax portion of the Japanese
//! self-assessment return (確定申告) for a taxpayer with employment income
//! and a side business, producing the amount payable with the return (or
//! the refund when withholding already covers it).
//!
//! # Worksheet Structure
//!
//! The computation follows these steps:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Business income: gross revenue − expenses |
//! | 2    | Filing-type allowance subtracted, floored at zero |
//! | 3    | Total income: business income after allowance + salary income |
//! | 4    | Taxable income: total income − income deductions, floored at zero |
//! | 5    | Income tax from the quick-calculation bracket table, rounded down |
//! | 6    | Reconstruction surtax: income tax × 2.1%, rounded down |
//! | 7    | Total tax: income tax + surtax |
//! | 8    | Balance due: total tax − withholding (negative means a refund) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use shinkoku_core::calculations::{IncomeTaxWorksheet, IncomeTaxWorksheetInput};
//! use shinkoku_core::{FilingType, TaxTable};
//!
//! let table = TaxTable::default();
//! let input = IncomeTaxWorksheetInput {
//!     gross_revenue: dec!(3000000),
//!     expenses: dec!(500000),
//!     filing_type: FilingType::BlueFull,
//!     salary_income: dec!(0),
//!     withholding: dec!(0),
//!     income_deductions: dec!(480000),
//! };
//!
//! let worksheet = IncomeTaxWorksheet::new(&table);
//! let result = worksheet.calculate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(1370000));
//! assert_eq!(result.income_tax, dec!(68500));
//! assert_eq!(result.surtax, dec!(1438));
//! assert_eq!(result.balance_due, dec!(69938));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{floor_yen, max};
use crate::{FilingType, TaxTable};

/// Errors that can occur during final return calculations.
///
/// The built-in table never triggers these; they guard tables loaded from
/// configuration files.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeTaxWorksheetError {
    /// No tax brackets were provided for the calculation.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// No tax bracket found for the given taxable income.
    #[error("no tax bracket found for taxable income {0}")]
    NoMatchingBracket(Decimal),
}

/// Input values for the final return worksheet.
///
/// All amounts are yen. Nothing here is validated; negative intermediate
/// values are clamped at the two floor points of the worksheet and
/// propagate unclamped everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxWorksheetInput {
    /// Gross revenue from the side business (総収入金額).
    pub gross_revenue: Decimal,

    /// Deductible business expenses (必要経費).
    pub expenses: Decimal,

    /// Filing type, which fixes the allowance against business income.
    pub filing_type: FilingType,

    /// Employment income after the salary-income deduction
    /// (給与所得控除後の金額), taken from the withholding slip.
    pub salary_income: Decimal,

    /// Income tax already withheld at source on salary (源泉徴収税額).
    pub withholding: Decimal,

    /// Sum of all personal income deductions (所得控除の合計額): basic,
    /// social insurance, life insurance, spousal and so on, pre-aggregated.
    pub income_deductions: Decimal,
}

/// Result of the final return worksheet.
///
/// Every field is recomputed together on each calculation pass; no field is
/// ever updated independently of the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxWorksheetResult {
    /// Total income: business income after the filing allowance plus salary.
    pub total_income: Decimal,

    /// Taxable income after personal deductions, never negative.
    pub taxable_income: Decimal,

    /// Income tax from the bracket table, rounded down to whole yen.
    pub income_tax: Decimal,

    /// Reconstruction surtax on the income tax, rounded down to whole yen.
    pub surtax: Decimal,

    /// Income tax plus surtax.
    pub total_tax: Decimal,

    /// Amount payable with the return. Negative when withholding exceeds
    /// the total tax, meaning a refund; deliberately not clamped.
    pub balance_due: Decimal,
}

/// Calculator for the final return worksheet.
///
/// Borrows the statutory table so one table can serve any number of
/// recalculations as form fields change.
#[derive(Debug, Clone)]
pub struct IncomeTaxWorksheet<'a> {
    table: &'a TaxTable,
}

impl<'a> IncomeTaxWorksheet<'a> {
    /// Creates a worksheet over the given statutory table.
    ///
    /// Brackets must be sorted by ascending upper limit with an open-ended
    /// last bracket; [`TaxTable::validate`] checks this for loaded tables.
    pub fn new(table: &'a TaxTable) -> Self {
        Self { table }
    }

    /// Calculates the complete final return worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeTaxWorksheetError`] if the bracket table is empty or
    /// leaves the taxable income uncovered.
    pub fn calculate(
        &self,
        input: &IncomeTaxWorksheetInput,
    ) -> Result<IncomeTaxWorksheetResult, IncomeTaxWorksheetError> {
        if self.table.brackets.is_empty() {
            return Err(IncomeTaxWorksheetError::NoTaxBrackets);
        }

        let business_income = self.business_income(input.gross_revenue, input.expenses);
        let business_income_after_allowance =
            self.apply_filing_allowance(business_income, input.filing_type);

        let total_income = self.total_income(business_income_after_allowance, input.salary_income);
        let taxable_income = self.taxable_income(total_income, input.income_deductions);

        let income_tax = self.income_tax(taxable_income)?;
        let surtax = self.surtax(income_tax);
        let total_tax = self.total_tax(income_tax, surtax);
        let balance_due = self.balance_due(total_tax, input.withholding);

        debug!(%taxable_income, %income_tax, %balance_due, "final return computed");

        Ok(IncomeTaxWorksheetResult {
            total_income,
            taxable_income,
            income_tax,
            surtax,
            total_tax,
            balance_due,
        })
    }

    /// Business income before the filing allowance. May be negative when
    /// expenses exceed revenue; the clamp happens one step later.
    fn business_income(
        &self,
        gross_revenue: Decimal,
        expenses: Decimal,
    ) -> Decimal {
        gross_revenue - expenses
    }

    /// Subtracts the filing-type allowance, floored at zero.
    fn apply_filing_allowance(
        &self,
        business_income: Decimal,
        filing_type: FilingType,
    ) -> Decimal {
        max(business_income - filing_type.allowance(), Decimal::ZERO)
    }

    /// Total income across both income categories.
    fn total_income(
        &self,
        business_income_after_allowance: Decimal,
        salary_income: Decimal,
    ) -> Decimal {
        business_income_after_allowance + salary_income
    }

    /// Taxable income after personal deductions, floored at zero.
    fn taxable_income(
        &self,
        total_income: Decimal,
        income_deductions: Decimal,
    ) -> Decimal {
        max(total_income - income_deductions, Decimal::ZERO)
    }

    /// Income tax from the quick-calculation table: the first bracket whose
    /// upper limit covers the taxable income (limits are inclusive).
    fn income_tax(
        &self,
        taxable_income: Decimal,
    ) -> Result<Decimal, IncomeTaxWorksheetError> {
        let bracket = self
            .table
            .brackets
            .iter()
            .find(|b| b.upper_limit.map_or(true, |limit| taxable_income <= limit))
            .ok_or(IncomeTaxWorksheetError::NoMatchingBracket(taxable_income))?;

        Ok(floor_yen(taxable_income * bracket.rate - bracket.deduction))
    }

    /// Reconstruction surtax on the income tax, rounded down.
    fn surtax(
        &self,
        income_tax: Decimal,
    ) -> Decimal {
        floor_yen(income_tax * self.table.surtax_rate)
    }

    /// Income tax plus surtax.
    fn total_tax(
        &self,
        income_tax: Decimal,
        surtax: Decimal,
    ) -> Decimal {
        income_tax + surtax
    }

    /// Amount payable with the return; negative means a refund and is
    /// intentionally not clamped.
    fn balance_due(
        &self,
        total_tax: Decimal,
        withholding: Decimal,
    ) -> Decimal {
        total_tax - withholding
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxBracket;

    fn zero_input() -> IncomeTaxWorksheetInput {
        IncomeTaxWorksheetInput {
            gross_revenue: dec!(0),
            expenses: dec!(0),
            filing_type: FilingType::White,
            salary_income: dec!(0),
            withholding: dec!(0),
            income_deductions: dec!(0),
        }
    }

    fn side_business_input() -> IncomeTaxWorksheetInput {
        IncomeTaxWorksheetInput {
            gross_revenue: dec!(3000000),
            expenses: dec!(500000),
            filing_type: FilingType::BlueFull,
            salary_income: dec!(0),
            withholding: dec!(0),
            income_deductions: dec!(480000),
        }
    }

    // =========================================================================
    // apply_filing_allowance tests
    // =========================================================================

    #[test]
    fn filing_allowance_subtracts_blue_full_amount() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.apply_filing_allowance(dec!(2500000), FilingType::BlueFull);

        assert_eq!(result, dec!(1850000));
    }

    #[test]
    fn filing_allowance_clamps_at_zero() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.apply_filing_allowance(dec!(400000), FilingType::BlueFull);

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn filing_allowance_clamps_negative_business_income() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        // Expenses exceeded revenue upstream.
        let result = worksheet.apply_filing_allowance(dec!(-200000), FilingType::White);

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn filing_allowance_white_subtracts_nothing() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.apply_filing_allowance(dec!(2500000), FilingType::White);

        assert_eq!(result, dec!(2500000));
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_deductions() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.taxable_income(dec!(1850000), dec!(480000));

        assert_eq!(result, dec!(1370000));
    }

    #[test]
    fn taxable_income_clamps_when_deductions_exceed_income() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.taxable_income(dec!(400000), dec!(480000));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // income_tax tests
    // =========================================================================

    #[test]
    fn income_tax_zero_income_is_zero() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(0));

        assert_eq!(result, Ok(dec!(0)));
    }

    #[test]
    fn income_tax_first_bracket() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(1370000));

        // 1,370,000 × 5% = 68,500
        assert_eq!(result, Ok(dec!(68500)));
    }

    #[test]
    fn income_tax_bracket_limit_is_inclusive() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(1950000));

        // Exactly at the limit stays in the 5% bracket: 1,950,000 × 5% = 97,500
        assert_eq!(result, Ok(dec!(97500)));
    }

    #[test]
    fn income_tax_just_above_limit_uses_next_bracket() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(1950001));

        // 1,950,001 × 10% − 97,500 = 97,500.1, floored
        assert_eq!(result, Ok(dec!(97500)));
    }

    #[test]
    fn income_tax_middle_bracket() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(5000000));

        // 5,000,000 × 20% − 427,500 = 572,500
        assert_eq!(result, Ok(dec!(572500)));
    }

    #[test]
    fn income_tax_top_bracket_is_open_ended() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(50000000));

        // 50,000,000 × 45% − 4,796,000 = 17,704,000
        assert_eq!(result, Ok(dec!(17704000)));
    }

    #[test]
    fn income_tax_floors_fractional_yen() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(1000001));

        // 1,000,001 × 5% = 50,000.05, floored
        assert_eq!(result, Ok(dec!(50000)));
    }

    #[test]
    fn income_tax_is_monotonic_across_brackets() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let incomes = [
            dec!(0),
            dec!(1000000),
            dec!(1950000),
            dec!(1950001),
            dec!(3300000),
            dec!(3300001),
            dec!(6950000),
            dec!(9000000),
            dec!(18000000),
            dec!(40000000),
            dec!(40000001),
            dec!(100000000),
        ];

        let mut previous = dec!(0);
        for income in incomes {
            let tax = worksheet.income_tax(income).unwrap();
            assert!(
                tax >= previous,
                "tax decreased from {previous} to {tax} at income {income}"
            );
            previous = tax;
        }
    }

    #[test]
    fn income_tax_errors_when_no_bracket_covers_income() {
        let table = TaxTable {
            brackets: vec![TaxBracket {
                upper_limit: Some(dec!(1000)),
                rate: dec!(0.05),
                deduction: dec!(0),
            }],
            surtax_rate: dec!(0.021),
        };
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.income_tax(dec!(2000));

        assert_eq!(
            result,
            Err(IncomeTaxWorksheetError::NoMatchingBracket(dec!(2000)))
        );
    }

    #[test]
    fn calculate_errors_on_empty_bracket_table() {
        let table = TaxTable {
            brackets: vec![],
            surtax_rate: dec!(0.021),
        };
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.calculate(&zero_input());

        assert_eq!(result, Err(IncomeTaxWorksheetError::NoTaxBrackets));
    }

    // =========================================================================
    // surtax tests
    // =========================================================================

    #[test]
    fn surtax_is_floored_product_of_rate() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        // 68,500 × 2.1% = 1,438.5, floored
        assert_eq!(worksheet.surtax(dec!(68500)), dec!(1438));
    }

    #[test]
    fn surtax_of_zero_tax_is_zero() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        assert_eq!(worksheet.surtax(dec!(0)), dec!(0));
    }

    // =========================================================================
    // balance_due tests
    // =========================================================================

    #[test]
    fn balance_due_subtracts_withholding() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.balance_due(dec!(69938), dec!(20000));

        assert_eq!(result, dec!(49938));
    }

    #[test]
    fn balance_due_goes_negative_for_refunds() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.balance_due(dec!(69938), dec!(100000));

        assert_eq!(result, dec!(-30062));
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_all_zero_inputs_yield_all_zero_results() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.calculate(&zero_input()).unwrap();

        assert_eq!(result.total_income, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.surtax, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.balance_due, dec!(0));
    }

    #[test]
    fn calculate_blue_full_side_business() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);

        let result = worksheet.calculate(&side_business_input()).unwrap();

        // Business income 2,500,000; allowance leaves 1,850,000;
        // deductions leave 1,370,000 taxable.
        assert_eq!(result.total_income, dec!(1850000));
        assert_eq!(result.taxable_income, dec!(1370000));
        assert_eq!(result.income_tax, dec!(68500));
        assert_eq!(result.surtax, dec!(1438));
        assert_eq!(result.total_tax, dec!(69938));
        assert_eq!(result.balance_due, dec!(69938));
    }

    #[test]
    fn calculate_salary_plus_side_business() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);
        let mut input = side_business_input();
        input.salary_income = dec!(4000000);

        let result = worksheet.calculate(&input).unwrap();

        // Total income 5,850,000; taxable 5,370,000 lands in the 20% bracket:
        // 5,370,000 × 20% − 427,500 = 646,500
        assert_eq!(result.total_income, dec!(5850000));
        assert_eq!(result.taxable_income, dec!(5370000));
        assert_eq!(result.income_tax, dec!(646500));
        assert_eq!(result.surtax, dec!(13576));
        assert_eq!(result.total_tax, dec!(660076));
    }

    #[test]
    fn calculate_withholding_exceeding_tax_yields_refund() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);
        let mut input = side_business_input();
        input.withholding = dec!(100000);

        let result = worksheet.calculate(&input).unwrap();

        assert_eq!(result.total_tax, dec!(69938));
        assert_eq!(result.balance_due, dec!(-30062));
    }

    #[test]
    fn calculate_expenses_exceeding_revenue_floor_at_zero() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);
        let mut input = zero_input();
        input.gross_revenue = dec!(300000);
        input.expenses = dec!(500000);

        let result = worksheet.calculate(&input).unwrap();

        assert_eq!(result.total_income, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.income_tax, dec!(0));
    }

    #[test]
    fn calculate_is_deterministic_for_identical_inputs() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);
        let input = side_business_input();

        let first = worksheet.calculate(&input).unwrap();
        let second = worksheet.calculate(&input).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn calculate_total_tax_is_exact_sum_of_parts() {
        let table = TaxTable::default();
        let worksheet = IncomeTaxWorksheet::new(&table);
        let mut input = side_business_input();
        input.salary_income = dec!(6000000);

        let result = worksheet.calculate(&input).unwrap();

        assert_eq!(result.total_tax, result.income_tax + result.surtax);
    }
}
