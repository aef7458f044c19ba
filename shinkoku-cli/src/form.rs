//! Form state for the return estimate.
//!
//! The form holds raw field text exactly as entered; every edit goes through
//! [`TaxForm::apply`], which also keeps the derived business-income display
//! in sync. Amounts are only interpreted when the worksheet runs, and junk
//! input is treated as zero rather than rejected.

use std::fmt;

use rust_decimal::Decimal;
use shinkoku_core::calculations::{
    IncomeTaxWorksheet, IncomeTaxWorksheetError, IncomeTaxWorksheetInput, IncomeTaxWorksheetResult,
};
use shinkoku_core::{FilingType, TaxTable};

/// Editable fields of the return form, in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GrossRevenue,
    Expenses,
    FilingType,
    SalaryIncome,
    Withholding,
    IncomeDeductions,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::GrossRevenue,
            Field::Expenses,
            Field::FilingType,
            Field::SalaryIncome,
            Field::Withholding,
            Field::IncomeDeductions,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::GrossRevenue => "Gross business revenue",
            Field::Expenses => "Business expenses",
            Field::FilingType => "Filing type",
            Field::SalaryIncome => "Salary income after deduction",
            Field::Withholding => "Withholding on salary",
            Field::IncomeDeductions => "Total income deductions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient yen parsing for form input.
///
/// Trims whitespace, strips a leading `¥` and comma separators. Empty or
/// unparseable input counts as zero; the latter is logged.
pub fn parse_yen(s: &str) -> Decimal {
    let normalized = s.trim().trim_start_matches('¥').replace(',', "");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized.parse().unwrap_or_else(|e| {
        tracing::warn!(input = %s, "not an amount, treating as zero: {}", e);
        Decimal::ZERO
    })
}

/// Raw state of the return form.
///
/// Business income is not an editable field: it is recomputed from revenue
/// and expenses on every edit of either, mirroring the read-only field on
/// the paper form.
#[derive(Debug, Clone)]
pub struct TaxForm {
    pub gross_revenue: String,
    pub expenses: String,
    /// Derived display value: revenue minus expenses, before the allowance.
    pub business_income: Decimal,
    pub filing_type: FilingType,
    pub salary_income: String,
    pub withholding: String,
    pub income_deductions: String,
}

impl Default for TaxForm {
    fn default() -> Self {
        Self {
            gross_revenue: String::new(),
            expenses: String::new(),
            business_income: Decimal::ZERO,
            filing_type: FilingType::default(),
            salary_income: String::new(),
            withholding: String::new(),
            income_deductions: String::new(),
        }
    }
}

impl TaxForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one `(field, value)` change notification from the surface.
    ///
    /// Editing revenue or expenses recomputes the derived business income in
    /// the same update. An unrecognized filing-type code falls back to the
    /// white return, which carries no allowance.
    pub fn apply(
        &mut self,
        field: Field,
        raw: &str,
    ) {
        match field {
            Field::GrossRevenue => {
                self.gross_revenue = raw.to_string();
                self.sync_business_income();
            }
            Field::Expenses => {
                self.expenses = raw.to_string();
                self.sync_business_income();
            }
            Field::FilingType => {
                self.filing_type = FilingType::parse(raw.trim()).unwrap_or_else(|| {
                    tracing::warn!(input = %raw, "unknown filing type, assuming white return");
                    FilingType::White
                });
            }
            Field::SalaryIncome => self.salary_income = raw.to_string(),
            Field::Withholding => self.withholding = raw.to_string(),
            Field::IncomeDeductions => self.income_deductions = raw.to_string(),
        }
    }

    /// Raw text currently held for a field, used to pre-fill edit prompts.
    pub fn raw_value(
        &self,
        field: Field,
    ) -> String {
        match field {
            Field::GrossRevenue => self.gross_revenue.clone(),
            Field::Expenses => self.expenses.clone(),
            Field::FilingType => self.filing_type.as_str().to_string(),
            Field::SalaryIncome => self.salary_income.clone(),
            Field::Withholding => self.withholding.clone(),
            Field::IncomeDeductions => self.income_deductions.clone(),
        }
    }

    /// Withholding as an amount, for echoing in the report.
    pub fn withholding_amount(&self) -> Decimal {
        parse_yen(&self.withholding)
    }

    fn sync_business_income(&mut self) {
        self.business_income = parse_yen(&self.gross_revenue) - parse_yen(&self.expenses);
    }

    fn to_input(&self) -> IncomeTaxWorksheetInput {
        IncomeTaxWorksheetInput {
            gross_revenue: parse_yen(&self.gross_revenue),
            expenses: parse_yen(&self.expenses),
            filing_type: self.filing_type,
            salary_income: parse_yen(&self.salary_income),
            withholding: parse_yen(&self.withholding),
            income_deductions: parse_yen(&self.income_deductions),
        }
    }

    /// Runs the full recompute over the current form state.
    pub fn calculate(
        &self,
        table: &TaxTable,
    ) -> Result<IncomeTaxWorksheetResult, IncomeTaxWorksheetError> {
        IncomeTaxWorksheet::new(table).calculate(&self.to_input())
    }
}
