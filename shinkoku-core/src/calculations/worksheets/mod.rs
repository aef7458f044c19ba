//! Final return worksheet implementations.

pub mod income_tax;

pub use income_tax::{
    IncomeTaxWorksheet, IncomeTaxWorksheetError, IncomeTaxWorksheetInput, IncomeTaxWorksheetResult,
};
