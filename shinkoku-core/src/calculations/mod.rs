//! Tax calculation modules for the self-assessment final return.
//!
//! This module provides the computation behind the final return estimate,
//! organized the way the paper worksheet lays out its steps.

pub mod common;
pub mod worksheets;

pub use worksheets::{
    IncomeTaxWorksheet, IncomeTaxWorksheetError, IncomeTaxWorksheetInput, IncomeTaxWorksheetResult,
};
