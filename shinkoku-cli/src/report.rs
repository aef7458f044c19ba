//! Result rendering for the terminal surface.

use comfy_table::{Attribute, Cell, Color, Table};
use rust_decimal::Decimal;
use shinkoku_core::calculations::IncomeTaxWorksheetResult;
use shinkoku_core::format::format_yen;

/// Builds the result table: the computed amounts plus the withholding the
/// taxpayer entered, so the final row can be read against it.
pub fn results_table(
    result: &IncomeTaxWorksheetResult,
    withholding: Decimal,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Item"), Cell::new("Amount")]);

    table.add_row(vec![
        Cell::new("Total income"),
        Cell::new(format_yen(result.total_income)),
    ]);
    table.add_row(vec![
        Cell::new("Taxable income"),
        Cell::new(format_yen(result.taxable_income)),
    ]);
    table.add_row(vec![
        Cell::new("Income tax"),
        Cell::new(format_yen(result.income_tax)),
    ]);
    table.add_row(vec![
        Cell::new("Reconstruction surtax"),
        Cell::new(format_yen(result.surtax)),
    ]);
    table.add_row(vec![
        Cell::new("Total tax"),
        Cell::new(format_yen(result.total_tax)),
    ]);
    table.add_row(vec![
        Cell::new("Withholding at source"),
        Cell::new(format_yen(withholding)),
    ]);

    let refund = result.balance_due < Decimal::ZERO;
    let label = if refund {
        Cell::new("Refund due").add_attribute(Attribute::Bold)
    } else {
        Cell::new("Balance due").add_attribute(Attribute::Bold)
    };
    let amount = Cell::new(format_yen(result.balance_due)).add_attribute(Attribute::Bold);
    let amount = if refund {
        amount.fg(Color::Green)
    } else {
        amount
    };
    table.add_row(vec![label, amount]);

    table
}
