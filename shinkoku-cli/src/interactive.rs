//! Interactive form mode.
//!
//! Walks the form once field by field, then drops into an edit loop: every
//! accepted edit triggers a full recompute and reprints the result table.

use anyhow::Result;
use inquire::{Select, Text};
use shinkoku_core::format::format_yen;
use shinkoku_core::{FilingType, TaxTable};

use crate::form::{Field, TaxForm};
use crate::report;

const EDIT_OPT: &str = "Edit a field";
const QUIT_OPT: &str = "Quit";

pub fn run(table: &TaxTable) -> Result<()> {
    let mut form = TaxForm::new();

    for &field in Field::all() {
        edit_field(&mut form, field)?;
        if field == Field::Expenses {
            // The paper form shows this as a read-only computed field.
            println!("Business income: {}", format_yen(form.business_income));
        }
    }

    loop {
        let result = form.calculate(table)?;
        println!("{}", report::results_table(&result, form.withholding_amount()));

        let next = Select::new("Next:", vec![EDIT_OPT, QUIT_OPT]).prompt()?;
        if next == QUIT_OPT {
            return Ok(());
        }

        let field = Select::new("Field to edit:", Field::all().to_vec()).prompt()?;
        edit_field(&mut form, field)?;
        if matches!(field, Field::GrossRevenue | Field::Expenses) {
            println!("Business income: {}", format_yen(form.business_income));
        }
    }
}

fn edit_field(
    form: &mut TaxForm,
    field: Field,
) -> Result<()> {
    match field {
        Field::FilingType => {
            let chosen = Select::new(field.label(), FilingType::all().to_vec()).prompt()?;
            form.apply(field, chosen.as_str());
        }
        _ => {
            let current = form.raw_value(field);
            let raw = Text::new(field.label()).with_default(&current).prompt()?;
            form.apply(field, &raw);
        }
    }
    Ok(())
}
