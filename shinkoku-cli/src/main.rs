use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use shinkoku_cli::form::{Field, TaxForm};
use shinkoku_cli::{interactive, report, tables};
use shinkoku_core::TaxTable;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Self-assessment income tax estimator for salary plus side-business income.
///
/// With no amount flags this walks the form interactively. With flags it
/// fills the form once, prints the result table, and exits. Amounts accept
/// comma separators and a leading ¥; anything unparseable counts as zero.
#[derive(Debug, Parser)]
struct Cli {
    /// Gross revenue from the side business, in yen.
    #[arg(long)]
    revenue: Option<String>,

    /// Deductible business expenses, in yen.
    #[arg(long)]
    expenses: Option<String>,

    /// Filing type: blue-65, blue-10 or white.
    #[arg(long, default_value = "blue-65")]
    filing: String,

    /// Salary income after the salary-income deduction, in yen.
    #[arg(long)]
    salary: Option<String>,

    /// Income tax withheld at source on salary, in yen.
    #[arg(long)]
    withheld: Option<String>,

    /// Sum of all personal income deductions, in yen.
    #[arg(long)]
    deductions: Option<String>,

    /// TOML file overriding the built-in bracket table and surtax rate.
    #[arg(long)]
    tables: Option<PathBuf>,
}

impl Cli {
    fn has_amounts(&self) -> bool {
        self.revenue.is_some()
            || self.expenses.is_some()
            || self.salary.is_some()
            || self.withheld.is_some()
            || self.deductions.is_some()
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let table = match &cli.tables {
        Some(path) => tables::load_tax_table(path)?,
        None => TaxTable::default(),
    };
    debug!("using {} tax brackets", table.brackets.len());

    if !cli.has_amounts() {
        return interactive::run(&table);
    }

    let mut form = TaxForm::new();
    form.apply(Field::FilingType, &cli.filing);
    let amounts = [
        (Field::GrossRevenue, &cli.revenue),
        (Field::Expenses, &cli.expenses),
        (Field::SalaryIncome, &cli.salary),
        (Field::Withholding, &cli.withheld),
        (Field::IncomeDeductions, &cli.deductions),
    ];
    for (field, value) in amounts {
        if let Some(value) = value {
            form.apply(field, value);
        }
    }

    let result = form.calculate(&table)?;
    println!("{}", report::results_table(&result, form.withholding_amount()));

    Ok(())
}
