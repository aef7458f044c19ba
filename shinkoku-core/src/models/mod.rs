mod filing_type;
mod tax_bracket;
mod tax_table;

pub use filing_type::FilingType;
pub use tax_bracket::TaxBracket;
pub use tax_table::{TaxTable, TaxTableError};
