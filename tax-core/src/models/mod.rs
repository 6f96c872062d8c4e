mod allowance;
mod tax_bracket;
mod tax_filing;
mod tax_result;

pub use allowance::{
    AggregatedAllowance, AllowanceCeiling, AllowanceCeilings, AllowanceClaim, AllowanceType,
    CeilingType,
};
pub use tax_bracket::TaxBracket;
pub use tax_filing::{AllowanceInput, TaxFiling, TaxFilingInput};
pub use tax_result::{BatchTaxResult, BracketTax, TaxResult};
