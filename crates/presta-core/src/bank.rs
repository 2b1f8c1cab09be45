//! Bank catalog and account selection.

/// A bank offered in the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bank {
    /// Central bank compensation code, zero padded.
    pub code: &'static str,
    pub name: &'static str,
}

impl Bank {
    /// Menu label in `code - name` form.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Banks offered for disbursement, in menu order.
pub const CATALOG: &[Bank] = &[
    Bank { code: "001", name: "Banco do Brasil" },
    Bank { code: "237", name: "Bradesco" },
    Bank { code: "341", name: "Itaú Unibanco" },
    Bank { code: "104", name: "Caixa Econômica Federal" },
    Bank { code: "033", name: "Santander" },
    Bank { code: "260", name: "Nubank" },
    Bank { code: "077", name: "Banco Inter" },
    Bank { code: "336", name: "Banco C6" },
    Bank { code: "745", name: "Citibank" },
    Bank { code: "422", name: "Banco Safra" },
];

/// Looks a catalog bank up by its code.
pub fn by_code(code: &str) -> Option<&'static Bank> {
    CATALOG.iter().find(|bank| bank.code == code)
}

/// The applicant's chosen bank.
///
/// `Other` carries manually entered code and name; either may still be blank
/// until the documents form validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSelection {
    Listed(&'static Bank),
    Other { code: String, name: String },
}

impl BankSelection {
    /// The code written to the record.
    pub fn code(&self) -> &str {
        match self {
            Self::Listed(bank) => bank.code,
            Self::Other { code, .. } => code,
        }
    }

    /// The display name written to the record.
    pub fn name(&self) -> &str {
        match self {
            Self::Listed(bank) => bank.name,
            Self::Other { name, .. } => name,
        }
    }
}
