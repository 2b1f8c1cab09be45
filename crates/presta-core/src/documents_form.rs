//! Documents form: collected files, bank details, and ordered validation.

use std::collections::HashMap;

use thiserror::Error;

use crate::bank::BankSelection;
use crate::document::{DocumentFile, DocumentKind, REQUIRED_UPLOADS};
use crate::loan::AccountType;

/// Validation failures for the documents form, in the order they are
/// checked. Nothing is uploaded when any of these fire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentsError {
    #[error("attach all required documents ({} is missing)", .0.label())]
    MissingDocument(DocumentKind),

    #[error("capture your selfie before submitting")]
    SelfieNotCaptured,

    #[error("fill in all bank details")]
    MissingBankDetails,

    #[error("enter your bank's code and name")]
    MissingOtherBankDetails,
}

/// Everything the applicant provides on the documents step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentsForm {
    files: HashMap<DocumentKind, DocumentFile>,
    selfie: Option<DocumentFile>,
    pub bank: Option<BankSelection>,
    pub agency: String,
    pub account: String,
    pub account_type: Option<AccountType>,
}

impl DocumentsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a file under its kind. The live selfie has its own slot; the
    /// other kinds land in the picked-file set.
    pub fn attach(&mut self, kind: DocumentKind, file: DocumentFile) {
        if kind == DocumentKind::Selfie {
            self.selfie = Some(file);
        } else {
            self.files.insert(kind, file);
        }
    }

    /// The file currently attached for a kind, if any.
    pub fn file(&self, kind: DocumentKind) -> Option<&DocumentFile> {
        if kind == DocumentKind::Selfie {
            self.selfie.as_ref()
        } else {
            self.files.get(&kind)
        }
    }

    pub fn has_selfie(&self) -> bool {
        self.selfie.is_some()
    }

    /// Checks the form in submission order: picked files first (in the fixed
    /// kind order), then the selfie, then bank details, then the manual bank
    /// fields when "other" is selected.
    pub fn validate(&self) -> Result<(), DocumentsError> {
        for kind in REQUIRED_UPLOADS {
            if !self.files.contains_key(kind) {
                return Err(DocumentsError::MissingDocument(*kind));
            }
        }
        if self.selfie.is_none() {
            return Err(DocumentsError::SelfieNotCaptured);
        }
        let bank = match &self.bank {
            Some(bank) => bank,
            None => return Err(DocumentsError::MissingBankDetails),
        };
        if self.agency.is_empty() || self.account.is_empty() || self.account_type.is_none() {
            return Err(DocumentsError::MissingBankDetails);
        }
        if let BankSelection::Other { code, name } = bank {
            if code.is_empty() || name.is_empty() {
                return Err(DocumentsError::MissingOtherBankDetails);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank;

    fn jpeg(name: &str) -> DocumentFile {
        DocumentFile {
            name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    fn complete_form() -> DocumentsForm {
        let mut form = DocumentsForm::new();
        for kind in REQUIRED_UPLOADS {
            form.attach(*kind, jpeg(kind.logical_name()));
        }
        form.attach(DocumentKind::Selfie, jpeg("selfie"));
        form.bank = Some(BankSelection::Listed(bank::by_code("237").unwrap()));
        form.agency = "0001".to_string();
        form.account = "12345-6".to_string();
        form.account_type = Some(AccountType::Checking);
        form
    }

    #[test]
    fn test_complete_form_passes() {
        assert_eq!(complete_form().validate(), Ok(()));
    }

    #[test]
    fn test_first_missing_document_wins() {
        let form = DocumentsForm::new();
        assert_eq!(
            form.validate(),
            Err(DocumentsError::MissingDocument(DocumentKind::RgFront))
        );

        let mut form = DocumentsForm::new();
        form.attach(DocumentKind::RgFront, jpeg("front"));
        assert_eq!(
            form.validate(),
            Err(DocumentsError::MissingDocument(DocumentKind::RgBack))
        );
    }

    #[test]
    fn test_selfie_checked_after_files() {
        let mut form = complete_form();
        form.selfie = None;
        assert_eq!(form.validate(), Err(DocumentsError::SelfieNotCaptured));
    }

    #[test]
    fn test_bank_details_must_be_complete() {
        let mut form = complete_form();
        form.bank = None;
        assert_eq!(form.validate(), Err(DocumentsError::MissingBankDetails));

        let mut form = complete_form();
        form.agency.clear();
        assert_eq!(form.validate(), Err(DocumentsError::MissingBankDetails));

        let mut form = complete_form();
        form.account_type = None;
        assert_eq!(form.validate(), Err(DocumentsError::MissingBankDetails));
    }

    #[test]
    fn test_other_bank_requires_code_and_name() {
        let mut form = complete_form();
        form.bank = Some(BankSelection::Other {
            code: String::new(),
            name: "Banco Digimais".to_string(),
        });
        assert_eq!(form.validate(), Err(DocumentsError::MissingOtherBankDetails));

        let mut form = complete_form();
        form.bank = Some(BankSelection::Other {
            code: "654".to_string(),
            name: "Banco Digimais".to_string(),
        });
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_attach_routes_selfie_to_its_slot() {
        let mut form = DocumentsForm::new();
        form.attach(DocumentKind::Selfie, jpeg("selfie"));
        assert!(form.has_selfie());
        assert!(form.file(DocumentKind::Selfie).is_some());
        assert!(form.file(DocumentKind::RgFront).is_none());
    }
}
