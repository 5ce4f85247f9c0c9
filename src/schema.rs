// 📐 Shape Layer - Schema Validation
// Picks the shape a SWIFT code view must have and checks it

use crate::entities::BankSwift;
use crate::error::DirectoryError;
use crate::projection::SwiftCodeView;

// ============================================================================
// SHAPES & CONTEXTS
// ============================================================================

/// Validation ruleset for one representation of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Full view with a (possibly empty) branch list
    Headquarters,
    /// Full view, no branch list
    Branch,
    /// No country name, no branch list
    Reduced,
}

impl Shape {
    /// Ruleset name as it appears in validation failure messages
    pub fn name(&self) -> &str {
        match self {
            Shape::Headquarters => "BankHeadquarter",
            Shape::Branch => "BankBranch",
            Shape::Reduced => "BankInfoReduced",
        }
    }
}

/// Where the view is being produced or consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Single-code lookup
    Lookup,
    /// Entry in a headquarters' branch list
    BranchListMember,
    /// Entry in a country listing
    CountryListMember,
    /// Inbound create request
    Create,
}

/// Shape required for a record with the given role in the given context
///
/// Create always uses the branch ruleset, even for a payload that declares
/// itself a headquarters.
pub fn classify(is_headquarter: bool, context: Context) -> Shape {
    match context {
        Context::Lookup if is_headquarter => Shape::Headquarters,
        Context::Lookup => Shape::Branch,
        Context::BranchListMember | Context::CountryListMember => Shape::Reduced,
        Context::Create => Shape::Branch,
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Turn a failed check into a directory error carrying every message
pub fn into_directory_error(context: &str, errors: Vec<ValidationError>) -> DirectoryError {
    DirectoryError::validation(context, errors.into_iter().map(|e| e.message).collect())
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Stateless; construct once and hand to whoever validates
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator
    }

    /// Check a view against one shape, collecting every violation
    ///
    /// A headquarters view also checks each branch-list entry as reduced.
    pub fn validate_view(&self, view: &SwiftCodeView, shape: Shape) -> ValidationResult {
        let mut errors = Vec::new();

        if is_blank(&view.address) {
            errors.push(ValidationError::new("address", "Address is mandatory."));
        }

        if is_blank(&view.bank_name) {
            errors.push(ValidationError::new("bankName", "Bank name is mandatory."));
        }

        if is_blank(&view.country_iso2) {
            errors.push(ValidationError::new("countryIS02", "Country ISO2 is mandatory."));
        }

        match shape {
            Shape::Headquarters | Shape::Branch => {
                if is_blank(&view.country_name) {
                    errors.push(ValidationError::new("countryName", "Country name is mandatory."));
                }
            }
            Shape::Reduced => {
                if view.country_name.is_some() {
                    errors.push(ValidationError::new("countryName", "Country name must be null."));
                }
            }
        }

        if view.is_headquarter.is_none() {
            errors.push(ValidationError::new("isHeadquarter", "Headquarter is mandatory."));
        }

        if is_blank(&view.swift_code) {
            errors.push(ValidationError::new("swiftCode", "SWIFT code is mandatory."));
        }

        match shape {
            Shape::Headquarters => {
                for branch in view.branches.iter().flatten() {
                    let member_shape = classify(branch.is_headquarter(), Context::BranchListMember);
                    if let Err(mut branch_errors) = self.validate_view(branch, member_shape) {
                        errors.append(&mut branch_errors);
                    }
                }
            }
            Shape::Branch | Shape::Reduced => {
                if view.branches.is_some() {
                    errors.push(ValidationError::new("branches", "Branches must be null."));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Full entity ruleset: every field non-blank
    pub fn validate_record(&self, record: &BankSwift) -> ValidationResult {
        let mut errors = Vec::new();

        let required = [
            ("swiftCode", &record.swift_code, "SWIFT code is mandatory."),
            ("countryIS02", &record.country_iso2, "Country ISO2 code is mandatory."),
            ("countryName", &record.country_name, "Country name is mandatory."),
            ("bankName", &record.bank_name, "Bank name is mandatory."),
            ("address", &record.address, "Address is mandatory."),
        ];

        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, message));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
