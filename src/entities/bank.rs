// 🏦 Bank SWIFT Entity - one row of the directory
//
// The code is the identity. Everything about the hierarchy (headquarters vs.
// branch, which institution a branch belongs to) is read off the code itself.

use serde::{Deserialize, Serialize};

// ============================================================================
// CODE STRUCTURE
// ============================================================================

/// Trailing marker that identifies the headquarters of an institution
pub const HEADQUARTERS_MARKER: &str = "XXX";

/// Number of leading characters shared by a headquarters and its branches
pub const INSTITUTION_PREFIX_LEN: usize = 8;

/// True when the code carries the headquarters marker
pub fn is_headquarters_code(code: &str) -> bool {
    code.ends_with(HEADQUARTERS_MARKER)
}

/// First 8 characters of the code, or `None` when the code is too short
/// to carry an institution prefix.
pub fn institution_prefix(code: &str) -> Option<&str> {
    code.get(..INSTITUTION_PREFIX_LEN)
}

// ============================================================================
// BANK SWIFT RECORD
// ============================================================================

/// Canonical stored form of one bank code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSwift {
    pub swift_code: String,
    pub country_iso2: String,
    pub country_name: String,
    pub bank_name: String,
    pub address: String,
    pub is_headquarter: bool,
}

impl BankSwift {
    /// Build a record, deriving the headquarters flag from the code
    pub fn new(
        swift_code: impl Into<String>,
        country_iso2: impl Into<String>,
        country_name: impl Into<String>,
        bank_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let swift_code = swift_code.into();
        let is_headquarter = is_headquarters_code(&swift_code);

        BankSwift {
            swift_code,
            country_iso2: country_iso2.into(),
            country_name: country_name.into(),
            bank_name: bank_name.into(),
            address: address.into(),
            is_headquarter,
        }
    }

    pub fn institution_prefix(&self) -> Option<&str> {
        institution_prefix(&self.swift_code)
    }
}
