// 🪟 Projections - the outward views of a BankSwift record
//
// One view type covers all three shapes. Which fields are filled depends on
// the shape the mapper was asked for; which fields MUST be filled is checked
// by the schema validator.

use serde::{Deserialize, Serialize};

use crate::entities::BankSwift;

/// Wire view of one SWIFT code (full-branch, full-headquarters or reduced)
///
/// Every field is optional so an inbound payload with missing fields can be
/// deserialised and then reported field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCodeView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    #[serde(rename = "countryIS02", default, skip_serializing_if = "Option::is_none")]
    pub country_iso2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    #[serde(rename = "isHeadquarter", default, skip_serializing_if = "Option::is_none")]
    pub is_headquarter: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<SwiftCodeView>>,
}

impl SwiftCodeView {
    /// Reported headquarters flag; a missing flag reads as branch
    pub fn is_headquarter(&self) -> bool {
        self.is_headquarter.unwrap_or(false)
    }
}

/// All codes of one country, each as a reduced view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryGroup {
    #[serde(rename = "countryIS02")]
    pub country_iso2: String,

    #[serde(rename = "countryName")]
    pub country_name: String,

    pub branches: Vec<SwiftCodeView>,
}

// ============================================================================
// MAPPER
// ============================================================================

/// Stateless record <-> view conversions
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewMapper;

impl ViewMapper {
    pub fn new() -> Self {
        ViewMapper
    }

    /// Full view without a branch list
    pub fn to_branch_view(&self, record: &BankSwift) -> SwiftCodeView {
        SwiftCodeView {
            address: Some(record.address.clone()),
            bank_name: Some(record.bank_name.clone()),
            country_iso2: Some(record.country_iso2.clone()),
            country_name: Some(record.country_name.clone()),
            is_headquarter: Some(record.is_headquarter),
            swift_code: Some(record.swift_code.clone()),
            branches: None,
        }
    }

    /// Full view carrying the given branch list
    pub fn to_headquarters_view(
        &self,
        record: &BankSwift,
        branches: Vec<SwiftCodeView>,
    ) -> SwiftCodeView {
        SwiftCodeView {
            branches: Some(branches),
            ..self.to_branch_view(record)
        }
    }

    /// No country name, no branch list
    pub fn to_reduced_view(&self, record: &BankSwift) -> SwiftCodeView {
        SwiftCodeView {
            country_name: None,
            ..self.to_branch_view(record)
        }
    }

    /// Inbound view -> stored record. The headquarters flag is taken as sent.
    ///
    /// Missing fields become empty strings; callers validate the view first.
    pub fn to_record(&self, view: &SwiftCodeView) -> BankSwift {
        BankSwift {
            swift_code: view.swift_code.clone().unwrap_or_default(),
            country_iso2: view.country_iso2.clone().unwrap_or_default(),
            country_name: view.country_name.clone().unwrap_or_default(),
            bank_name: view.bank_name.clone().unwrap_or_default(),
            address: view.address.clone().unwrap_or_default(),
            is_headquarter: view.is_headquarter(),
        }
    }
}
