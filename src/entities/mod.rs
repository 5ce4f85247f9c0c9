// Entity Models
//
// A single entity: the bank SWIFT record. Headquarters/branch structure is
// derived from the code, never stored as a link.

pub mod bank;

pub use bank::{
    institution_prefix, is_headquarters_code, BankSwift, HEADQUARTERS_MARKER,
    INSTITUTION_PREFIX_LEN,
};
