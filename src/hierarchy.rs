// 🌳 Hierarchy Resolver
//
// Headquarters/branch relations are never stored. They are recomputed from the
// code on every call: same 8-character institution prefix = same institution.

use tracing::warn;

use crate::db::{StoreResult, SwiftStore};
use crate::entities::{institution_prefix, BankSwift, HEADQUARTERS_MARKER};

/// Code of the headquarters the given code belongs to (prefix + "XXX")
///
/// `None` when the code is too short to carry an institution prefix.
pub fn headquarters_of(code: &str) -> Option<String> {
    institution_prefix(code).map(|prefix| format!("{}{}", prefix, HEADQUARTERS_MARKER))
}

/// Derives branch lists through the store's prefix query
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyResolver;

impl HierarchyResolver {
    pub fn new() -> Self {
        HierarchyResolver
    }

    /// Every stored record sharing the institution prefix of
    /// `headquarters_code`, except the headquarters itself
    ///
    /// Pure prefix relation: records flagged as headquarters are included
    /// when they share the prefix.
    pub fn branches_of<S: SwiftStore>(
        &self,
        store: &S,
        headquarters_code: &str,
    ) -> StoreResult<Vec<BankSwift>> {
        match institution_prefix(headquarters_code) {
            Some(prefix) => store.find_by_prefix_excluding(prefix, headquarters_code),
            None => {
                warn!(code = headquarters_code, "code too short for an institution prefix");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;

    fn seed(store: &SqliteStore, codes: &[&str]) {
        let records: Vec<BankSwift> = codes
            .iter()
            .map(|code| BankSwift::new(*code, "PL", "POLAND", "Bank A", "Street 1"))
            .collect();
        store.save_all(&records).unwrap();
    }

    #[test]
    fn test_headquarters_of() {
        assert_eq!(headquarters_of("AAAABBCC001").as_deref(), Some("AAAABBCCXXX"));
        assert_eq!(headquarters_of("AAAABBCCXXX").as_deref(), Some("AAAABBCCXXX"));
        assert_eq!(headquarters_of("TESTXXX"), None);
    }

    #[test]
    fn test_branches_share_prefix_and_exclude_headquarters() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(
            &store,
            &["AAAABBCCXXX", "AAAABBCC001", "AAAABBCC002", "ZZZZBBCC001", "AAAABBCDXXX"],
        );

        let hq = "AAAABBCCXXX";
        let branches = HierarchyResolver::new().branches_of(&store, hq).unwrap();

        assert_eq!(branches.len(), 2);
        for branch in &branches {
            assert_ne!(branch.swift_code, hq);
            assert!(branch.swift_code.starts_with("AAAABBCC"));
        }
    }

    #[test]
    fn test_prefix_relation_ignores_headquarters_flag() {
        let store = SqliteStore::open_in_memory().unwrap();
        // Same prefix, both flagged as headquarters by the request that added them
        let mut sibling = BankSwift::new("AAAABBCC001", "PL", "POLAND", "Bank A", "Street 1");
        sibling.is_headquarter = true;
        store.save(&sibling).unwrap();
        seed(&store, &["AAAABBCCXXX"]);

        let branches = HierarchyResolver::new()
            .branches_of(&store, "AAAABBCCXXX")
            .unwrap();

        assert_eq!(branches, vec![sibling]);
    }

    #[test]
    fn test_short_code_has_no_branches() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store, &["TESTXXX", "TEST001"]);

        let branches = HierarchyResolver::new().branches_of(&store, "TESTXXX").unwrap();

        assert!(branches.is_empty());
    }
}
