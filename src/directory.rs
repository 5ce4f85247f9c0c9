// 📒 Directory Engine
//
// add / delete / lookup / country listing over a SwiftStore. Uniqueness and
// existence are check-then-act; the store's key constraint has the last word.

use tracing::{debug, info, warn};

use crate::db::{StoreError, SwiftStore};
use crate::entities::BankSwift;
use crate::error::{DirectoryError, Result};
use crate::hierarchy::HierarchyResolver;
use crate::projection::{CountryGroup, SwiftCodeView, ViewMapper};

pub struct DirectoryEngine<S: SwiftStore> {
    store: S,
    resolver: HierarchyResolver,
    mapper: ViewMapper,
}

impl<S: SwiftStore> DirectoryEngine<S> {
    pub fn new(store: S, resolver: HierarchyResolver, mapper: ViewMapper) -> Self {
        DirectoryEngine {
            store,
            resolver,
            mapper,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mapper(&self) -> &ViewMapper {
        &self.mapper
    }

    /// Persist a new record; the code must not exist yet
    pub fn add(&self, record: &BankSwift) -> Result<()> {
        if self.store.exists_by_code(&record.swift_code)? {
            warn!(code = %record.swift_code, "rejected duplicate SWIFT code");
            return Err(DirectoryError::DuplicateCode(record.swift_code.clone()));
        }

        match self.store.save(record) {
            Ok(()) => {
                info!(code = %record.swift_code, "SWIFT code added");
                Ok(())
            }
            // Lost a race with a concurrent add of the same code
            Err(StoreError::DuplicateKey(code)) => Err(DirectoryError::DuplicateCode(code)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, code: &str) -> Result<()> {
        if !self.store.exists_by_code(code)? {
            warn!(code, "delete of unknown SWIFT code");
            return Err(DirectoryError::NotFound(code.to_string()));
        }

        self.store.delete_by_code(code)?;
        info!(code, "SWIFT code deleted");
        Ok(())
    }

    /// Full view of one code: headquarters carry their reduced branch list
    pub fn lookup(&self, code: &str) -> Result<SwiftCodeView> {
        let record = self
            .store
            .find_by_code(code)?
            .ok_or_else(|| DirectoryError::NotFound(code.to_string()))?;

        if record.is_headquarter {
            let branches: Vec<SwiftCodeView> = self
                .resolver
                .branches_of(&self.store, &record.swift_code)?
                .iter()
                .map(|branch| self.mapper.to_reduced_view(branch))
                .collect();

            debug!(code, branches = branches.len(), "headquarters lookup");
            Ok(self.mapper.to_headquarters_view(&record, branches))
        } else {
            debug!(code, "branch lookup");
            Ok(self.mapper.to_branch_view(&record))
        }
    }

    /// Every code of a country as reduced views
    pub fn list_by_country(&self, country_iso2: &str) -> Result<CountryGroup> {
        let records = self.store.find_by_country_code(country_iso2)?;

        let country_name = match records.first() {
            Some(first) => first.country_name.clone(),
            None => return Err(DirectoryError::NoCodesFound(country_iso2.to_string())),
        };

        let branches = records
            .iter()
            .map(|record| self.mapper.to_reduced_view(record))
            .collect();

        Ok(CountryGroup {
            country_iso2: country_iso2.to_string(),
            country_name,
            branches,
        })
    }
}
