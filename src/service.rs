// 🚪 Directory Service - the boundary in front of the engine
//
// Validates inbound views before they reach the engine and re-validates every
// outbound view, so a stored row that breaks today's shape rules surfaces as a
// validation failure instead of being served.

use std::io::Read;

use crate::db::SwiftStore;
use crate::directory::DirectoryEngine;
use crate::error::Result;
use crate::hierarchy::HierarchyResolver;
use crate::importer::BulkImporter;
use crate::projection::{CountryGroup, SwiftCodeView, ViewMapper};
use crate::schema::{classify, into_directory_error, Context, SchemaValidator, Shape};

pub struct SwiftCodeService<S: SwiftStore> {
    engine: DirectoryEngine<S>,
    importer: BulkImporter,
    validator: SchemaValidator,
}

impl<S: SwiftStore> SwiftCodeService<S> {
    pub fn new(store: S) -> Self {
        let validator = SchemaValidator::new();

        SwiftCodeService {
            engine: DirectoryEngine::new(store, HierarchyResolver::new(), ViewMapper::new()),
            importer: BulkImporter::new(validator),
            validator,
        }
    }

    pub fn engine(&self) -> &DirectoryEngine<S> {
        &self.engine
    }

    fn check(&self, view: &SwiftCodeView, shape: Shape, context: &str) -> Result<()> {
        self.validator
            .validate_view(view, shape)
            .map_err(|errors| {
                into_directory_error(&format!("{} {}", context, shape.name()), errors)
            })
    }

    /// Create from an inbound view, always checked against the branch shape
    pub fn add_code(&self, view: &SwiftCodeView) -> Result<()> {
        let shape = classify(view.is_headquarter(), Context::Create);
        self.check(view, shape, "Invalid input SWIFT code DTO format")?;

        let record = self.engine.mapper().to_record(view);
        self.engine.add(&record)
    }

    pub fn delete_code(&self, code: &str) -> Result<()> {
        self.engine.delete(code)
    }

    pub fn get_code(&self, code: &str) -> Result<SwiftCodeView> {
        let view = self.engine.lookup(code)?;
        let shape = classify(view.is_headquarter(), Context::Lookup);
        self.check(&view, shape, "Invalid SWIFT code DTO format")?;
        Ok(view)
    }

    pub fn get_country(&self, country_iso2: &str) -> Result<CountryGroup> {
        let group = self.engine.list_by_country(country_iso2)?;
        for member in &group.branches {
            let shape = classify(member.is_headquarter(), Context::CountryListMember);
            self.check(member, shape, "Invalid SWIFT code DTO format")?;
        }
        Ok(group)
    }

    /// Load a CSV feed into the store (all rows or none)
    pub fn import_feed<R: Read>(&self, reader: R) -> Result<usize> {
        self.importer.import(reader, self.engine.store())
    }
}
