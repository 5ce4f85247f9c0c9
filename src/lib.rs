// SWIFT Code Directory - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod db;
pub mod directory;     // Add / delete / lookup / country listing
pub mod entities;
pub mod error;
pub mod hierarchy;     // Headquarters <-> branch derivation from the code
pub mod importer;      // All-or-nothing CSV feed import
pub mod projection;
pub mod schema;        // Shape selection + validation
pub mod service;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use db::{setup_database, SqliteStore, StoreError, SwiftStore};
pub use directory::DirectoryEngine;
pub use entities::{
    institution_prefix, is_headquarters_code, BankSwift, HEADQUARTERS_MARKER,
    INSTITUTION_PREFIX_LEN,
};
pub use error::{DirectoryError, ErrorCategory, Result};
pub use hierarchy::{headquarters_of, HierarchyResolver};
pub use importer::BulkImporter;
pub use projection::{CountryGroup, SwiftCodeView, ViewMapper};
pub use schema::{classify, Context, SchemaValidator, Shape, ValidationError, ValidationResult};
pub use service::SwiftCodeService;

/// Install the tracing subscriber used by both binaries (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
