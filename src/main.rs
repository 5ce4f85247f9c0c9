use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use swift_directory::{
    headquarters_of, init_tracing, Config, SqliteStore, SwiftCodeService, SwiftStore,
};

const USAGE: &str = "usage: swift-directory \
    <import <csv> | lookup <code> | country <iso2> | delete <code> | count>";

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    let store = SqliteStore::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    let service = SwiftCodeService::new(store);

    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("import"), Some(path)) => run_import(&service, Path::new(path)),
        (Some("lookup"), Some(code)) => run_lookup(&service, code),
        (Some("country"), Some(iso2)) => run_country(&service, iso2),
        (Some("delete"), Some(code)) => {
            service.delete_code(code)?;
            println!("✓ Deleted {}", code);
            Ok(())
        }
        (Some("count"), None) => {
            println!("{}", service.engine().store().count()?);
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn run_import(service: &SwiftCodeService<SqliteStore>, csv_path: &Path) -> Result<()> {
    println!("📂 Importing SWIFT codes from {:?}", csv_path);

    let file = File::open(csv_path).context("Failed to open CSV file")?;
    let imported = service.import_feed(BufReader::new(file))?;
    let count = service.engine().store().count()?;

    println!("✓ Imported {} rows", imported);
    println!("✓ Database contains {} SWIFT codes", count);
    Ok(())
}

fn run_lookup(service: &SwiftCodeService<SqliteStore>, code: &str) -> Result<()> {
    let view = service.get_code(code)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    if !view.is_headquarter() {
        if let Some(hq) = headquarters_of(code) {
            println!("↳ headquarters: {}", hq);
        }
    }
    Ok(())
}

fn run_country(service: &SwiftCodeService<SqliteStore>, iso2: &str) -> Result<()> {
    let group = service.get_country(iso2)?;
    println!("{}", serde_json::to_string_pretty(&group)?);
    Ok(())
}
