use anyhow::{bail, Result};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use plant_toxins::{
    import_path, open_database, setup_database, table_counts, verify_database, Config,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let Some(input) = args.get(2) else {
                bail!("usage: plant-toxins import <file-or-directory>");
            };
            run_import(&config, Path::new(input))?;
        }
        Some("verify") => run_verify(&config)?,
        Some("init") => run_init(&config)?,
        _ => print_usage(),
    }

    Ok(())
}

fn run_init(config: &Config) -> Result<()> {
    println!("🔧 Setting up database...");
    let conn = open_database(&config.database_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized at {:?}", config.database_path);
    Ok(())
}

fn run_import(config: &Config, input: &Path) -> Result<()> {
    println!("🌿 Plant Import - JSON → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Setup database
    println!("\n🔧 Setting up database...");
    let mut conn = open_database(&config.database_path)?;
    setup_database(&conn)?;
    println!("✓ Database ready: {:?}", config.database_path);

    // 2. Import records
    println!("\n📂 Importing {:?}...", input);
    let summary = import_path(&mut conn, input)?;
    println!("✓ Files read: {}", summary.files);
    println!("✓ Plants imported: {}", summary.plants);
    if summary.skipped > 0 {
        println!("⚠️  Skipped (no scientific name): {}", summary.skipped);
    }

    // 3. Counts
    println!("\n🔍 Verifying database...");
    for (table, count) in table_counts(&conn)? {
        println!("   {:<20} {}", table, count);
    }

    println!("\n✅ Import complete");
    Ok(())
}

fn run_verify(config: &Config) -> Result<()> {
    if !config.database_path.exists() {
        eprintln!("❌ Database not found at {:?}", config.database_path);
        eprintln!("   Run: plant-toxins import <file-or-directory>");
        std::process::exit(1);
    }

    let conn = open_database(&config.database_path)?;
    let report = verify_database(&conn)?;

    println!("🔍 Table counts");
    for (table, count) in &report.counts {
        println!("   {:<20} {}", table, count);
    }

    if report.is_complete() {
        println!("\n✅ {}", report.summary());
        return Ok(());
    }

    println!("\n⚠️  Plants with missing data:");
    for gap in &report.gaps {
        println!(
            "   #{:<5} {:<40} missing: {}",
            gap.id,
            gap.scientific_name,
            gap.missing.join(", ")
        );
    }
    println!("\n{}", report.summary());

    Ok(())
}

fn print_usage() {
    println!("plant-toxins {}", plant_toxins::VERSION);
    println!();
    println!("USAGE:");
    println!("   plant-toxins init                      create the schema");
    println!("   plant-toxins import <file-or-dir>      import processed plant JSON");
    println!("   plant-toxins verify                    report counts and data gaps");
    println!();
    println!("ENVIRONMENT:");
    println!("   PLANT_DB_PATH   database file (default: plants.db)");
    println!("   RUST_LOG        log filter (default: info)");
}
