use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Tables in dependency order (parents first)
pub const TABLES: [&str; 10] = [
    "plants",
    "toxic_parts",
    "toxins",
    "symptoms",
    "treatments",
    "plant_toxic_parts",
    "plant_toxins",
    "plant_symptoms",
    "plant_treatments",
    "sources",
];

/// Open a database file and apply connection pragmas
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;

    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(conn)
}

/// In-memory database with the full schema (tests, dry runs)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Reference entities
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS plants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            common_name TEXT NOT NULL,
            scientific_name TEXT NOT NULL UNIQUE,
            family TEXT,
            description TEXT,
            image_url TEXT,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS toxic_parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS toxins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            chemical_formula TEXT,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS symptoms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            body_system TEXT
        );

        CREATE TABLE IF NOT EXISTS treatments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        );",
    )
    .context("Failed to create entity tables")?;

    // ==========================================================================
    // Associations (composite keys, cascade from both parents)
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS plant_toxic_parts (
            plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
            toxic_part_id INTEGER NOT NULL REFERENCES toxic_parts(id) ON DELETE CASCADE,
            PRIMARY KEY (plant_id, toxic_part_id)
        );

        CREATE TABLE IF NOT EXISTS plant_toxins (
            plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
            toxin_id INTEGER NOT NULL REFERENCES toxins(id) ON DELETE CASCADE,
            concentration_notes TEXT,
            PRIMARY KEY (plant_id, toxin_id)
        );

        CREATE TABLE IF NOT EXISTS plant_symptoms (
            plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
            symptom_id INTEGER NOT NULL REFERENCES symptoms(id) ON DELETE CASCADE,
            severity TEXT NOT NULL DEFAULT 'moderate'
                CHECK (severity IN ('mild', 'moderate', 'severe', 'fatal')),
            onset TEXT,
            notes TEXT,
            PRIMARY KEY (plant_id, symptom_id)
        );

        CREATE TABLE IF NOT EXISTS plant_treatments (
            plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
            treatment_id INTEGER NOT NULL REFERENCES treatments(id) ON DELETE CASCADE,
            priority INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            PRIMARY KEY (plant_id, treatment_id)
        );

        CREATE TABLE IF NOT EXISTS sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            url TEXT,
            accessed_at TEXT
        );",
    )
    .context("Failed to create association tables")?;

    // ==========================================================================
    // Indexes for reverse lookups
    // ==========================================================================
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_plant_symptoms_symptom ON plant_symptoms(symptom_id);
        CREATE INDEX IF NOT EXISTS idx_plant_toxins_toxin ON plant_toxins(toxin_id);
        CREATE INDEX IF NOT EXISTS idx_sources_plant ON sources(plant_id);",
    )?;

    Ok(())
}

/// Row count for one of the known tables
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    anyhow::ensure!(TABLES.contains(&table), "Unknown table: {}", table);

    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;

    Ok(count)
}

/// Row counts for every table, in `TABLES` order
pub fn table_counts(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    TABLES
        .iter()
        .map(|table| -> Result<(&'static str, i64)> { Ok((*table, count_rows(conn, table)?)) })
        .collect()
}
