// 📥 Import - processed plant documents -> SQLite
//
// Input is one JSON file or a directory of them. Each document holds a single
// plant record or an array of records:
//
//   { "plant": {...}, "toxic_parts": [...], "toxins": [...],
//     "symptoms": [...], "treatments": [...], "sources": [...] }
//
// Plants upsert by scientific name and their associations are replaced, so
// importing the same documents twice leaves the database unchanged.

use crate::entities::normalize_body_system;
use crate::severity::Severity;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// RECORD TYPES (document shape)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantRecord {
    pub plant: PlantInfo,
    #[serde(default)]
    pub toxic_parts: Vec<String>,
    #[serde(default)]
    pub toxins: Vec<ToxinRecord>,
    #[serde(default)]
    pub symptoms: Vec<SymptomRecord>,
    #[serde(default)]
    pub treatments: Vec<TreatmentRecord>,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantInfo {
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxinRecord {
    pub name: Option<String>,
    pub chemical_formula: Option<String>,
    pub description: Option<String>,
    pub concentration_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomRecord {
    pub name: Option<String>,
    pub body_system: Option<String>,
    /// Free text, normalized on import ("Mild to Severe." -> severe)
    pub severity: Option<String>,
    pub onset: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Defaults to the 1-based position in the record
    pub priority: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub accessed_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files: usize,
    pub plants: usize,
    pub skipped: usize,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Trimmed, non-empty text
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Placeholder values the upstream pipeline emits for unknown names
fn is_placeholder(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "none" | "n/a" | "na" | "null" | "unknown"
    )
}

impl PlantRecord {
    /// Scientific name usable as the natural key, if any
    pub fn scientific_name(&self) -> Option<String> {
        clean(&self.plant.scientific_name).filter(|name| !is_placeholder(name))
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Parse one document: a single record or an array of records
pub fn parse_document(json: &str) -> Result<Vec<PlantRecord>> {
    let value: serde_json::Value = serde_json::from_str(json).context("Invalid JSON")?;

    let records = if value.is_array() {
        serde_json::from_value(value).context("Failed to deserialize plant records")?
    } else {
        vec![serde_json::from_value(value).context("Failed to deserialize plant record")?]
    };

    Ok(records)
}

/// JSON files to import: `path` itself, or every `*.json` inside it (sorted)
pub fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "json"))
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

/// Load every record under `path`
pub fn load_records(path: &Path) -> Result<(usize, Vec<PlantRecord>)> {
    let files = collect_files(path)?;
    let mut records = Vec::new();

    for file in &files {
        let json = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let parsed = parse_document(&json)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        debug!("{}: {} record(s)", file.display(), parsed.len());
        records.extend(parsed);
    }

    Ok((files.len(), records))
}

// ============================================================================
// WRITING
// ============================================================================

/// Import records in a single transaction
pub fn import_records(conn: &mut Connection, records: &[PlantRecord]) -> Result<ImportSummary> {
    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();

    for record in records {
        let Some(scientific_name) = record.scientific_name() else {
            warn!(
                "Skipping record without scientific name (common name: {:?})",
                record.plant.common_name
            );
            summary.skipped += 1;
            continue;
        };

        let plant_id = upsert_plant(&tx, record, &scientific_name)
            .with_context(|| format!("Failed to import {}", scientific_name))?;
        replace_associations(&tx, plant_id, record)
            .with_context(|| format!("Failed to import associations for {}", scientific_name))?;

        summary.plants += 1;
    }

    tx.commit()?;

    info!(
        "Imported {} plants ({} skipped)",
        summary.plants, summary.skipped
    );
    Ok(summary)
}

/// Load and import everything under `path`
pub fn import_path(conn: &mut Connection, path: &Path) -> Result<ImportSummary> {
    let (files, records) = load_records(path)?;
    let mut summary = import_records(conn, &records)?;
    summary.files = files;
    Ok(summary)
}

fn upsert_plant(tx: &Transaction<'_>, record: &PlantRecord, scientific_name: &str) -> Result<i64> {
    let common_name =
        clean(&record.plant.common_name).unwrap_or_else(|| scientific_name.to_string());
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    tx.execute(
        "INSERT INTO plants (common_name, scientific_name, family, description, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(scientific_name) DO UPDATE SET
            common_name = excluded.common_name,
            family = excluded.family,
            description = excluded.description,
            image_url = excluded.image_url,
            updated_at = ?6",
        params![
            common_name,
            scientific_name,
            clean(&record.plant.family),
            clean(&record.plant.description),
            clean(&record.plant.image_url),
            now,
        ],
    )?;

    let id = tx.query_row(
        "SELECT id FROM plants WHERE scientific_name = ?1",
        params![scientific_name],
        |row| row.get(0),
    )?;

    Ok(id)
}

fn replace_associations(tx: &Transaction<'_>, plant_id: i64, record: &PlantRecord) -> Result<()> {
    for table in [
        "plant_toxic_parts",
        "plant_toxins",
        "plant_symptoms",
        "plant_treatments",
        "sources",
    ] {
        tx.execute(
            &format!("DELETE FROM {} WHERE plant_id = ?1", table),
            params![plant_id],
        )?;
    }

    for part in &record.toxic_parts {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        tx.execute(
            "INSERT OR IGNORE INTO toxic_parts (name) VALUES (?1)",
            params![name],
        )?;
        let part_id: i64 = tx.query_row(
            "SELECT id FROM toxic_parts WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO plant_toxic_parts (plant_id, toxic_part_id) VALUES (?1, ?2)",
            params![plant_id, part_id],
        )?;
    }

    for toxin in &record.toxins {
        let Some(name) = clean(&toxin.name) else { continue };
        tx.execute(
            "INSERT INTO toxins (name, chemical_formula, description) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                chemical_formula = COALESCE(excluded.chemical_formula, toxins.chemical_formula),
                description = COALESCE(excluded.description, toxins.description)",
            params![name, clean(&toxin.chemical_formula), clean(&toxin.description)],
        )?;
        let toxin_id: i64 = tx.query_row(
            "SELECT id FROM toxins WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO plant_toxins (plant_id, toxin_id, concentration_notes)
             VALUES (?1, ?2, ?3)",
            params![plant_id, toxin_id, clean(&toxin.concentration_notes)],
        )?;
    }

    for symptom in &record.symptoms {
        let Some(name) = clean(&symptom.name) else { continue };
        let body_system = symptom.body_system.as_deref().and_then(normalize_body_system);
        let severity = symptom
            .severity
            .as_deref()
            .and_then(Severity::normalize)
            .unwrap_or_default();

        tx.execute(
            "INSERT INTO symptoms (name, body_system) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET
                body_system = COALESCE(excluded.body_system, symptoms.body_system)",
            params![name, body_system],
        )?;
        let symptom_id: i64 = tx.query_row(
            "SELECT id FROM symptoms WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO plant_symptoms (plant_id, symptom_id, severity, onset, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plant_id,
                symptom_id,
                severity,
                clean(&symptom.onset),
                clean(&symptom.notes),
            ],
        )?;
    }

    for (index, treatment) in record.treatments.iter().enumerate() {
        let Some(name) = clean(&treatment.name) else { continue };
        let description = clean(&treatment.description);
        let priority = treatment.priority.unwrap_or(index as i64 + 1);

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM treatments WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let treatment_id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE treatments SET description = COALESCE(description, ?2) WHERE id = ?1",
                    params![id, description],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO treatments (name, description) VALUES (?1, ?2)",
                    params![name, description],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.execute(
            "INSERT OR REPLACE INTO plant_treatments (plant_id, treatment_id, priority, notes)
             VALUES (?1, ?2, ?3, ?4)",
            params![plant_id, treatment_id, priority, clean(&treatment.notes)],
        )?;
    }

    for source in &record.sources {
        let Some(title) = clean(&source.title) else { continue };
        tx.execute(
            "INSERT INTO sources (plant_id, title, url, accessed_at) VALUES (?1, ?2, ?3, ?4)",
            params![plant_id, title, clean(&source.url), clean(&source.accessed_at)],
        )?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::db::{count_rows, open_in_memory, table_counts};
    use std::io::Write;

    #[test]
    fn test_import_sample_records() {
        let mut conn = open_in_memory().unwrap();
        let summary = import_records(&mut conn, &sample_records()).unwrap();

        assert_eq!(summary.plants, 4);
        assert_eq!(summary.skipped, 0);
        assert_eq!(count_rows(&conn, "plants").unwrap(), 4);
        // "Vomiting" is shared between Lily and Tulip
        assert_eq!(count_rows(&conn, "symptoms").unwrap(), 3);
        assert_eq!(count_rows(&conn, "plant_symptoms").unwrap(), 4);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let mut conn = open_in_memory().unwrap();
        import_records(&mut conn, &sample_records()).unwrap();
        let before = table_counts(&conn).unwrap();

        import_records(&mut conn, &sample_records()).unwrap();
        let after = table_counts(&conn).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_reimport_updates_fields_and_replaces_associations() {
        let mut conn = open_in_memory().unwrap();
        import_records(&mut conn, &sample_records()).unwrap();

        let mut lily = plant("Easter Lily", "Lilium spp.");
        lily.symptoms = vec![symptom("Lethargy", "Neurological", "mild")];
        import_records(&mut conn, &[lily]).unwrap();

        let (name, symptom_count): (String, i64) = conn
            .query_row(
                "SELECT p.common_name, COUNT(ps.symptom_id)
                 FROM plants p LEFT JOIN plant_symptoms ps ON ps.plant_id = p.id
                 WHERE p.scientific_name = 'Lilium spp.'
                 GROUP BY p.id",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        assert_eq!(name, "Easter Lily");
        assert_eq!(symptom_count, 1);
        assert_eq!(count_rows(&conn, "plants").unwrap(), 4);
    }

    #[test]
    fn test_skips_records_without_scientific_name() {
        let mut conn = open_in_memory().unwrap();
        let records = vec![
            plant("Mystery Fern", "N/A"),
            plant("Blank", "   "),
            plant("Aloe", "Aloe vera"),
        ];

        let summary = import_records(&mut conn, &records).unwrap();
        assert_eq!(summary.plants, 1);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_severity_and_body_system_normalized() {
        let mut conn = open_in_memory().unwrap();
        let mut oleander = plant("Oleander", "Nerium oleander");
        oleander.symptoms = vec![
            symptom("Arrhythmia", "Heart.", "Moderate to Fatal."),
            symptom("Drooling", "GI", "hard to say"),
        ];
        import_records(&mut conn, &[oleander]).unwrap();

        let rows: Vec<(String, String, String)> = conn
            .prepare(
                "SELECT s.name, s.body_system, ps.severity
                 FROM plant_symptoms ps JOIN symptoms s ON s.id = ps.symptom_id
                 ORDER BY s.name",
            )
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            rows,
            vec![
                ("Arrhythmia".to_string(), "Cardiac".to_string(), "fatal".to_string()),
                ("Drooling".to_string(), "Gastrointestinal".to_string(), "moderate".to_string()),
            ]
        );
    }

    #[test]
    fn test_treatment_priority_defaults_to_position() {
        let mut conn = open_in_memory().unwrap();
        let mut azalea = plant("Azalea", "Rhododendron spp.");
        azalea.treatments = vec![treatment("Decontamination", None), treatment("Monitoring", None)];
        import_records(&mut conn, &[azalea]).unwrap();

        let priorities: Vec<i64> = conn
            .prepare("SELECT priority FROM plant_treatments ORDER BY priority")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(priorities, vec![1, 2]);
    }

    #[test]
    fn test_parse_document_single_and_array() {
        let single = r#"{"plant": {"common_name": "Aloe", "scientific_name": "Aloe vera"},
                         "toxic_parts": ["Latex"]}"#;
        let records = parse_document(single).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].toxic_parts, vec!["Latex"]);

        let array = r#"[{"plant": {"scientific_name": "Aloe vera"}},
                        {"plant": {"scientific_name": "Cycas revoluta"}, "symptoms": []}]"#;
        let records = parse_document(array).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].scientific_name().as_deref(), Some("Cycas revoluta"));

        assert!(parse_document("not json").is_err());
    }

    #[test]
    fn test_import_path_from_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = fs::File::create(dir.path().join("aloe.json")).unwrap();
        writeln!(
            first,
            r#"{{"plant": {{"common_name": "Aloe", "scientific_name": "Aloe vera"}},
                "symptoms": [{{"name": "Vomiting", "body_system": "GI", "severity": "Mild."}}]}}"#
        )
        .unwrap();

        let mut second = fs::File::create(dir.path().join("batch.json")).unwrap();
        writeln!(
            second,
            r#"[{{"plant": {{"common_name": "Sago Palm", "scientific_name": "Cycas revoluta"}}}}]"#
        )
        .unwrap();

        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut conn = open_in_memory().unwrap();
        let summary = import_path(&mut conn, dir.path()).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                files: 2,
                plants: 2,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_failed_import_rolls_back() {
        let mut conn = open_in_memory().unwrap();
        conn.execute("DROP TABLE sources", []).unwrap();

        let mut lily = plant("Lily", "Lilium spp.");
        lily.sources = vec![SourceRecord {
            title: Some("ASPCA".to_string()),
            ..SourceRecord::default()
        }];

        assert!(import_records(&mut conn, &[lily]).is_err());
        assert_eq!(count_rows(&conn, "plants").unwrap(), 0);
    }
}
