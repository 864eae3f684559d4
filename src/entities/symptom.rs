// 🤒 Symptom Entity - clinical sign, grouped by body system
//
// The plant/symptom association carries the severity used by the listing
// aggregate, plus onset and free-text notes.

use crate::severity::Severity;
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    pub body_system: Option<String>,
}

/// A symptom as seen from one plant (detail view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSymptom {
    pub name: Option<String>,
    pub body_system: Option<String>,
    pub severity: Severity,
    pub onset: Option<String>,
    pub notes: Option<String>,
}

/// A plant as seen from one symptom (reverse lookup)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPlant {
    pub id: Option<i64>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub severity: Severity,
}

pub fn list_symptoms(conn: &Connection) -> Result<Vec<Symptom>> {
    let mut stmt = conn.prepare("SELECT id, name, body_system FROM symptoms ORDER BY id")?;

    let symptoms = stmt
        .query_map([], |row| {
            Ok(Symptom {
                id: row.get(0)?,
                name: row.get(1)?,
                body_system: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(symptoms)
}

/// Every plant associated with `symptom_id`. Unknown symptoms yield an empty list.
pub fn plants_for_symptom(conn: &Connection, symptom_id: i64) -> Result<Vec<SymptomPlant>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.common_name, p.scientific_name, ps.severity
         FROM plant_symptoms ps
         LEFT JOIN plants p ON p.id = ps.plant_id
         WHERE ps.symptom_id = ?1
         ORDER BY ps.plant_id",
    )?;

    let plants = stmt
        .query_map(params![symptom_id], |row| {
            Ok(SymptomPlant {
                id: row.get(0)?,
                common_name: row.get(1)?,
                scientific_name: row.get(2)?,
                severity: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(plants)
}

pub fn symptoms_for_plant(conn: &Connection, plant_id: i64) -> Result<Vec<PlantSymptom>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, s.body_system, ps.severity, ps.onset, ps.notes
         FROM plant_symptoms ps
         LEFT JOIN symptoms s ON s.id = ps.symptom_id
         WHERE ps.plant_id = ?1",
    )?;

    let symptoms = stmt
        .query_map(params![plant_id], |row| {
            Ok(PlantSymptom {
                name: row.get(0)?,
                body_system: row.get(1)?,
                severity: row.get(2)?,
                onset: row.get(3)?,
                notes: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(symptoms)
}

// ============================================================================
// BODY SYSTEM NORMALIZATION (import side)
// ============================================================================

/// Keyword -> canonical body system. Longer keywords first so that
/// "central nervous system" wins over "nervous".
const BODY_SYSTEMS: &[(&str, &str)] = &[
    ("central nervous system", "Neurological"),
    ("mucous membranes", "Dermal"),
    ("gastrointestinal", "Gastrointestinal"),
    ("musculoskeletal", "Musculoskeletal"),
    ("cardiovascular", "Cardiac"),
    ("hematological", "Hematological"),
    ("neuromuscular", "Neurological"),
    ("neurological", "Neurological"),
    ("respiratory", "Respiratory"),
    ("multisystem", "Metabolic"),
    ("behavioral", "Neurological"),
    ("endocrine", "Endocrine"),
    ("metabolic", "Metabolic"),
    ("systemic", "Metabolic"),
    ("nervous", "Neurological"),
    ("hepatic", "Hepatic"),
    ("cardiac", "Cardiac"),
    ("kidney", "Renal"),
    ("dermal", "Dermal"),
    ("ocular", "Dermal"),
    ("blood", "Hematological"),
    ("renal", "Renal"),
    ("liver", "Hepatic"),
    ("heart", "Cardiac"),
    ("skin", "Dermal"),
    ("cns", "Neurological"),
    ("gi", "Gastrointestinal"),
];

fn canonical_system(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some((_, canonical)) = BODY_SYSTEMS.iter().find(|(key, _)| *key == lower) {
        return Some(*canonical);
    }

    // Short keywords like "gi" only count as whole words
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .find_map(|word| {
            BODY_SYSTEMS
                .iter()
                .find(|(key, _)| *key == word)
                .map(|(_, canonical)| *canonical)
        })
        .or_else(|| {
            BODY_SYSTEMS
                .iter()
                .filter(|(key, _)| key.len() > 3)
                .find(|(key, _)| lower.contains(key))
                .map(|(_, canonical)| *canonical)
        })
}

/// Normalize free-text body system to a canonical name.
///
/// "Dermal (Skin)." -> "Dermal", "GI / Neuromuscular" -> "Gastrointestinal".
/// Text with no known keyword is returned trimmed, without a trailing period.
pub fn normalize_body_system(text: &str) -> Option<String> {
    let cleaned = text.trim().trim_end_matches('.').trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(canonical) = canonical_system(cleaned) {
        return Some(canonical.to_string());
    }

    for part in cleaned.split(|c: char| c == '/' || c == ',') {
        let without_parens = strip_parenthetical(part);
        if let Some(canonical) = canonical_system(&without_parens) {
            return Some(canonical.to_string());
        }
    }

    Some(cleaned.to_string())
}

fn strip_parenthetical(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn seed(conn: &Connection) {
        conn.execute_batch(
            "INSERT INTO plants (common_name, scientific_name) VALUES ('Lily', 'Lilium spp.');
             INSERT INTO plants (common_name, scientific_name) VALUES ('Tulip', 'Tulipa spp.');
             INSERT INTO symptoms (name, body_system) VALUES ('Vomiting', 'Gastrointestinal');
             INSERT INTO symptoms (name, body_system) VALUES ('Kidney Failure', 'Renal');
             INSERT INTO plant_symptoms (plant_id, symptom_id, severity, onset)
                 VALUES (1, 1, 'severe', '0-2 hours');
             INSERT INTO plant_symptoms (plant_id, symptom_id, severity) VALUES (1, 2, 'fatal');
             INSERT INTO plant_symptoms (plant_id, symptom_id, severity) VALUES (2, 1, 'mild');",
        )
        .unwrap();
    }

    #[test]
    fn test_list_symptoms() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let symptoms = list_symptoms(&conn).unwrap();
        assert_eq!(symptoms.len(), 2);
        assert_eq!(symptoms[1].name, "Kidney Failure");
        assert_eq!(symptoms[1].body_system.as_deref(), Some("Renal"));
    }

    #[test]
    fn test_plants_for_symptom() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let plants = plants_for_symptom(&conn, 1).unwrap();
        assert_eq!(plants.len(), 2);
        assert_eq!(plants[0].common_name.as_deref(), Some("Lily"));
        assert_eq!(plants[0].severity, Severity::Severe);
        assert_eq!(plants[1].severity, Severity::Mild);

        assert!(plants_for_symptom(&conn, 77).unwrap().is_empty());
    }

    #[test]
    fn test_symptoms_for_plant() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let symptoms = symptoms_for_plant(&conn, 1).unwrap();
        assert_eq!(symptoms.len(), 2);

        let vomiting = symptoms
            .iter()
            .find(|s| s.name.as_deref() == Some("Vomiting"))
            .unwrap();
        assert_eq!(vomiting.severity, Severity::Severe);
        assert_eq!(vomiting.onset.as_deref(), Some("0-2 hours"));
        assert_eq!(vomiting.notes, None);
    }

    #[test]
    fn test_normalize_body_system() {
        assert_eq!(normalize_body_system("Gastrointestinal.").as_deref(), Some("Gastrointestinal"));
        assert_eq!(normalize_body_system("gi").as_deref(), Some("Gastrointestinal"));
        assert_eq!(normalize_body_system("Kidney").as_deref(), Some("Renal"));
        assert_eq!(normalize_body_system("Dermal (Skin).").as_deref(), Some("Dermal"));
        assert_eq!(
            normalize_body_system("Central Nervous System").as_deref(),
            Some("Neurological")
        );
        assert_eq!(
            normalize_body_system("GI / Neuromuscular").as_deref(),
            Some("Gastrointestinal")
        );
        assert_eq!(normalize_body_system("Reproductive.").as_deref(), Some("Reproductive"));
        assert_eq!(normalize_body_system("  "), None);
    }

    #[test]
    fn test_short_keywords_need_word_boundaries() {
        // "digestive" contains "gi" but is not the GI abbreviation
        assert_eq!(normalize_body_system("Digestive").as_deref(), Some("Digestive"));
    }
}
