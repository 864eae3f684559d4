// ✅ Verify - completeness report over the imported data
//
// Counts every table and flags plants that are missing symptoms, toxins,
// treatments or sources. A plant without symptoms shows up in the listing
// with a null max_severity, which is usually a data gap rather than a safe plant.

use crate::db::table_counts;
use crate::entities::{
    list_plants, sources_for_plant, symptoms_for_plant, toxins_for_plant, treatments_for_plant,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantGap {
    pub id: i64,
    pub scientific_name: String,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub counts: Vec<(&'static str, i64)>,
    pub gaps: Vec<PlantGap>,
}

impl VerifyReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn summary(&self) -> String {
        let plants = self
            .counts
            .iter()
            .find(|(table, _)| *table == "plants")
            .map(|(_, n)| *n)
            .unwrap_or(0);
        format!("{} plants, {} with gaps", plants, self.gaps.len())
    }
}

pub fn verify_database(conn: &Connection) -> Result<VerifyReport> {
    let counts = table_counts(conn)?;
    let mut gaps = Vec::new();

    for plant in list_plants(conn)? {
        let mut missing = Vec::new();

        if symptoms_for_plant(conn, plant.id)?.is_empty() {
            missing.push("symptoms");
        }
        if toxins_for_plant(conn, plant.id)?.is_empty() {
            missing.push("toxins");
        }
        if treatments_for_plant(conn, plant.id)?.is_empty() {
            missing.push("treatments");
        }
        if sources_for_plant(conn, plant.id)?.is_empty() {
            missing.push("sources");
        }

        if !missing.is_empty() {
            gaps.push(PlantGap {
                id: plant.id,
                scientific_name: plant.scientific_name,
                missing,
            });
        }
    }

    Ok(VerifyReport { counts, gaps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fixtures::sample_database;

    #[test]
    fn test_report_counts_and_gaps() {
        let conn = sample_database();
        let report = verify_database(&conn).unwrap();

        assert!(report.counts.contains(&("plants", 4)));
        assert!(report.counts.contains(&("plant_symptoms", 4)));
        assert_eq!(report.summary(), "4 plants, 4 with gaps");
        assert!(!report.is_complete());

        let spider = report
            .gaps
            .iter()
            .find(|g| g.scientific_name == "Chlorophytum comosum")
            .unwrap();
        assert_eq!(spider.missing, vec!["symptoms", "toxins", "treatments", "sources"]);

        let lily = report
            .gaps
            .iter()
            .find(|g| g.scientific_name == "Lilium spp.")
            .unwrap();
        assert_eq!(lily.missing, vec!["sources"]);
    }

    #[test]
    fn test_empty_database_is_complete() {
        let conn = crate::db::open_in_memory().unwrap();
        let report = verify_database(&conn).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.summary(), "0 plants, 0 with gaps");
    }
}
