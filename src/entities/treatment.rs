// 💊 Treatment Entity
//
// Names are not unique; the plant association carries a display priority
// (lower first) and per-plant notes.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// A treatment as seen from one plant (detail view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantTreatment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: i64,
    pub notes: Option<String>,
}

/// Treatments for a plant, ascending by priority
pub fn treatments_for_plant(conn: &Connection, plant_id: i64) -> Result<Vec<PlantTreatment>> {
    let mut stmt = conn.prepare(
        "SELECT t.name, t.description, pt.priority, pt.notes
         FROM plant_treatments pt
         LEFT JOIN treatments t ON t.id = pt.treatment_id
         WHERE pt.plant_id = ?1
         ORDER BY pt.priority ASC",
    )?;

    let treatments = stmt
        .query_map(params![plant_id], |row| {
            Ok(PlantTreatment {
                name: row.get(0)?,
                description: row.get(1)?,
                priority: row.get(2)?,
                notes: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(treatments)
}
