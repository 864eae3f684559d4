// 🧪 Toxin Entity - toxic compound, linked to plants with per-pair concentration notes

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toxin {
    pub id: i64,
    pub name: String,
    pub chemical_formula: Option<String>,
    pub description: Option<String>,
}

/// A toxin as seen from one plant (detail view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantToxin {
    pub name: Option<String>,
    pub chemical_formula: Option<String>,
    pub description: Option<String>,
    pub concentration_notes: Option<String>,
}

/// A plant as seen from one toxin (reverse lookup)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxinPlant {
    pub id: Option<i64>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub concentration_notes: Option<String>,
}

pub fn list_toxins(conn: &Connection) -> Result<Vec<Toxin>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, chemical_formula, description FROM toxins ORDER BY id",
    )?;

    let toxins = stmt
        .query_map([], |row| {
            Ok(Toxin {
                id: row.get(0)?,
                name: row.get(1)?,
                chemical_formula: row.get(2)?,
                description: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(toxins)
}

/// Every plant associated with `toxin_id`. Unknown toxins yield an empty list.
pub fn plants_for_toxin(conn: &Connection, toxin_id: i64) -> Result<Vec<ToxinPlant>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.common_name, p.scientific_name, pt.concentration_notes
         FROM plant_toxins pt
         LEFT JOIN plants p ON p.id = pt.plant_id
         WHERE pt.toxin_id = ?1
         ORDER BY pt.plant_id",
    )?;

    let plants = stmt
        .query_map(params![toxin_id], |row| {
            Ok(ToxinPlant {
                id: row.get(0)?,
                common_name: row.get(1)?,
                scientific_name: row.get(2)?,
                concentration_notes: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(plants)
}

pub fn toxins_for_plant(conn: &Connection, plant_id: i64) -> Result<Vec<PlantToxin>> {
    let mut stmt = conn.prepare(
        "SELECT t.name, t.chemical_formula, t.description, pt.concentration_notes
         FROM plant_toxins pt
         LEFT JOIN toxins t ON t.id = pt.toxin_id
         WHERE pt.plant_id = ?1",
    )?;

    let toxins = stmt
        .query_map(params![plant_id], |row| {
            Ok(PlantToxin {
                name: row.get(0)?,
                chemical_formula: row.get(1)?,
                description: row.get(2)?,
                concentration_notes: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(toxins)
}
