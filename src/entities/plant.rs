// 🌿 Plant Entity
//
// Identity: integer id (autoincrement), scientific_name is the natural key
// used by the importer for upserts.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub family: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Plant {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Plant> {
        Ok(Plant {
            id: row.get(0)?,
            common_name: row.get(1)?,
            scientific_name: row.get(2)?,
            family: row.get(3)?,
            description: row.get(4)?,
            image_url: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

const PLANT_COLUMNS: &str = "id, common_name, scientific_name, family, description, image_url,
                             created_at, updated_at";

/// Look up a single plant by id
pub fn find_plant(conn: &Connection, id: i64) -> Result<Option<Plant>> {
    let plant = conn
        .query_row(
            &format!("SELECT {} FROM plants WHERE id = ?1 LIMIT 1", PLANT_COLUMNS),
            params![id],
            Plant::from_row,
        )
        .optional()?;

    Ok(plant)
}

/// All plants in id order
pub fn list_plants(conn: &Connection) -> Result<Vec<Plant>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM plants ORDER BY id", PLANT_COLUMNS))?;

    let plants = stmt
        .query_map([], Plant::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(plants)
}
