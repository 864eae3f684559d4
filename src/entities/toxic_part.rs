// Toxic Part Entity - anatomical part of a plant that is toxic (leaf, bulb, sap...)

use anyhow::Result;
use rusqlite::{params, Connection};

/// Names of the toxic parts associated with a plant.
/// A dangling association yields `None` rather than dropping the row.
pub fn toxic_part_names_for_plant(conn: &Connection, plant_id: i64) -> Result<Vec<Option<String>>> {
    let mut stmt = conn.prepare(
        "SELECT tp.name
         FROM plant_toxic_parts ptp
         LEFT JOIN toxic_parts tp ON tp.id = ptp.toxic_part_id
         WHERE ptp.plant_id = ?1",
    )?;

    let names = stmt
        .query_map(params![plant_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(names)
}
