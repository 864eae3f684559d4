// 📚 Source Entity - citation record for a plant's data

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub plant_id: i64,
    pub title: String,
    pub url: Option<String>,
    pub accessed_at: Option<String>,
}

pub fn sources_for_plant(conn: &Connection, plant_id: i64) -> Result<Vec<Source>> {
    let mut stmt = conn.prepare(
        "SELECT id, plant_id, title, url, accessed_at
         FROM sources
         WHERE plant_id = ?1
         ORDER BY id",
    )?;

    let sources = stmt
        .query_map(params![plant_id], |row| {
            Ok(Source {
                id: row.get(0)?,
                plant_id: row.get(1)?,
                title: row.get(2)?,
                url: row.get(3)?,
                accessed_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sources)
}
