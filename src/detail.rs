// 🌱 Plant Detail - one plant with every association expanded

use crate::entities::{
    find_plant, symptoms_for_plant, toxic_part_names_for_plant, toxins_for_plant,
    treatments_for_plant, PlantSymptom, PlantToxin, PlantTreatment,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantDetail {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub family: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub toxic_parts: Vec<Option<String>>,
    pub toxins: Vec<PlantToxin>,
    pub symptoms: Vec<PlantSymptom>,
    /// Ascending by priority
    pub treatments: Vec<PlantTreatment>,
}

/// Full view of plant `id`, or `None` if no such plant exists
pub fn plant_detail(conn: &Connection, id: i64) -> Result<Option<PlantDetail>> {
    let Some(plant) = find_plant(conn, id)? else {
        return Ok(None);
    };

    Ok(Some(PlantDetail {
        toxic_parts: toxic_part_names_for_plant(conn, plant.id)?,
        toxins: toxins_for_plant(conn, plant.id)?,
        symptoms: symptoms_for_plant(conn, plant.id)?,
        treatments: treatments_for_plant(conn, plant.id)?,
        id: plant.id,
        common_name: plant.common_name,
        scientific_name: plant.scientific_name,
        family: plant.family,
        description: plant.description,
        image_url: plant.image_url,
    }))
}
